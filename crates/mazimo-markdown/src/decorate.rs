//! Per-character highlighting marks from token trees.
//!
//! Decoration never mutates its input. Marks are computed from the raw text
//! and unioned with whatever marks a character already carries, so running
//! the pass again over its own output changes nothing.

use crate::grammar::Grammar;
use crate::mark::{Mark, MarkSet};
use crate::token::{Token, tokenize};

/// A character together with all marks that apply to it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StyledChar {
    pub ch: char,
    pub marks: MarkSet,
}

impl StyledChar {
    pub fn new(ch: char) -> Self {
        Self {
            ch,
            marks: MarkSet::new(),
        }
    }

    pub fn with_marks(ch: char, marks: MarkSet) -> Self {
        Self { ch, marks }
    }
}

/// Token-derived marks for each char of `text`.
///
/// Every composite token marks its whole span with its own type; children
/// start at the same offset as their parent.
pub fn decoration_marks(text: &str, grammar: &Grammar) -> Vec<MarkSet> {
    let mut marks = vec![MarkSet::new(); text.chars().count()];
    add_marks(&tokenize(text, grammar), 0, &mut marks);
    marks
}

fn add_marks(tokens: &[Token], mut offset: usize, marks: &mut [MarkSet]) {
    for token in tokens {
        if let Token::Composite { kind, content, length, .. } = token {
            let end = (offset + length).min(marks.len());
            let start = offset.min(end);
            for set in &mut marks[start..end] {
                set.insert(Mark::new(kind.clone()));
            }
            add_marks(content, offset, marks);
        }
        offset += token.len();
    }
}

/// Decorate unstyled text.
pub fn decorate(text: &str, grammar: &Grammar) -> Vec<StyledChar> {
    text.chars()
        .zip(decoration_marks(text, grammar))
        .map(|(ch, marks)| StyledChar::with_marks(ch, marks))
        .collect()
}

/// Decorate already-styled chars, keeping their marks.
pub fn decorate_chars(chars: &[StyledChar], grammar: &Grammar) -> Vec<StyledChar> {
    let text: String = chars.iter().map(|c| c.ch).collect();
    chars
        .iter()
        .zip(decoration_marks(&text, grammar))
        .map(|(styled, extra)| StyledChar {
            ch: styled.ch,
            marks: styled.marks.union(&extra).cloned().collect(),
        })
        .collect()
}
