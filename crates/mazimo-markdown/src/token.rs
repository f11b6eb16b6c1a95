//! Token trees and the tokenizer.

use std::fmt;

use smol_str::SmolStr;

use crate::grammar::{Grammar, Pattern, Rule};

/// A span of tokenized text.
///
/// Lengths are in chars (Unicode scalar values), matching editor offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Text no rule matched.
    Plain(String),
    /// Text matched by a rule. Rules without an inside-grammar produce a
    /// single `Plain` child.
    Composite {
        kind: SmolStr,
        alias: Option<SmolStr>,
        content: Vec<Token>,
        length: usize,
    },
}

impl Token {
    /// Length in chars.
    pub fn len(&self) -> usize {
        match self {
            Token::Plain(text) => text.chars().count(),
            Token::Composite { length, .. } => *length,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Token type, or `None` for plain text.
    pub fn kind(&self) -> Option<&str> {
        match self {
            Token::Plain(_) => None,
            Token::Composite { kind, .. } => Some(kind),
        }
    }

    /// The source text covered by this token.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.push_text(&mut out);
        out
    }

    fn push_text(&self, out: &mut String) {
        match self {
            Token::Plain(text) => out.push_str(text),
            Token::Composite { content, .. } => content.iter().for_each(|t| t.push_text(out)),
        }
    }

    fn matched(rule: &Rule, pattern: &Pattern, text: String) -> Self {
        let length = text.chars().count();
        let content = match pattern.inside() {
            Some(inside) => tokenize(&text, inside),
            None => vec![Token::Plain(text)],
        };
        Token::Composite {
            kind: rule.kind().clone(),
            alias: rule.alias().cloned(),
            content,
            length,
        }
    }
}

/// Compact rendering: plain text quoted, composites as `kind[children]`.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Plain(text) => write!(f, "{text:?}"),
            Token::Composite { kind, content, .. } => {
                write!(f, "{kind}[")?;
                for (i, child) in content.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{child}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Tokenize `text` with `grammar`.
///
/// Rules run in order. Each pattern scans every plain fragment left by the
/// rules before it; a match splits its fragment into before, token and
/// after, and scanning resumes on the after fragment.
pub fn tokenize(text: &str, grammar: &Grammar) -> Vec<Token> {
    let mut stream = vec![Token::Plain(text.to_owned())];
    for rule in grammar.rules() {
        for pattern in rule.patterns() {
            match_pattern(&mut stream, rule, pattern);
        }
    }

    if tracing::enabled!(target: "mazimo::tokenize", tracing::Level::TRACE) {
        tracing::trace!(
            target: "mazimo::tokenize",
            chars = text.chars().count(),
            tokens = stream.len(),
            "tokenized block"
        );
    }
    stream
}

fn match_pattern(stream: &mut Vec<Token>, rule: &Rule, pattern: &Pattern) {
    let mut i = 0;
    while i < stream.len() {
        let (before, matched, after) = {
            let Token::Plain(fragment) = &stream[i] else {
                i += 1;
                continue;
            };
            let Some(span) = pattern.find(fragment) else {
                i += 1;
                continue;
            };
            (
                fragment[..span.start].to_owned(),
                fragment[span.clone()].to_owned(),
                fragment[span.end..].to_owned(),
            )
        };

        let has_before = !before.is_empty();
        let mut parts = Vec::with_capacity(3);
        if has_before {
            parts.push(Token::Plain(before));
        }
        parts.push(Token::matched(rule, pattern, matched));
        if !after.is_empty() {
            parts.push(Token::Plain(after));
        }
        stream.splice(i..=i, parts);

        i += usize::from(has_before) + 1;
    }
}
