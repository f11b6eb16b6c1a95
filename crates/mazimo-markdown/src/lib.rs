//! mazimo-markdown: markdown lexical highlighting without editor dependencies.
//!
//! This crate provides:
//! - `Grammar` - an immutable, ordered set of token rules
//! - `tokenize` - splits block text into a tree of `Token`s
//! - `decorate` - maps a token tree onto per-character `Mark` sets

pub mod decorate;
pub mod grammar;
pub mod mark;
pub mod token;

pub use decorate::{StyledChar, decorate, decorate_chars, decoration_marks};
pub use grammar::{Grammar, GrammarBuilder, GrammarError, Guard, Pattern, Rule, markdown_grammar};
pub use mark::{Mark, MarkSet};
pub use smol_str::SmolStr;
pub use token::{Token, tokenize};
