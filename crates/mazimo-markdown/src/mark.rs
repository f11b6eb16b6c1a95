//! Character marks.
//!
//! A mark is a style tag attached to a character. Marks come from two
//! places: the user (toolbar toggles like bold or code) and the decorator
//! (one mark per token type covering the character). They share one type so
//! a rendered character simply carries the union.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// A style tag identified by its type name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Mark {
    #[serde(rename = "type")]
    pub kind: SmolStr,
}

/// Marks on a single character. Ordered so renderings are deterministic.
pub type MarkSet = BTreeSet<Mark>;

impl Mark {
    pub fn new(kind: impl Into<SmolStr>) -> Self {
        Self { kind: kind.into() }
    }

    pub fn bold() -> Self {
        Self::new("bold")
    }

    pub fn italic() -> Self {
        Self::new("italic")
    }

    pub fn underlined() -> Self {
        Self::new("underlined")
    }

    pub fn code() -> Self {
        Self::new("code")
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.kind)
    }
}

impl From<&str> for Mark {
    fn from(kind: &str) -> Self {
        Self::new(kind)
    }
}
