//! Core editor types: block types, node paths and selection.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Index path from the document root to a node.
pub type BlockPath = Vec<usize>;

/// Structural type of a block node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BlockType {
    #[serde(rename = "paragraph")]
    Paragraph,
    #[serde(rename = "list-item")]
    ListItem,
    #[serde(rename = "bulleted-list")]
    BulletedList,
    #[serde(rename = "block-quote")]
    BlockQuote,
    #[serde(rename = "heading1", alias = "heading-one")]
    Heading1,
    #[serde(rename = "heading2", alias = "heading-two")]
    Heading2,
    #[serde(rename = "heading3", alias = "heading-three")]
    Heading3,
    #[serde(rename = "heading4", alias = "heading-four")]
    Heading4,
    #[serde(rename = "heading5", alias = "heading-five")]
    Heading5,
    #[serde(rename = "heading6", alias = "heading-six")]
    Heading6,
}

impl BlockType {
    pub const HEADINGS: [BlockType; 6] = [
        BlockType::Heading1,
        BlockType::Heading2,
        BlockType::Heading3,
        BlockType::Heading4,
        BlockType::Heading5,
        BlockType::Heading6,
    ];

    /// Heading for `level` in 1..=6.
    pub fn heading(level: usize) -> Option<Self> {
        level
            .checked_sub(1)
            .and_then(|i| Self::HEADINGS.get(i))
            .copied()
    }

    pub fn heading_level(self) -> Option<usize> {
        Self::HEADINGS
            .iter()
            .position(|h| *h == self)
            .map(|i| i + 1)
    }

    pub fn is_heading(self) -> bool {
        self.heading_level().is_some()
    }

    /// Container blocks hold other blocks, never text.
    pub fn is_container(self) -> bool {
        matches!(self, Self::BulletedList)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Paragraph => "paragraph",
            Self::ListItem => "list-item",
            Self::BulletedList => "bulleted-list",
            Self::BlockQuote => "block-quote",
            Self::Heading1 => "heading1",
            Self::Heading2 => "heading2",
            Self::Heading3 => "heading3",
            Self::Heading4 => "heading4",
            Self::Heading5 => "heading5",
            Self::Heading6 => "heading6",
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown block type `{0}`")]
pub struct UnknownBlockType(pub String);

impl FromStr for BlockType {
    type Err = UnknownBlockType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_value(serde_json::Value::String(s.to_owned()))
            .map_err(|_| UnknownBlockType(s.to_owned()))
    }
}

/// Selection inside a single text block.
///
/// Offsets are char offsets into the block's text. The anchor is where the
/// selection started, the focus is where the caret is now; they may be in
/// any order.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub path: BlockPath,
    pub anchor_offset: usize,
    pub focus_offset: usize,
}

impl Selection {
    pub fn new(path: BlockPath, anchor_offset: usize, focus_offset: usize) -> Self {
        Self {
            path,
            anchor_offset,
            focus_offset,
        }
    }

    /// Collapsed selection (caret) at `offset`.
    pub fn collapsed(path: BlockPath, offset: usize) -> Self {
        Self::new(path, offset, offset)
    }

    pub fn start(&self) -> usize {
        self.anchor_offset.min(self.focus_offset)
    }

    pub fn end(&self) -> usize {
        self.anchor_offset.max(self.focus_offset)
    }

    pub fn is_expanded(&self) -> bool {
        self.anchor_offset != self.focus_offset
    }

    pub fn is_collapsed(&self) -> bool {
        !self.is_expanded()
    }

    pub fn range(&self) -> Range<usize> {
        self.start()..self.end()
    }

    /// Collapse onto `offset`, keeping the block.
    pub fn collapse_to(&mut self, offset: usize) {
        self.anchor_offset = offset;
        self.focus_offset = offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_type_names() {
        assert_eq!("list-item".parse::<BlockType>(), Ok(BlockType::ListItem));
        assert_eq!("heading-three".parse::<BlockType>(), Ok(BlockType::Heading3));
        assert_eq!(BlockType::Heading3.to_string(), "heading3");
        assert!("heading7".parse::<BlockType>().is_err());
    }

    #[test]
    fn test_heading_levels() {
        assert_eq!(BlockType::heading(1), Some(BlockType::Heading1));
        assert_eq!(BlockType::heading(6), Some(BlockType::Heading6));
        assert_eq!(BlockType::heading(0), None);
        assert_eq!(BlockType::heading(7), None);
        assert_eq!(BlockType::Heading4.heading_level(), Some(4));
        assert!(!BlockType::BlockQuote.is_heading());
    }

    #[test]
    fn test_selection_bounds() {
        let sel = Selection::new(vec![0], 5, 2);
        assert_eq!(sel.start(), 2);
        assert_eq!(sel.end(), 5);
        assert!(sel.is_expanded());
        assert!(Selection::collapsed(vec![0], 3).is_collapsed());
    }

    #[test]
    fn test_collapse_keeps_block() {
        let mut sel = Selection::new(vec![1, 0], 1, 4);
        sel.collapse_to(2);
        assert_eq!(sel, Selection::collapsed(vec![1, 0], 2));
    }
}
