//! Plain-text conversion: one line per text block.

use crate::document::{Block, Document};

/// Text of every text block, joined by newlines. Marks and block types are
/// dropped.
pub fn to_plain_text(document: &Document) -> String {
    document
        .leaf_blocks()
        .iter()
        .filter_map(|(_, block)| block.text().map(|t| t.text()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// One paragraph per line. Empty input gives a single empty paragraph.
pub fn from_plain_text(text: &str) -> Document {
    Document::from_blocks(text.split('\n').map(Block::paragraph).collect())
}
