//! Editor state snapshot: document plus selection.

use mazimo_markdown::MarkSet;

use crate::document::{Block, Document};
use crate::error::{EditorError, format_path};
use crate::text::Text;
use crate::types::Selection;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditorState {
    pub document: Document,
    pub selection: Selection,
    /// Marks toggled at a collapsed caret, applied to the next typed text.
    pub pending_marks: Option<MarkSet>,
    pub is_focused: bool,
}

impl EditorState {
    /// State with the caret at the start of the first text block.
    pub fn new(document: Document) -> Self {
        let path = document.first_leaf().unwrap_or_else(|| vec![0]);
        Self {
            document,
            selection: Selection::collapsed(path, 0),
            pending_marks: None,
            is_focused: false,
        }
    }

    /// The text block holding the selection.
    pub fn focus_block(&self) -> Option<&Block> {
        self.document
            .block(&self.selection.path)
            .filter(|b| b.is_leaf())
    }

    pub fn focus_text(&self) -> Option<&Text> {
        self.focus_block()?.text()
    }

    /// Whether `selection` addresses a text block and stays inside it.
    pub fn check_selection(&self, selection: &Selection) -> Result<(), EditorError> {
        let text = self
            .document
            .block(&selection.path)
            .and_then(Block::text)
            .ok_or_else(|| {
                EditorError::InvalidSelection(format!(
                    "{} is not a text block",
                    format_path(&selection.path)
                ))
            })?;
        let len = text.len();
        if selection.end() > len {
            return Err(EditorError::InvalidSelection(format!(
                "offset {} past end of block {} (length {len})",
                selection.end(),
                format_path(&selection.path)
            )));
        }
        Ok(())
    }

    /// Marks active over the selection: the pending set at a caret if any,
    /// otherwise marks shared by every selected char.
    pub fn active_marks(&self) -> MarkSet {
        if let (true, Some(pending)) = (self.selection.is_collapsed(), &self.pending_marks) {
            return pending.clone();
        }
        self.focus_text()
            .map(|t| t.active_marks(self.selection.range()))
            .unwrap_or_default()
    }
}
