//! Edits against a working copy of the editor state.
//!
//! A [`Change`] starts from a snapshot, applies any number of edits and is
//! turned back into a new snapshot. Besides the [`BlockTransforms`] used by
//! the shortcut handlers it carries the host's default editing behavior:
//! typing, deleting, splitting and caret movement.
//!
//! Edits whose target does not exist do nothing.

use mazimo_markdown::Mark;

use crate::document::{Block, Node};
use crate::state::EditorState;
use crate::text::Text;
use crate::transforms::BlockTransforms;
use crate::types::{BlockPath, BlockType, Selection};

#[derive(Debug, Clone)]
pub struct Change {
    state: EditorState,
}

impl Change {
    pub fn new(state: &EditorState) -> Self {
        Self {
            state: state.clone(),
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn into_state(self) -> EditorState {
        self.state
    }

    fn path(&self) -> BlockPath {
        self.state.selection.path.clone()
    }

    fn text_mut(&mut self) -> Option<&mut Text> {
        self.state.document.text_mut(&self.state.selection.path)
    }

    fn text_len(&self) -> usize {
        self.state.focus_text().map_or(0, Text::len)
    }

    fn set_selection(&mut self, selection: Selection) {
        self.state.selection = selection;
        self.state.pending_marks = None;
    }

    fn collapse_to(&mut self, path: BlockPath, offset: usize) {
        self.set_selection(Selection::collapsed(path, offset));
    }

    /// Delete the selected chars if the selection is expanded.
    pub fn delete_selection(&mut self) -> bool {
        let selection = self.state.selection.clone();
        if selection.is_collapsed() {
            return false;
        }
        self.delete_range(selection.start(), selection.end());
        true
    }

    /// Type `text` at the caret, replacing any selection.
    ///
    /// The new chars take the pending marks if some were toggled at this
    /// caret, otherwise the marks of the char before it.
    pub fn insert_text(&mut self, text: &str) {
        let pending = self.state.pending_marks.take();
        self.delete_selection();
        let offset = self.state.selection.start();
        let Some(target) = self.text_mut() else {
            return;
        };
        let marks = pending.unwrap_or_else(|| target.marks_at(offset));
        target.insert(offset, text, &marks);
        let path = self.path();
        self.collapse_to(path, offset + text.chars().count());
    }

    /// Default backspace: delete the selection, the char before the caret,
    /// or merge this block into the previous text block.
    pub fn delete_backward(&mut self) {
        if self.delete_selection() {
            return;
        }
        let offset = self.state.selection.start();
        if offset > 0 {
            self.delete_range(offset - 1, offset);
        } else {
            self.merge_into_previous();
        }
    }

    fn merge_into_previous(&mut self) {
        let path = self.path();
        let Some(previous) = self.state.document.previous_leaf(&path) else {
            return;
        };
        let Some(Node::Block(removed)) = self.state.document.remove_block(&path) else {
            return;
        };
        let Some(target) = self.state.document.text_mut(&previous) else {
            return;
        };
        let join_at = target.len();
        if let Some(Node::Text(tail)) = removed.nodes.into_iter().next() {
            target.append(tail);
        }
        self.collapse_to(previous, join_at);
    }

    /// Default enter: delete the selection and split the block, keeping its
    /// type for the new trailing block.
    pub fn split_block(&mut self) {
        self.delete_selection();
        self.split_block_at_caret();
    }

    pub fn move_backward(&mut self) {
        let selection = self.state.selection.clone();
        let start = selection.start();
        if selection.is_expanded() {
            self.collapse_to(selection.path, start);
        } else if start > 0 {
            self.collapse_to(selection.path, start - 1);
        } else if let Some(previous) = self.state.document.previous_leaf(&selection.path) {
            let end = self.state.document.text(&previous).map_or(0, Text::len);
            self.collapse_to(previous, end);
        }
    }

    pub fn move_forward(&mut self) {
        let selection = self.state.selection.clone();
        let end = selection.end();
        if selection.is_expanded() {
            self.collapse_to(selection.path, end);
        } else if end < self.text_len() {
            self.collapse_to(selection.path, end + 1);
        } else if let Some(next) = self.state.document.next_leaf(&selection.path) {
            self.collapse_to(next, 0);
        }
    }

    pub fn move_to_start_of_block(&mut self) {
        let mut selection = self.state.selection.clone();
        selection.collapse_to(0);
        self.set_selection(selection);
    }

    pub fn move_to_end_of_block(&mut self) {
        let mut selection = self.state.selection.clone();
        selection.collapse_to(self.text_len());
        self.set_selection(selection);
    }

    pub fn select(&mut self, selection: Selection) {
        self.set_selection(selection);
    }

    /// Toggle `mark` over the selection. At a collapsed caret this only
    /// changes the pending marks for the next typed text.
    pub fn toggle_mark(&mut self, mark: &Mark) {
        let selection = self.state.selection.clone();
        if selection.is_expanded() {
            if let Some(text) = self.text_mut() {
                text.toggle_mark(selection.range(), mark);
            }
            return;
        }
        let mut pending = self.state.active_marks();
        if !pending.remove(mark) {
            pending.insert(mark.clone());
        }
        self.state.pending_marks = Some(pending);
    }

    /// Set the block to `kind`, or back to a paragraph if it already is one.
    pub fn toggle_block(&mut self, kind: BlockType) {
        let current = self.state.focus_block().map(|b| b.kind);
        if current == Some(kind) {
            self.set_block_type(BlockType::Paragraph);
        } else {
            self.set_block_type(kind);
        }
    }

    pub fn focus(&mut self) {
        self.state.is_focused = true;
    }

    pub fn blur(&mut self) {
        self.state.is_focused = false;
    }
}

impl BlockTransforms for Change {
    fn set_block_type(&mut self, kind: BlockType) {
        let path = self.path();
        if let Some(block) = self.state.document.block_mut(&path) {
            block.kind = kind;
        }
    }

    fn wrap_in_container(&mut self, kind: BlockType) {
        let path = self.path();
        let Some((index, parent)) = path.split_last() else {
            return;
        };
        let Some(siblings) = self.state.document.children_mut(parent) else {
            return;
        };
        let Some(slot) = siblings.get_mut(*index) else {
            return;
        };
        let Node::Block(inner) = slot.clone() else {
            return;
        };
        *slot = Node::Block(Block::container(kind, vec![inner]));
        self.state.selection.path.push(0);
    }

    fn unwrap_from_container(&mut self, kind: BlockType) {
        let path = self.path();
        let doc = &mut self.state.document;
        // Nearest ancestor of the requested type.
        let Some(depth) = (1..path.len())
            .rev()
            .find(|d| doc.block(&path[..*d]).is_some_and(|b| b.kind == kind))
        else {
            return;
        };
        let ancestor = &path[..depth];
        let child = path[depth];
        let Some((ancestor_index, grandparent)) = ancestor.split_last() else {
            return;
        };
        let Some(siblings) = doc.children_mut(grandparent) else {
            return;
        };
        let Some(Node::Block(container)) = siblings.get(*ancestor_index).cloned() else {
            return;
        };

        let mut nodes = container.nodes;
        if child >= nodes.len() {
            return;
        }
        let after: Vec<Node> = nodes.split_off(child + 1);
        let lifted = nodes.pop();
        let before = nodes;

        let mut replacement = Vec::with_capacity(3);
        if !before.is_empty() {
            replacement.push(Node::Block(Block {
                kind,
                nodes: before,
            }));
        }
        let lifted_index = *ancestor_index + replacement.len();
        replacement.extend(lifted);
        if !after.is_empty() {
            replacement.push(Node::Block(Block { kind, nodes: after }));
        }
        siblings.splice(*ancestor_index..=*ancestor_index, replacement);

        let mut new_path = grandparent.to_vec();
        new_path.push(lifted_index);
        new_path.extend_from_slice(&path[depth + 1..]);
        self.state.selection.path = new_path;
    }

    fn delete_range(&mut self, from: usize, to: usize) {
        let Some(text) = self.text_mut() else {
            return;
        };
        let len = text.len();
        let (from, to) = (from.min(len), to.min(len));
        text.remove(from..to.max(from));
        let path = self.path();
        self.collapse_to(path, from);
    }

    fn split_block_at_caret(&mut self) {
        let path = self.path();
        let offset = self.state.selection.start();
        let Some(block) = self.state.document.block_mut(&path) else {
            return;
        };
        let kind = block.kind;
        let Some(text) = block.text_mut() else {
            return;
        };
        let tail = text.split_off(offset);

        let Some((index, parent)) = path.split_last() else {
            return;
        };
        let Some(siblings) = self.state.document.children_mut(parent) else {
            return;
        };
        siblings.insert(index + 1, Node::Block(Block::leaf(kind, tail)));

        let mut new_path = parent.to_vec();
        new_path.push(index + 1);
        self.collapse_to(new_path, 0);
    }
}
