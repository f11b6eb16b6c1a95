//! Block mutation vocabulary.
//!
//! The key state machine never edits a document directly. It produces a
//! plan of [`Transform`]s and hands it to something implementing
//! [`BlockTransforms`]; [`crate::change::Change`] is the implementation over
//! this crate's own documents.

use crate::types::BlockType;

/// Primitive block edits, applied relative to the current selection.
pub trait BlockTransforms {
    /// Change the type of the selected block.
    fn set_block_type(&mut self, kind: BlockType);

    /// Wrap the selected block in a new container of `kind`.
    fn wrap_in_container(&mut self, kind: BlockType);

    /// Lift the selected block out of its nearest `kind` ancestor.
    fn unwrap_from_container(&mut self, kind: BlockType);

    /// Delete chars `from..to` of the selected block, leaving the caret at
    /// `from`.
    fn delete_range(&mut self, from: usize, to: usize);

    /// Split the selected block at the caret. The caret moves to the start
    /// of the new trailing block.
    fn split_block_at_caret(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    SetBlockType(BlockType),
    WrapInContainer(BlockType),
    UnwrapFromContainer(BlockType),
    DeleteRange { from: usize, to: usize },
    SplitBlockAtCaret,
}

impl Transform {
    pub fn apply<T: BlockTransforms + ?Sized>(self, target: &mut T) {
        match self {
            Transform::SetBlockType(kind) => target.set_block_type(kind),
            Transform::WrapInContainer(kind) => target.wrap_in_container(kind),
            Transform::UnwrapFromContainer(kind) => target.unwrap_from_container(kind),
            Transform::DeleteRange { from, to } => target.delete_range(from, to),
            Transform::SplitBlockAtCaret => target.split_block_at_caret(),
        }
    }
}

/// Apply `plan` in order.
pub fn apply_plan<T: BlockTransforms + ?Sized>(target: &mut T, plan: &[Transform]) {
    for transform in plan {
        transform.apply(target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records calls instead of editing anything.
    #[derive(Default)]
    struct Recorder(Vec<String>);

    impl BlockTransforms for Recorder {
        fn set_block_type(&mut self, kind: BlockType) {
            self.0.push(format!("set {kind}"));
        }
        fn wrap_in_container(&mut self, kind: BlockType) {
            self.0.push(format!("wrap {kind}"));
        }
        fn unwrap_from_container(&mut self, kind: BlockType) {
            self.0.push(format!("unwrap {kind}"));
        }
        fn delete_range(&mut self, from: usize, to: usize) {
            self.0.push(format!("delete {from}..{to}"));
        }
        fn split_block_at_caret(&mut self) {
            self.0.push("split".into());
        }
    }

    #[test]
    fn test_plan_is_applied_in_order() {
        let mut recorder = Recorder::default();
        apply_plan(
            &mut recorder,
            &[
                Transform::SetBlockType(BlockType::ListItem),
                Transform::WrapInContainer(BlockType::BulletedList),
                Transform::DeleteRange { from: 0, to: 1 },
                Transform::SplitBlockAtCaret,
                Transform::UnwrapFromContainer(BlockType::BulletedList),
            ],
        );
        assert_eq!(
            recorder.0,
            [
                "set list-item",
                "wrap bulleted-list",
                "delete 0..1",
                "split",
                "unwrap bulleted-list"
            ]
        );
    }
}
