//! Formatting toolbar state.
//!
//! Only what the buttons show and do; placement is up to the host.

use mazimo_markdown::Mark;

use crate::state::EditorState;
use crate::types::BlockType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolbarAction {
    /// Switch the block between this type and paragraph.
    ToggleBlock(BlockType),
    ToggleMark(Mark),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolbarButton {
    pub action: ToolbarAction,
    /// Icon name, e.g. `header` or `underline`.
    pub icon: &'static str,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolbarState {
    pub visible: bool,
    pub buttons: Vec<ToolbarButton>,
}

const BUTTONS: [(&str, &str); 5] = [
    ("heading2", "header"),
    ("bold", "bold"),
    ("italic", "italic"),
    ("underlined", "underline"),
    ("code", "code"),
];

impl ToolbarState {
    pub fn for_state(state: &EditorState) -> Self {
        let buttons = BUTTONS
            .iter()
            .map(|&(kind, icon)| {
                let action = match kind {
                    "heading2" => ToolbarAction::ToggleBlock(BlockType::Heading2),
                    mark => ToolbarAction::ToggleMark(Mark::new(mark)),
                };
                let active = match &action {
                    ToolbarAction::ToggleBlock(kind) => has_block(state, *kind),
                    ToolbarAction::ToggleMark(mark) => has_mark(state, mark),
                };
                ToolbarButton {
                    action,
                    icon,
                    active,
                }
            })
            .collect();
        Self {
            visible: state.is_focused && state.selection.is_expanded(),
            buttons,
        }
    }

    pub fn button(&self, icon: &str) -> Option<&ToolbarButton> {
        self.buttons.iter().find(|b| b.icon == icon)
    }
}

/// Whether the selected block has type `kind`.
pub fn has_block(state: &EditorState, kind: BlockType) -> bool {
    state.focus_block().is_some_and(|b| b.kind == kind)
}

/// Whether `mark` is active over the selection.
pub fn has_mark(state: &EditorState, mark: &Mark) -> bool {
    state.active_marks().contains(mark)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Block, Document};
    use crate::text::Text;
    use crate::types::Selection;

    fn heading_state(selection: Selection, focused: bool) -> EditorState {
        let mut text = Text::plain("Hello");
        text.add_mark(0..5, &Mark::bold());
        EditorState {
            document: Document::from_blocks(vec![Block::leaf(BlockType::Heading2, text)]),
            selection,
            pending_marks: None,
            is_focused: focused,
        }
    }

    #[test]
    fn test_visible_only_when_focused_with_expanded_selection() {
        let expanded = Selection::new(vec![0], 0, 3);
        assert!(ToolbarState::for_state(&heading_state(expanded.clone(), true)).visible);
        assert!(!ToolbarState::for_state(&heading_state(expanded, false)).visible);
        assert!(!ToolbarState::for_state(&heading_state(Selection::collapsed(vec![0], 1), true)).visible);
    }

    #[test]
    fn test_buttons_report_active_state() {
        let toolbar = ToolbarState::for_state(&heading_state(Selection::new(vec![0], 1, 4), true));
        let icons: Vec<_> = toolbar.buttons.iter().map(|b| b.icon).collect();
        assert_eq!(icons, ["header", "bold", "italic", "underline", "code"]);
        assert!(toolbar.button("header").unwrap().active);
        assert!(toolbar.button("bold").unwrap().active);
        assert!(!toolbar.button("underline").unwrap().active);
        assert_eq!(
            toolbar.button("underline").unwrap().action,
            ToolbarAction::ToggleMark(Mark::underlined())
        );
    }
}
