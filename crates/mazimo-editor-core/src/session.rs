//! Editing session: owns the current snapshot and reports content changes.
//!
//! Every input builds a [`Change`] from the current state and replaces the
//! state with its result. The owner's callback runs only when the new
//! document differs from the old one; caret moves and focus changes update
//! the state silently.

use std::fmt;

use mazimo_markdown::{Grammar, Mark, decorate_chars, markdown_grammar};
use serde::Serialize;

use crate::change::Change;
use crate::config::{EditorConfig, OutputFormat};
use crate::document::Document;
use crate::error::EditorError;
use crate::keys::{Decision, Key, KeyContext, KeydownResult, decide};
use crate::serialize::to_plain_text;
use crate::shortcuts::ShortcutTable;
use crate::state::EditorState;
use crate::text::{Leaf, Text};
use crate::toolbar::{ToolbarAction, ToolbarState, has_block, has_mark};
use crate::transforms::apply_plan;
use crate::types::{BlockPath, BlockType, Selection};

/// Content handed to the owner after a change.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ChangePayload {
    Document(Document),
    PlainText(String),
}

impl ChangePayload {
    pub fn kind(&self) -> &'static str {
        match self {
            ChangePayload::Document(_) => "document",
            ChangePayload::PlainText(_) => "plain-text",
        }
    }
}

/// A text block as it should be displayed: document marks plus highlighting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoratedBlock {
    pub path: BlockPath,
    pub kind: BlockType,
    pub leaves: Vec<Leaf>,
}

type ChangeCallback = Box<dyn FnMut(&ChangePayload)>;

pub struct EditorSession {
    config: EditorConfig,
    shortcuts: ShortcutTable,
    grammar: &'static Grammar,
    state: EditorState,
    on_change: Option<ChangeCallback>,
}

impl fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorSession")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("on_change", &self.on_change.is_some())
            .finish_non_exhaustive()
    }
}

impl EditorSession {
    /// Start a session with the configured seed content.
    pub fn new(config: EditorConfig) -> Result<Self, EditorError> {
        config.shortcuts.validate()?;
        let document = config.initial_document()?;
        Ok(Self::with_document(config, document))
    }

    pub fn with_document(config: EditorConfig, document: Document) -> Self {
        Self {
            shortcuts: config.shortcuts.table(),
            grammar: markdown_grammar(),
            state: EditorState::new(document),
            config,
            on_change: None,
        }
    }

    /// Register the owner's change callback, replacing any previous one.
    pub fn on_change(&mut self, callback: impl FnMut(&ChangePayload) + 'static) {
        self.on_change = Some(Box::new(callback));
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn document(&self) -> &Document {
        &self.state.document
    }

    pub fn selection(&self) -> &Selection {
        &self.state.selection
    }

    /// Current content in the configured output shape.
    pub fn content(&self) -> ChangePayload {
        match self.config.output {
            OutputFormat::Document => ChangePayload::Document(self.state.document.clone()),
            OutputFormat::PlainText => ChangePayload::PlainText(to_plain_text(&self.state.document)),
        }
    }

    /// Run the shortcut handlers for `key` without any default behavior.
    pub fn handle_key(&mut self, key: &Key) -> KeydownResult {
        if key.handler().is_none() {
            return KeydownResult::PassThrough;
        }
        let Some(ctx) = KeyContext::from_state(&self.state) else {
            return KeydownResult::NotHandled;
        };
        let decision = decide(key, &ctx, &self.shortcuts);
        if let Some(rule) = decision.rule() {
            tracing::debug!(
                target: "mazimo::keys",
                ?key,
                rule,
                result = ?decision.result(),
                "key decided"
            );
        }
        if let Decision::Handled { plan, .. } = &decision {
            self.edit(|change| apply_plan(change, plan));
        }
        decision.result()
    }

    /// Press `key`: shortcut handlers first, the default behavior if they
    /// decline.
    pub fn press_key(&mut self, key: &Key) -> KeydownResult {
        let result = self.handle_key(key);
        if result != KeydownResult::Handled {
            self.edit(|change| match key {
                Key::Character(text) => change.insert_text(text),
                Key::Space => change.insert_text(" "),
                Key::Backspace => change.delete_backward(),
                Key::Enter => change.split_block(),
                Key::ArrowLeft => change.move_backward(),
                Key::ArrowRight => change.move_forward(),
                Key::Home => change.move_to_start_of_block(),
                Key::End => change.move_to_end_of_block(),
            });
        }
        result
    }

    /// Type `text` one key at a time, so shortcuts fire as they would for
    /// a user.
    pub fn type_text(&mut self, text: &str) {
        for ch in text.chars() {
            self.press_key(&Key::from_char(ch));
        }
    }

    pub fn select(&mut self, selection: Selection) -> Result<(), EditorError> {
        self.state.check_selection(&selection)?;
        self.edit(|change| change.select(selection));
        Ok(())
    }

    pub fn focus(&mut self) {
        self.edit(Change::focus);
    }

    pub fn blur(&mut self) {
        self.edit(Change::blur);
    }

    pub fn toolbar(&self) -> ToolbarState {
        ToolbarState::for_state(&self.state)
    }

    pub fn has_block(&self, kind: BlockType) -> bool {
        has_block(&self.state, kind)
    }

    pub fn has_mark(&self, mark: &Mark) -> bool {
        has_mark(&self.state, mark)
    }

    pub fn toolbar_click(&mut self, action: &ToolbarAction) {
        match action {
            ToolbarAction::ToggleBlock(kind) => self.edit(|change| change.toggle_block(*kind)),
            ToolbarAction::ToggleMark(mark) => self.edit(|change| change.toggle_mark(mark)),
        }
    }

    /// Text blocks with their display leaves.
    pub fn decorated_blocks(&self) -> Vec<DecoratedBlock> {
        self.state
            .document
            .leaf_blocks()
            .into_iter()
            .filter_map(|(path, block)| {
                let text = block.text()?;
                let leaves = if self.config.highlighting {
                    let chars = decorate_chars(&text.styled_chars(), self.grammar);
                    Text::from_styled(&chars).leaves().to_vec()
                } else {
                    text.leaves().to_vec()
                };
                Some(DecoratedBlock {
                    path,
                    kind: block.kind,
                    leaves,
                })
            })
            .collect()
    }

    fn edit(&mut self, f: impl FnOnce(&mut Change)) {
        let mut change = Change::new(&self.state);
        f(&mut change);
        self.commit(change.into_state());
    }

    fn commit(&mut self, next: EditorState) {
        let content_changed = next.document != self.state.document;
        self.state = next;
        if !content_changed {
            tracing::trace!(
                target: "mazimo::session",
                selection = ?self.state.selection,
                focused = self.state.is_focused,
                "selection updated"
            );
            return;
        }
        let payload = self.content();
        tracing::debug!(
            target: "mazimo::session",
            payload = payload.kind(),
            blocks = self.state.document.leaf_paths().len(),
            "content changed"
        );
        if let Some(callback) = self.on_change.as_mut() {
            callback(&payload);
        }
    }
}
