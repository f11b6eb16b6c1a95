//! mazimo-editor-core: auto-markdown block editing without a UI.
//!
//! This crate provides:
//! - `Document` - immutable block/text tree with JSON and plain-text forms
//! - `ShortcutTable` and `keys::decide` - the space/backspace/enter rules
//! - `BlockTransforms` - the mutation vocabulary, implemented by `Change`
//! - `EditorSession` - owns the current state and reports content changes

pub mod change;
pub mod config;
pub mod document;
pub mod error;
pub mod keys;
pub mod serialize;
pub mod session;
pub mod shortcuts;
pub mod state;
pub mod text;
pub mod toolbar;
pub mod transforms;
pub mod types;

pub use change::Change;
pub use config::{EditorConfig, InitialContent, OutputFormat, ShortcutConfig, ShortcutProfile};
pub use document::{Block, Document, Node, SeedDocument};
pub use error::EditorError;
pub use keys::{Decision, Handler, Key, KeyContext, KeydownResult, decide, decide_handler};
pub use mazimo_markdown::{Mark, MarkSet};
pub use serialize::{from_plain_text, to_plain_text};
pub use session::{ChangePayload, DecoratedBlock, EditorSession};
pub use shortcuts::{ShortcutTable, shortcut_prefix};
pub use smol_str::SmolStr;
pub use state::EditorState;
pub use text::{Leaf, Text};
pub use toolbar::{ToolbarAction, ToolbarButton, ToolbarState, has_block, has_mark};
pub use transforms::{BlockTransforms, Transform, apply_plan};
pub use types::{BlockPath, BlockType, Selection, UnknownBlockType};
