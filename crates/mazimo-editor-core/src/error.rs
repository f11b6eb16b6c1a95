//! Errors raised at the editor's boundaries.
//!
//! Editing itself never fails: handlers decline and transforms skip targets
//! that do not exist. Errors only come from loading configuration and seed
//! content, or from a caller handing in a selection that points nowhere.

use miette::Diagnostic;

use crate::types::BlockType;

#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum EditorError {
    /// Seed document is not valid JSON or does not match the node shape.
    #[error("malformed document JSON")]
    #[diagnostic(
        code(mazimo::document::json),
        help("expected `{{\"nodes\": [...]}}` or `{{\"document\": {{\"nodes\": [...]}}}}`")
    )]
    Json(#[from] serde_json::Error),

    /// Document parsed but breaks a structural rule.
    #[error("invalid document at {path}: {reason}")]
    #[diagnostic(code(mazimo::document::schema))]
    Schema { path: String, reason: &'static str },

    /// Selection does not address a text block of the current document.
    #[error("invalid selection: {0}")]
    #[diagnostic(code(mazimo::selection))]
    InvalidSelection(String),

    /// Editor configuration could not be read.
    #[error("invalid editor configuration")]
    #[diagnostic(
        code(mazimo::config),
        help("`shortcuts` is \"full\", \"minimal\" or a prefix map; `output` is \"document\" or \"plain-text\"")
    )]
    Config {
        #[source]
        source: serde_json::Error,
    },

    /// A custom shortcut would turn a text block into a container.
    #[error("shortcut `{prefix}` targets container block type `{kind}`")]
    #[diagnostic(
        code(mazimo::config::shortcut),
        help("shortcut targets are text blocks: paragraph, list-item, block-quote or heading1..heading6")
    )]
    ContainerShortcut { prefix: String, kind: BlockType },
}

impl EditorError {
    pub(crate) fn schema(path: &[usize], reason: &'static str) -> Self {
        Self::Schema {
            path: format_path(path),
            reason,
        }
    }
}

/// Render a node path as `[0, 2, 1]`, or `root` for the document itself.
pub(crate) fn format_path(path: &[usize]) -> String {
    if path.is_empty() {
        "root".to_owned()
    } else {
        format!("{path:?}")
    }
}
