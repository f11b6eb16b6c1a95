//! Editor configuration.
//!
//! Read from JSON; every field is optional:
//!
//! ```json
//! {
//!   "shortcuts": "full",
//!   "highlighting": true,
//!   "output": "document",
//!   "initial_content": { "text": "Incepe aici.." }
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::document::{Document, SeedDocument};
use crate::error::EditorError;
use crate::serialize::from_plain_text;
use crate::shortcuts::ShortcutTable;
use crate::types::BlockType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShortcutProfile {
    Full,
    Minimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ShortcutConfig {
    Profile(ShortcutProfile),
    Custom(BTreeMap<String, BlockType>),
}

impl Default for ShortcutConfig {
    fn default() -> Self {
        Self::Profile(ShortcutProfile::Full)
    }
}

impl ShortcutConfig {
    pub fn table(&self) -> ShortcutTable {
        match self {
            Self::Profile(ShortcutProfile::Full) => ShortcutTable::full(),
            Self::Profile(ShortcutProfile::Minimal) => ShortcutTable::minimal(),
            Self::Custom(entries) => {
                ShortcutTable::custom(entries.iter().map(|(k, v)| (k.as_str(), *v)))
            }
        }
    }

    /// Custom prefixes must target text blocks.
    pub fn validate(&self) -> Result<(), EditorError> {
        let Self::Custom(entries) = self else {
            return Ok(());
        };
        match entries.iter().find(|(_, kind)| kind.is_container()) {
            Some((prefix, kind)) => Err(EditorError::ContainerShortcut {
                prefix: prefix.clone(),
                kind: *kind,
            }),
            None => Ok(()),
        }
    }
}

/// Shape of the content handed to the change callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Document,
    PlainText,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InitialContent {
    Text(String),
    Document(SeedDocument),
}

impl InitialContent {
    pub fn into_document(self) -> Result<Document, EditorError> {
        match self {
            InitialContent::Text(text) => Ok(from_plain_text(&text)),
            InitialContent::Document(seed) => seed.into_document().validated(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub shortcuts: ShortcutConfig,
    /// Decorate block text with markdown token marks.
    pub highlighting: bool,
    pub output: OutputFormat,
    pub initial_content: Option<InitialContent>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self::full()
    }
}

impl EditorConfig {
    /// Every shortcut, live highlighting, structured output.
    pub fn full() -> Self {
        Self {
            shortcuts: ShortcutConfig::Profile(ShortcutProfile::Full),
            highlighting: true,
            output: OutputFormat::Document,
            initial_content: None,
        }
    }

    /// List and quote shortcuts only, no highlighting, plain-text output.
    pub fn minimal() -> Self {
        Self {
            shortcuts: ShortcutConfig::Profile(ShortcutProfile::Minimal),
            highlighting: false,
            output: OutputFormat::PlainText,
            initial_content: None,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        let config: Self =
            serde_json::from_str(json).map_err(|source| EditorError::Config { source })?;
        config.shortcuts.validate()?;
        Ok(config)
    }

    pub fn with_initial_content(mut self, content: InitialContent) -> Self {
        self.initial_content = Some(content);
        self
    }

    /// The starting document: seed content or a single empty paragraph.
    pub fn initial_document(&self) -> Result<Document, EditorError> {
        match self.initial_content.clone() {
            Some(content) => content.into_document(),
            None => Ok(Document::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Block;

    #[test]
    fn test_empty_config_is_full_profile() {
        assert_eq!(EditorConfig::from_json("{}").unwrap(), EditorConfig::full());
    }

    #[test]
    fn test_minimal_profile() {
        let config: EditorConfig = EditorConfig::from_json(
            r#"{"shortcuts":"minimal","highlighting":false,"output":"plain-text"}"#,
        )
        .unwrap();
        assert_eq!(config, EditorConfig::minimal());
        assert_eq!(config.shortcuts.table(), ShortcutTable::minimal());
    }

    #[test]
    fn test_custom_shortcuts() {
        let config =
            EditorConfig::from_json(r#"{"shortcuts":{"!":"heading1","~":"block-quote"}}"#).unwrap();
        let table = config.shortcuts.table();
        assert_eq!(table.resolve("!"), Some(BlockType::Heading1));
        assert_eq!(table.resolve("~"), Some(BlockType::BlockQuote));
        assert_eq!(table.resolve("#"), None);
    }

    #[test]
    fn test_container_shortcut_rejected() {
        let err = EditorConfig::from_json(r#"{"shortcuts":{"!":"heading1","~":"bulleted-list"}}"#)
            .unwrap_err();
        assert!(matches!(
            err,
            EditorError::ContainerShortcut { ref prefix, kind: BlockType::BulletedList } if prefix == "~"
        ));
        assert!(ShortcutConfig::Profile(ShortcutProfile::Full).validate().is_ok());
    }

    #[test]
    fn test_initial_content() {
        let config = EditorConfig::from_json(r#"{"initial_content":{"text":"a\nb"}}"#).unwrap();
        assert_eq!(config.initial_document().unwrap().leaf_paths().len(), 2);

        let config = EditorConfig::from_json(
            r#"{"initial_content":{"document":{"document":{"nodes":[
                {"kind":"block","type":"heading1","nodes":[{"kind":"text","leaves":[{"text":"T"}]}]}
            ]}}}}"#,
        )
        .unwrap();
        assert_eq!(
            config.initial_document().unwrap().block(&[0]).map(|b| b.kind),
            Some(BlockType::Heading1)
        );

        assert_eq!(
            EditorConfig::full().initial_document().unwrap(),
            Document::from_blocks(vec![Block::paragraph("")])
        );
    }

    #[test]
    fn test_bad_config() {
        assert!(matches!(
            EditorConfig::from_json(r#"{"shortcuts":"everything"}"#),
            Err(EditorError::Config { .. })
        ));
        assert!(matches!(
            EditorConfig::from_json(r#"{"output":"html"}"#),
            Err(EditorError::Config { .. })
        ));
    }
}
