//! Auto-markdown prefix table.

use std::collections::BTreeMap;

use smol_str::SmolStr;

use crate::types::BlockType;

/// Maps typed prefixes to the block type they turn the block into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutTable {
    entries: BTreeMap<SmolStr, BlockType>,
}

impl Default for ShortcutTable {
    fn default() -> Self {
        Self::full()
    }
}

impl ShortcutTable {
    /// List markers, quote marker and `#` through `######`.
    pub fn full() -> Self {
        let mut table = Self::minimal();
        let mut prefix = String::new();
        for heading in BlockType::HEADINGS {
            prefix.push('#');
            table.entries.insert(SmolStr::new(&prefix), heading);
        }
        table
    }

    /// List markers and quote marker only.
    pub fn minimal() -> Self {
        Self::custom([
            ("*", BlockType::ListItem),
            ("-", BlockType::ListItem),
            ("+", BlockType::ListItem),
            (">", BlockType::BlockQuote),
        ])
    }

    pub fn custom<K: Into<SmolStr>>(entries: impl IntoIterator<Item = (K, BlockType)>) -> Self {
        Self {
            entries: entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Block type for an exact prefix match.
    pub fn resolve(&self, prefix: &str) -> Option<BlockType> {
        self.entries.get(prefix).copied()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, BlockType)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// The text before `caret` (a char offset) with all whitespace removed.
pub fn shortcut_prefix(text: &str, caret: usize) -> String {
    text.chars()
        .take(caret)
        .filter(|c| !c.is_whitespace())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_profile() {
        let table = ShortcutTable::full();
        for marker in ["*", "-", "+"] {
            assert_eq!(table.resolve(marker), Some(BlockType::ListItem));
        }
        assert_eq!(table.resolve(">"), Some(BlockType::BlockQuote));
        for level in 1..=6 {
            assert_eq!(table.resolve(&"#".repeat(level)), BlockType::heading(level));
        }
    }

    #[test]
    fn test_unknown_prefixes() {
        let table = ShortcutTable::full();
        for prefix in ["", "#######", "**", "1.", "a", "#a", ">>"] {
            assert_eq!(table.resolve(prefix), None, "{prefix:?}");
        }
    }

    #[test]
    fn test_minimal_profile_has_no_headings() {
        let table = ShortcutTable::minimal();
        assert_eq!(table.resolve("#"), None);
        assert_eq!(table.resolve("-"), Some(BlockType::ListItem));
        assert_eq!(table.entries().count(), 4);
    }

    #[test]
    fn test_custom_table() {
        let table = ShortcutTable::custom([("!", BlockType::Heading1)]);
        assert_eq!(table.resolve("!"), Some(BlockType::Heading1));
        assert_eq!(table.resolve("#"), None);
    }

    #[test]
    fn test_prefix_strips_all_whitespace() {
        assert_eq!(shortcut_prefix(" # x", 3), "#");
        assert_eq!(shortcut_prefix("# #", 3), "##");
        assert_eq!(shortcut_prefix("ab", 0), "");
        assert_eq!(shortcut_prefix("é#", 2), "é#");
    }
}
