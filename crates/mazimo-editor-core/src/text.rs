//! Marked text content of a leaf block.
//!
//! A [`Text`] is a run of [`Leaf`]s. Adjacent characters with identical
//! mark sets always share a leaf, so two texts with the same characters and
//! marks compare equal no matter how they were edited. Every edit goes
//! through the per-char [`StyledChar`] form and is normalized back.

use std::ops::Range;

use mazimo_markdown::{Mark, MarkSet, StyledChar};
use serde::{Deserialize, Serialize};

/// Contiguous characters sharing one mark set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Leaf {
    pub text: String,
    #[serde(default)]
    pub marks: MarkSet,
}

impl Leaf {
    pub fn new(text: impl Into<String>, marks: MarkSet) -> Self {
        Self {
            text: text.into(),
            marks,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, MarkSet::new())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Text {
    #[serde(alias = "ranges", default)]
    leaves: Vec<Leaf>,
}

impl Default for Text {
    fn default() -> Self {
        Self::plain("")
    }
}

impl Text {
    /// Unmarked text.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            leaves: vec![Leaf::plain(text)],
        }
    }

    /// Build from leaves, merging neighbours with equal marks.
    pub fn from_leaves(leaves: impl IntoIterator<Item = Leaf>) -> Self {
        let mut merged: Vec<Leaf> = Vec::new();
        for leaf in leaves {
            if leaf.text.is_empty() {
                continue;
            }
            match merged.last_mut() {
                Some(last) if last.marks == leaf.marks => last.text.push_str(&leaf.text),
                _ => merged.push(leaf),
            }
        }
        if merged.is_empty() {
            merged.push(Leaf::default());
        }
        Self { leaves: merged }
    }

    pub fn from_styled(chars: &[StyledChar]) -> Self {
        Self::from_leaves(
            chars
                .iter()
                .map(|c| Leaf::new(c.ch.to_string(), c.marks.clone())),
        )
    }

    pub fn styled_chars(&self) -> Vec<StyledChar> {
        self.leaves
            .iter()
            .flat_map(|leaf| {
                leaf.text
                    .chars()
                    .map(|ch| StyledChar::with_marks(ch, leaf.marks.clone()))
            })
            .collect()
    }

    pub fn leaves(&self) -> &[Leaf] {
        &self.leaves
    }

    /// Re-merge leaves after deserialization.
    pub fn normalized(self) -> Self {
        Self::from_leaves(self.leaves)
    }

    pub fn text(&self) -> String {
        self.leaves.iter().map(|l| l.text.as_str()).collect()
    }

    /// Length in chars.
    pub fn len(&self) -> usize {
        self.leaves.iter().map(|l| l.text.chars().count()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.iter().all(|l| l.text.is_empty())
    }

    /// Marks a char typed at `offset` inherits: those of the char before it,
    /// or of the first char when typing at the start.
    pub fn marks_at(&self, offset: usize) -> MarkSet {
        let chars = self.styled_chars();
        let index = offset.saturating_sub(1);
        chars
            .get(index)
            .or_else(|| chars.last())
            .map(|c| c.marks.clone())
            .unwrap_or_default()
    }

    /// Marks present on every char of `range`. An empty range reports the
    /// marks at its position.
    pub fn active_marks(&self, range: Range<usize>) -> MarkSet {
        let chars = self.styled_chars();
        let range = clamp(range, chars.len());
        if range.is_empty() {
            return self.marks_at(range.start);
        }
        let mut iter = chars[range].iter();
        let Some(first) = iter.next() else {
            return MarkSet::new();
        };
        iter.fold(first.marks.clone(), |acc, c| {
            acc.intersection(&c.marks).cloned().collect()
        })
    }

    pub fn insert(&mut self, offset: usize, text: &str, marks: &MarkSet) {
        let mut chars = self.styled_chars();
        let at = offset.min(chars.len());
        chars.splice(
            at..at,
            text.chars().map(|ch| StyledChar::with_marks(ch, marks.clone())),
        );
        *self = Self::from_styled(&chars);
    }

    pub fn remove(&mut self, range: Range<usize>) {
        let mut chars = self.styled_chars();
        let range = clamp(range, chars.len());
        chars.drain(range);
        *self = Self::from_styled(&chars);
    }

    /// Split at `offset`, keeping the head and returning the tail.
    pub fn split_off(&mut self, offset: usize) -> Text {
        let mut chars = self.styled_chars();
        let tail = chars.split_off(offset.min(chars.len()));
        *self = Self::from_styled(&chars);
        Self::from_styled(&tail)
    }

    pub fn append(&mut self, other: Text) {
        let leaves = std::mem::take(&mut self.leaves)
            .into_iter()
            .chain(other.leaves);
        *self = Self::from_leaves(leaves);
    }

    pub fn add_mark(&mut self, range: Range<usize>, mark: &Mark) {
        self.update_marks(range, |marks| {
            marks.insert(mark.clone());
        });
    }

    pub fn remove_mark(&mut self, range: Range<usize>, mark: &Mark) {
        self.update_marks(range, |marks| {
            marks.remove(mark);
        });
    }

    /// Remove `mark` if every char in `range` has it, add it otherwise.
    pub fn toggle_mark(&mut self, range: Range<usize>, mark: &Mark) {
        if self.active_marks(range.clone()).contains(mark) {
            self.remove_mark(range, mark);
        } else {
            self.add_mark(range, mark);
        }
    }

    fn update_marks(&mut self, range: Range<usize>, mut f: impl FnMut(&mut MarkSet)) {
        let mut chars = self.styled_chars();
        let range = clamp(range, chars.len());
        chars[range].iter_mut().for_each(|c| f(&mut c.marks));
        *self = Self::from_styled(&chars);
    }
}

fn clamp(range: Range<usize>, len: usize) -> Range<usize> {
    let end = range.end.min(len);
    range.start.min(end)..end
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bold() -> MarkSet {
        [Mark::bold()].into_iter().collect()
    }

    #[test]
    fn test_leaves_merge_on_equal_marks() {
        let text = Text::from_leaves([
            Leaf::plain("ab"),
            Leaf::plain("c"),
            Leaf::new("d", bold()),
            Leaf::plain(""),
            Leaf::new("e", bold()),
        ]);
        assert_eq!(text.leaves(), [Leaf::plain("abc"), Leaf::new("de", bold())]);
    }

    #[test]
    fn test_empty_text_keeps_one_leaf() {
        let mut text = Text::plain("ab");
        text.remove(0..2);
        assert_eq!(text, Text::default());
        assert_eq!(text.leaves().len(), 1);
        assert!(text.is_empty());
    }

    #[test]
    fn test_insert_and_remove_use_char_offsets() {
        let mut text = Text::plain("héllo");
        text.insert(2, "X", &MarkSet::new());
        assert_eq!(text.text(), "héXllo");
        text.remove(1..3);
        assert_eq!(text.text(), "hllo");
    }

    #[test]
    fn test_split_and_append() {
        let mut text = Text::from_leaves([Leaf::plain("ab"), Leaf::new("cd", bold())]);
        let tail = text.split_off(3);
        assert_eq!(text.leaves(), [Leaf::plain("ab"), Leaf::new("c", bold())]);
        assert_eq!(tail.leaves(), [Leaf::new("d", bold())]);
        text.append(tail);
        assert_eq!(text.leaves(), [Leaf::plain("ab"), Leaf::new("cd", bold())]);
    }

    #[test]
    fn test_toggle_mark_over_range() {
        let mut text = Text::plain("hello");
        text.toggle_mark(1..3, &Mark::bold());
        assert_eq!(
            text.leaves(),
            [Leaf::plain("h"), Leaf::new("el", bold()), Leaf::plain("lo")]
        );
        // Partially bold range: toggling adds to all of it.
        text.toggle_mark(0..3, &Mark::bold());
        assert_eq!(text.leaves(), [Leaf::new("hel", bold()), Leaf::plain("lo")]);
        text.toggle_mark(0..3, &Mark::bold());
        assert_eq!(text, Text::plain("hello"));
    }

    #[test]
    fn test_marks_at_follow_preceding_char() {
        let text = Text::from_leaves([Leaf::new("ab", bold()), Leaf::plain("c")]);
        assert_eq!(text.marks_at(0), bold());
        assert_eq!(text.marks_at(2), bold());
        assert!(text.marks_at(3).is_empty());
        assert_eq!(text.active_marks(0..3), MarkSet::new());
        assert_eq!(text.active_marks(0..2), bold());
    }

    #[test]
    fn test_legacy_ranges_field() {
        let text: Text =
            serde_json::from_str(r#"{"ranges":[{"text":"hi","marks":[{"type":"bold"}]}]}"#)
                .unwrap();
        assert_eq!(text.leaves(), [Leaf::new("hi", bold())]);
    }
}
