//! Document tree: blocks holding either text or other blocks.
//!
//! Documents are values. An edit builds a new document and the session swaps
//! it in whole, so comparing two snapshots with `==` tells whether content
//! changed.

use serde::{Deserialize, Serialize};

use crate::error::EditorError;
use crate::text::Text;
use crate::types::{BlockPath, BlockType};

/// A node in the document tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Node {
    Block(Block),
    Text(Text),
}

impl Node {
    pub fn as_block(&self) -> Option<&Block> {
        match self {
            Node::Block(block) => Some(block),
            Node::Text(_) => None,
        }
    }

    pub fn as_block_mut(&mut self) -> Option<&mut Block> {
        match self {
            Node::Block(block) => Some(block),
            Node::Text(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    #[serde(rename = "type")]
    pub kind: BlockType,
    #[serde(default)]
    pub nodes: Vec<Node>,
}

impl Block {
    /// A text block.
    pub fn leaf(kind: BlockType, text: Text) -> Self {
        Self {
            kind,
            nodes: vec![Node::Text(text)],
        }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::leaf(BlockType::Paragraph, Text::plain(text))
    }

    pub fn container(kind: BlockType, children: Vec<Block>) -> Self {
        Self {
            kind,
            nodes: children.into_iter().map(Node::Block).collect(),
        }
    }

    /// Whether this block holds text rather than blocks.
    pub fn is_leaf(&self) -> bool {
        matches!(self.nodes.first(), Some(Node::Text(_)))
    }

    pub fn text(&self) -> Option<&Text> {
        match self.nodes.first() {
            Some(Node::Text(text)) => Some(text),
            _ => None,
        }
    }

    pub fn text_mut(&mut self) -> Option<&mut Text> {
        match self.nodes.first_mut() {
            Some(Node::Text(text)) => Some(text),
            _ => None,
        }
    }

    fn child(&self, index: usize) -> Option<&Block> {
        self.nodes.get(index)?.as_block()
    }

    fn child_mut(&mut self, index: usize) -> Option<&mut Block> {
        self.nodes.get_mut(index)?.as_block_mut()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub nodes: Vec<Node>,
}

impl Default for Document {
    fn default() -> Self {
        Self::from_blocks(vec![Block::paragraph("")])
    }
}

/// Structured seed content: a bare document or a state wrapper around one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SeedDocument {
    State { document: Document },
    Bare(Document),
}

impl SeedDocument {
    pub fn into_document(self) -> Document {
        match self {
            SeedDocument::State { document } | SeedDocument::Bare(document) => document,
        }
    }
}

impl Document {
    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        Self {
            nodes: blocks.into_iter().map(Node::Block).collect(),
        }
    }

    /// Parse and validate seed JSON.
    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        let seed: SeedDocument = serde_json::from_str(json)?;
        seed.into_document().validated()
    }

    pub fn to_json(&self) -> Result<String, EditorError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check structure and bring the tree into canonical form.
    ///
    /// Text blocks end up with exactly one normalized text node; an empty
    /// document becomes a single empty paragraph.
    pub fn validated(self) -> Result<Self, EditorError> {
        if self.nodes.is_empty() {
            return Ok(Self::default());
        }
        let mut nodes = Vec::with_capacity(self.nodes.len());
        for (i, node) in self.nodes.into_iter().enumerate() {
            match node {
                Node::Block(block) => nodes.push(Node::Block(normalize_block(block, None, &[i])?)),
                Node::Text(_) => {
                    return Err(EditorError::schema(&[i], "text node at document root"));
                }
            }
        }
        Ok(Self { nodes })
    }

    pub fn block(&self, path: &[usize]) -> Option<&Block> {
        let (first, rest) = path.split_first()?;
        let mut block = self.nodes.get(*first)?.as_block()?;
        for index in rest {
            block = block.child(*index)?;
        }
        Some(block)
    }

    pub fn block_mut(&mut self, path: &[usize]) -> Option<&mut Block> {
        let (first, rest) = path.split_first()?;
        let mut block = self.nodes.get_mut(*first)?.as_block_mut()?;
        for index in rest {
            block = block.child_mut(*index)?;
        }
        Some(block)
    }

    pub fn text(&self, path: &[usize]) -> Option<&Text> {
        self.block(path)?.text()
    }

    pub fn text_mut(&mut self, path: &[usize]) -> Option<&mut Text> {
        self.block_mut(path)?.text_mut()
    }

    /// Child list of the block at `parent`, or the root list for `[]`.
    pub fn children_mut(&mut self, parent: &[usize]) -> Option<&mut Vec<Node>> {
        if parent.is_empty() {
            Some(&mut self.nodes)
        } else {
            Some(&mut self.block_mut(parent)?.nodes)
        }
    }

    /// Paths of all text blocks in document order.
    pub fn leaf_paths(&self) -> Vec<BlockPath> {
        let mut out = Vec::new();
        let mut path = Vec::new();
        collect_leaves(&self.nodes, &mut path, &mut out);
        out
    }

    /// Text blocks in document order, with their paths.
    pub fn leaf_blocks(&self) -> Vec<(BlockPath, &Block)> {
        self.leaf_paths()
            .into_iter()
            .filter_map(|path| {
                let block = self.block(&path)?;
                Some((path, block))
            })
            .collect()
    }

    pub fn first_leaf(&self) -> Option<BlockPath> {
        self.leaf_paths().into_iter().next()
    }

    pub fn previous_leaf(&self, path: &[usize]) -> Option<BlockPath> {
        let leaves = self.leaf_paths();
        let index = leaves.iter().position(|p| p == path)?;
        index.checked_sub(1).map(|i| leaves[i].clone())
    }

    pub fn next_leaf(&self, path: &[usize]) -> Option<BlockPath> {
        let leaves = self.leaf_paths();
        let index = leaves.iter().position(|p| p == path)?;
        leaves.get(index + 1).cloned()
    }

    /// Remove the node at `path`, then any ancestor blocks left empty.
    pub fn remove_block(&mut self, path: &[usize]) -> Option<Node> {
        let (index, parent) = path.split_last()?;
        let siblings = self.children_mut(parent)?;
        if *index >= siblings.len() {
            return None;
        }
        let removed = siblings.remove(*index);
        let now_empty = siblings.is_empty();
        if now_empty && !parent.is_empty() {
            self.remove_block(parent);
        }
        if self.nodes.is_empty() {
            *self = Self::default();
        }
        Some(removed)
    }
}

fn collect_leaves(nodes: &[Node], path: &mut BlockPath, out: &mut Vec<BlockPath>) {
    for (i, node) in nodes.iter().enumerate() {
        let Node::Block(block) = node else { continue };
        path.push(i);
        if block.is_leaf() {
            out.push(path.clone());
        } else {
            collect_leaves(&block.nodes, path, out);
        }
        path.pop();
    }
}

fn normalize_block(
    block: Block,
    parent: Option<BlockType>,
    path: &[usize],
) -> Result<Block, EditorError> {
    if block.kind == BlockType::ListItem && parent != Some(BlockType::BulletedList) {
        return Err(EditorError::schema(path, "list-item outside a bulleted-list"));
    }

    let has_text = block.nodes.iter().any(|n| matches!(n, Node::Text(_)));
    let has_blocks = block.nodes.iter().any(|n| matches!(n, Node::Block(_)));
    if has_text && has_blocks {
        return Err(EditorError::schema(path, "block mixes text and block children"));
    }

    if block.kind.is_container() {
        if !has_blocks {
            return Err(EditorError::schema(path, "container block without child blocks"));
        }
    } else if !has_blocks {
        let text = block
            .nodes
            .into_iter()
            .filter_map(|n| match n {
                Node::Text(text) => Some(text),
                Node::Block(_) => None,
            })
            .fold(Text::from_leaves([]), |mut acc, t| {
                acc.append(t);
                acc
            });
        return Ok(Block::leaf(block.kind, text.normalized()));
    }

    let kind = block.kind;
    let mut nodes = Vec::with_capacity(block.nodes.len());
    for (i, node) in block.nodes.into_iter().enumerate() {
        let Node::Block(child) = node else { continue };
        let mut child_path = path.to_vec();
        child_path.push(i);
        nodes.push(Node::Block(normalize_block(child, Some(kind), &child_path)?));
    }
    Ok(Block { kind, nodes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::Leaf;
    use mazimo_markdown::{Mark, MarkSet};

    fn list(items: &[&str]) -> Block {
        Block::container(
            BlockType::BulletedList,
            items
                .iter()
                .map(|t| Block::leaf(BlockType::ListItem, Text::plain(*t)))
                .collect(),
        )
    }

    #[test]
    fn test_state_wrapper_and_legacy_fields() {
        let json = r#"{
            "document": {
                "nodes": [{
                    "kind": "block",
                    "type": "heading-three",
                    "nodes": [{ "kind": "text", "ranges": [{ "text": "Incepe aici.." }] }]
                }]
            }
        }"#;
        let doc = Document::from_json(json).unwrap();
        let block = doc.block(&[0]).unwrap();
        assert_eq!(block.kind, BlockType::Heading3);
        assert_eq!(block.text().unwrap().text(), "Incepe aici..");
    }

    #[test]
    fn test_bare_document_roundtrips_json() {
        let doc = Document::from_blocks(vec![Block::paragraph("a"), list(&["b", "c"])]);
        let parsed = Document::from_json(&doc.to_json().unwrap()).unwrap();
        assert_eq!(parsed, doc);
    }

    #[test]
    fn test_serialized_shape() {
        let mut text = Text::plain("x");
        text.add_mark(0..1, &Mark::bold());
        let doc = Document::from_blocks(vec![Block::leaf(BlockType::Paragraph, text)]);
        insta::assert_snapshot!(serde_json::to_string(&doc).unwrap(), @r#"{"nodes":[{"kind":"block","type":"paragraph","nodes":[{"kind":"text","leaves":[{"text":"x","marks":[{"type":"bold"}]}]}]}]}"#);
    }

    #[test]
    fn test_schema_violations() {
        let orphan = r#"{"nodes":[{"kind":"block","type":"list-item","nodes":[]}]}"#;
        assert!(matches!(
            Document::from_json(orphan),
            Err(EditorError::Schema { ref path, .. }) if path == "[0]"
        ));

        let mixed = r#"{"nodes":[{"kind":"block","type":"block-quote","nodes":[
            {"kind":"text","leaves":[]},
            {"kind":"block","type":"paragraph","nodes":[]}
        ]}]}"#;
        assert!(matches!(Document::from_json(mixed), Err(EditorError::Schema { .. })));

        let empty_list = r#"{"nodes":[{"kind":"block","type":"bulleted-list","nodes":[]}]}"#;
        assert!(matches!(Document::from_json(empty_list), Err(EditorError::Schema { .. })));

        let root_text = r#"{"nodes":[{"kind":"text","leaves":[]}]}"#;
        assert!(matches!(Document::from_json(root_text), Err(EditorError::Schema { .. })));
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(Document::from_json("{"), Err(EditorError::Json(_))));
    }

    #[test]
    fn test_validation_normalizes_text_blocks() {
        let json = r#"{"nodes":[{"kind":"block","type":"paragraph","nodes":[
            {"kind":"text","leaves":[{"text":"a"}]},
            {"kind":"text","leaves":[{"text":"b"},{"text":"c","marks":[{"type":"code"}]}]}
        ]},{"kind":"block","type":"paragraph"}]}"#;
        let doc = Document::from_json(json).unwrap();
        let code: MarkSet = [Mark::code()].into_iter().collect();
        assert_eq!(
            doc.text(&[0]).unwrap().leaves(),
            [Leaf::plain("ab"), Leaf::new("c", code)]
        );
        assert_eq!(doc.text(&[1]), Some(&Text::default()));
    }

    #[test]
    fn test_empty_document_is_one_paragraph() {
        assert_eq!(Document::from_json(r#"{"nodes":[]}"#).unwrap(), Document::default());
    }

    #[test]
    fn test_leaf_navigation() {
        let doc = Document::from_blocks(vec![Block::paragraph("a"), list(&["b", "c"])]);
        assert_eq!(doc.leaf_paths(), vec![vec![0], vec![1, 0], vec![1, 1]]);
        assert_eq!(doc.previous_leaf(&[1, 0]), Some(vec![0]));
        assert_eq!(doc.next_leaf(&[1, 0]), Some(vec![1, 1]));
        assert_eq!(doc.next_leaf(&[1, 1]), None);
    }

    #[test]
    fn test_remove_block_drops_empty_ancestors() {
        let mut doc = Document::from_blocks(vec![Block::paragraph("a"), list(&["b"])]);
        doc.remove_block(&[1, 0]);
        assert_eq!(doc, Document::from_blocks(vec![Block::paragraph("a")]));
    }
}
