//! Rich-text document snapshots.
//!
//! The editor engine owns the live document; on every change it hands us a
//! JSON snapshot (`doc.toJSON()`). We convert that loose shape into closed
//! variant types so the decoration pass can match exhaustively instead of
//! comparing type-name strings.
//!
//! # Positions
//!
//! Positions follow the engine's flat addressing scheme:
//! - a text run occupies one position per UTF-16 code unit, so astral
//!   characters such as most emoji take two,
//! - a leaf node (image, hard break, rule) occupies one position,
//! - any other node occupies its content size plus two (open and close token).
//!
//! The document's own open token is not counted, so its first child starts
//! at position 0 and the first position inside that child is 1.

use std::collections::BTreeMap;

use serde::Deserialize;
use smol_str::SmolStr;

use crate::error::DocumentError;

/// Node attributes, sorted by key.
pub type Attrs = BTreeMap<SmolStr, serde_json::Value>;

/// Inline node names the engine treats as leaves.
const LEAF_NODES: &[&str] = &[
    "hardbreak",
    "hard_break",
    "image",
    "hr",
    "horizontal_rule",
    "html",
    "footnote_reference",
];

/// Node shape as it appears in the engine's JSON.
#[derive(Debug, Clone, Deserialize)]
pub struct RawNode {
    #[serde(rename = "type")]
    pub node_type: SmolStr,
    #[serde(default)]
    pub attrs: Option<Attrs>,
    #[serde(default)]
    pub content: Vec<RawNode>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub marks: Vec<RawMark>,
}

/// Mark shape as it appears in the engine's JSON.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMark {
    #[serde(rename = "type")]
    pub mark_type: SmolStr,
    #[serde(default)]
    pub attrs: Option<Attrs>,
}

/// Kinds of inline mark, with a catch-all for anything we don't draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkKind {
    Emphasis,
    Strong,
    Code,
    Other(SmolStr),
}

impl MarkKind {
    /// Resolve an engine mark type name.
    pub fn from_name(name: &str) -> Self {
        match name {
            "em" | "emphasis" => MarkKind::Emphasis,
            "strong" | "bold" => MarkKind::Strong,
            "code" | "inlineCode" | "code_inline" => MarkKind::Code,
            other => MarkKind::Other(SmolStr::new(other)),
        }
    }

    /// Markdown glyph drawn on both sides of the span, if any.
    pub fn marker(&self) -> Option<&'static str> {
        match self {
            MarkKind::Emphasis => Some("*"),
            MarkKind::Strong => Some("**"),
            MarkKind::Code => Some("`"),
            MarkKind::Other(_) => None,
        }
    }
}

/// An inline formatting annotation on a text run.
#[derive(Debug, Clone, PartialEq)]
pub struct Mark {
    /// Type name as the engine reported it.
    pub name: SmolStr,
    pub kind: MarkKind,
    pub attrs: Attrs,
}

impl Mark {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        let name = name.into();
        Self {
            kind: MarkKind::from_name(&name),
            name,
            attrs: Attrs::new(),
        }
    }

    pub fn with_attr(mut self, key: impl Into<SmolStr>, value: serde_json::Value) -> Self {
        self.attrs.insert(key.into(), value);
        self
    }

    pub fn emphasis() -> Self {
        Self::new("emphasis")
    }

    pub fn strong() -> Self {
        Self::new("strong")
    }

    pub fn code() -> Self {
        Self::new("inlineCode")
    }

    /// Identity used to track the mark's span: type name plus the attributes
    /// serialized in key order.
    pub fn identity(&self) -> MarkIdentity {
        if self.attrs.is_empty() {
            return MarkIdentity(smol_str::format_smolstr!("{}:{{}}", self.name));
        }
        match serde_json::to_string(&self.attrs) {
            Ok(attrs) => MarkIdentity(smol_str::format_smolstr!("{}:{}", self.name, attrs)),
            Err(_) => MarkIdentity(self.name.clone()),
        }
    }
}

impl From<RawMark> for Mark {
    fn from(raw: RawMark) -> Self {
        Self {
            kind: MarkKind::from_name(&raw.mark_type),
            name: raw.mark_type,
            attrs: raw.attrs.unwrap_or_default(),
        }
    }
}

/// Normalized `type:attrs` key of a mark.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkIdentity(SmolStr);

impl MarkIdentity {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Closed set of node kinds the decoration pass understands.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Heading { level: u8 },
    Blockquote,
    CodeBlock,
    Paragraph,
    Text { text: String, marks: Vec<Mark> },
    /// Inline leaf occupying a single position.
    Leaf(SmolStr),
    /// Any other container node.
    Other(SmolStr),
}

/// A node in a document snapshot, with its size precomputed.
#[derive(Debug, Clone, PartialEq)]
pub struct DocNode {
    kind: NodeKind,
    content: Vec<DocNode>,
    size: usize,
}

impl DocNode {
    pub fn new(kind: NodeKind, content: Vec<DocNode>) -> Self {
        let size = match &kind {
            NodeKind::Text { text, .. } => text.encode_utf16().count(),
            NodeKind::Leaf(_) => 1,
            _ => content.iter().map(DocNode::size).sum::<usize>() + 2,
        };
        Self {
            kind,
            content,
            size,
        }
    }

    pub fn heading(level: u8, content: Vec<DocNode>) -> Self {
        Self::new(
            NodeKind::Heading {
                level: level.clamp(1, 6),
            },
            content,
        )
    }

    pub fn paragraph(content: Vec<DocNode>) -> Self {
        Self::new(NodeKind::Paragraph, content)
    }

    pub fn blockquote(content: Vec<DocNode>) -> Self {
        Self::new(NodeKind::Blockquote, content)
    }

    pub fn code_block(text: &str) -> Self {
        let content = if text.is_empty() {
            vec![]
        } else {
            vec![Self::text(text)]
        };
        Self::new(NodeKind::CodeBlock, content)
    }

    pub fn text(text: &str) -> Self {
        Self::marked(text, vec![])
    }

    pub fn marked(text: &str, marks: Vec<Mark>) -> Self {
        Self::new(
            NodeKind::Text {
                text: text.to_string(),
                marks,
            },
            vec![],
        )
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn content(&self) -> &[DocNode] {
        &self.content
    }

    /// Number of positions this node occupies.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, NodeKind::Text { .. })
    }

    /// Marks carried by a text run; empty for every other node.
    pub fn marks(&self) -> &[Mark] {
        match &self.kind {
            NodeKind::Text { marks, .. } => marks,
            _ => &[],
        }
    }
}

impl TryFrom<RawNode> for DocNode {
    type Error = DocumentError;

    fn try_from(raw: RawNode) -> Result<Self, Self::Error> {
        let attrs = raw.attrs.unwrap_or_default();
        let kind = match raw.node_type.as_str() {
            "heading" => NodeKind::Heading {
                level: heading_level(&attrs)?,
            },
            "blockquote" => NodeKind::Blockquote,
            "code_block" | "codeBlock" => NodeKind::CodeBlock,
            "paragraph" => NodeKind::Paragraph,
            "text" => NodeKind::Text {
                text: raw.text.ok_or(DocumentError::MissingText)?,
                marks: raw.marks.into_iter().map(Mark::from).collect(),
            },
            name if LEAF_NODES.contains(&name) => NodeKind::Leaf(raw.node_type.clone()),
            _ => NodeKind::Other(raw.node_type.clone()),
        };
        let content = raw
            .content
            .into_iter()
            .map(DocNode::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(DocNode::new(kind, content))
    }
}

/// Heading level from attrs: absent or null means 1, numbers clamp to 1..=6.
fn heading_level(attrs: &Attrs) -> Result<u8, DocumentError> {
    match attrs.get("level") {
        None | Some(serde_json::Value::Null) => Ok(1),
        Some(value) => value
            .as_f64()
            .filter(|l| l.is_finite())
            .map(|l| l.clamp(1.0, 6.0) as u8)
            .ok_or(DocumentError::InvalidAttr {
                node: SmolStr::new_static("heading"),
                attr: "level",
            }),
    }
}

/// An immutable document snapshot.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DocumentSnapshot {
    content: Vec<DocNode>,
    content_size: usize,
}

impl DocumentSnapshot {
    pub fn new(content: Vec<DocNode>) -> Self {
        let content_size = content.iter().map(DocNode::size).sum();
        Self {
            content,
            content_size,
        }
    }

    /// Parse the engine's JSON form. The root must be a `doc` node.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let raw: RawNode = serde_json::from_str(json)?;
        Self::try_from(raw)
    }

    pub fn content(&self) -> &[DocNode] {
        &self.content
    }

    /// Size of the document content; the last valid position.
    pub fn content_size(&self) -> usize {
        self.content_size
    }

    /// All nodes in document order with their start positions.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: vec![(self.content.iter(), 0)],
        }
    }
}

impl TryFrom<RawNode> for DocumentSnapshot {
    type Error = DocumentError;

    fn try_from(raw: RawNode) -> Result<Self, Self::Error> {
        if raw.node_type != "doc" {
            return Err(DocumentError::NotADocument(raw.node_type));
        }
        let content = raw
            .content
            .into_iter()
            .map(DocNode::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(content))
    }
}

/// Pre-order traversal yielding `(node, position)`.
pub struct Descendants<'a> {
    stack: Vec<(std::slice::Iter<'a, DocNode>, usize)>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = (&'a DocNode, usize);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (siblings, pos) = self.stack.last_mut()?;
            match siblings.next() {
                Some(node) => {
                    let start = *pos;
                    *pos += node.size();
                    if !node.content.is_empty() {
                        self.stack.push((node.content.iter(), start + 1));
                    }
                    return Some((node, start));
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}
