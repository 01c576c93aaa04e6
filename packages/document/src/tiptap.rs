use crate::error::DocumentResult;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub type Attrs = Map<String, Value>;

pub const DOC: &str = "doc";

/// Known node types. Anything else is carried through as [`NodeKind::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Doc,
    Paragraph,
    Heading,
    BulletList,
    OrderedList,
    ListItem,
    Blockquote,
    CodeBlock,
    HardBreak,
    HorizontalRule,
    Text,
    Table,
    TableRow,
    /// Placeholder for `thead`/`tbody`/`tfoot`; only exists while converting.
    TableRowGroup,
    TableCell,
    TableHeader,
    Unknown,
}

impl NodeKind {
    pub fn from_type(node_type: &str) -> Self {
        match node_type {
            "doc" => NodeKind::Doc,
            "paragraph" => NodeKind::Paragraph,
            "heading" => NodeKind::Heading,
            "bulletList" => NodeKind::BulletList,
            "orderedList" => NodeKind::OrderedList,
            "listItem" => NodeKind::ListItem,
            "blockquote" => NodeKind::Blockquote,
            "codeBlock" => NodeKind::CodeBlock,
            "hardBreak" => NodeKind::HardBreak,
            "horizontalRule" => NodeKind::HorizontalRule,
            "text" => NodeKind::Text,
            "table" => NodeKind::Table,
            "tableRow" => NodeKind::TableRow,
            "tableRowGroup" => NodeKind::TableRowGroup,
            "tableCell" => NodeKind::TableCell,
            "tableHeader" => NodeKind::TableHeader,
            _ => NodeKind::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Doc => "doc",
            NodeKind::Paragraph => "paragraph",
            NodeKind::Heading => "heading",
            NodeKind::BulletList => "bulletList",
            NodeKind::OrderedList => "orderedList",
            NodeKind::ListItem => "listItem",
            NodeKind::Blockquote => "blockquote",
            NodeKind::CodeBlock => "codeBlock",
            NodeKind::HardBreak => "hardBreak",
            NodeKind::HorizontalRule => "horizontalRule",
            NodeKind::Text => "text",
            NodeKind::Table => "table",
            NodeKind::TableRow => "tableRow",
            NodeKind::TableRowGroup => "tableRowGroup",
            NodeKind::TableCell => "tableCell",
            NodeKind::TableHeader => "tableHeader",
            NodeKind::Unknown => "unknown",
        }
    }

    pub fn is_inline(&self) -> bool {
        matches!(self, NodeKind::Text | NodeKind::HardBreak)
    }

    pub fn is_list(&self) -> bool {
        matches!(self, NodeKind::BulletList | NodeKind::OrderedList)
    }
}

/// Known mark types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkKind {
    Bold,
    Italic,
    Underline,
    Strike,
    Code,
    Link,
    Unknown,
}

impl MarkKind {
    /// Order in which marks are wrapped around text, innermost first.
    pub const WRAP_ORDER: [MarkKind; 6] = [
        MarkKind::Bold,
        MarkKind::Italic,
        MarkKind::Underline,
        MarkKind::Strike,
        MarkKind::Code,
        MarkKind::Link,
    ];

    pub fn from_type(mark_type: &str) -> Self {
        match mark_type {
            "bold" => MarkKind::Bold,
            "italic" => MarkKind::Italic,
            "underline" => MarkKind::Underline,
            "strike" => MarkKind::Strike,
            "code" => MarkKind::Code,
            "link" => MarkKind::Link,
            _ => MarkKind::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MarkKind::Bold => "bold",
            MarkKind::Italic => "italic",
            MarkKind::Underline => "underline",
            MarkKind::Strike => "strike",
            MarkKind::Code => "code",
            MarkKind::Link => "link",
            MarkKind::Unknown => "unknown",
        }
    }
}

/// Inline formatting annotation on a text node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mark {
    #[serde(rename = "type")]
    pub mark_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<Attrs>,
}

impl Mark {
    pub fn new(kind: MarkKind) -> Self {
        Self {
            mark_type: kind.as_str().to_string(),
            attrs: None,
        }
    }

    pub fn link(href: impl Into<String>) -> Self {
        let mut attrs = Attrs::new();
        attrs.insert("href".to_string(), Value::String(href.into()));
        Self {
            mark_type: MarkKind::Link.as_str().to_string(),
            attrs: Some(attrs),
        }
    }

    pub fn kind(&self) -> MarkKind {
        MarkKind::from_type(&self.mark_type)
    }

    pub fn href(&self) -> Option<&str> {
        self.attrs.as_ref()?.get("href")?.as_str()
    }
}

/// One node of a TipTap document tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TipTapNode {
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<Attrs>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<TipTapNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marks: Option<Vec<Mark>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl TipTapNode {
    pub fn new(kind: NodeKind) -> Self {
        Self::of_type(kind.as_str())
    }

    pub fn of_type(node_type: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
            attrs: None,
            content: None,
            marks: None,
            text: None,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::new(NodeKind::Text)
        }
    }

    /// A text node holding the empty string, used to keep blocks non-empty.
    pub fn empty_text() -> Self {
        Self::text("")
    }

    pub fn paragraph(content: Vec<TipTapNode>) -> Self {
        Self::new(NodeKind::Paragraph).with_content(content)
    }

    pub fn empty_paragraph() -> Self {
        Self::paragraph(vec![Self::empty_text()])
    }

    pub fn heading(level: u8, content: Vec<TipTapNode>) -> Self {
        Self::new(NodeKind::Heading)
            .with_attr("level", Value::from(level))
            .with_content(content)
    }

    pub fn list(kind: NodeKind, items: Vec<TipTapNode>) -> Self {
        Self::new(kind).with_content(items)
    }

    pub fn list_item(content: Vec<TipTapNode>) -> Self {
        Self::new(NodeKind::ListItem).with_content(content)
    }

    pub fn blockquote(content: Vec<TipTapNode>) -> Self {
        Self::new(NodeKind::Blockquote).with_content(content)
    }

    pub fn code_block(code: impl Into<String>, language: Option<String>) -> Self {
        let code = code.into();
        let mut node = Self::new(NodeKind::CodeBlock);
        if let Some(language) = language {
            node = node.with_attr("language", Value::String(language));
        }
        if !code.is_empty() {
            node = node.with_content(vec![Self::text(code)]);
        }
        node
    }

    pub fn hard_break() -> Self {
        Self::new(NodeKind::HardBreak)
    }

    pub fn horizontal_rule() -> Self {
        Self::new(NodeKind::HorizontalRule)
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attrs.get_or_insert_with(Attrs::new).insert(key.into(), value);
        self
    }

    pub fn with_content(mut self, content: Vec<TipTapNode>) -> Self {
        self.content = Some(content);
        self
    }

    pub fn with_marks(mut self, marks: Vec<Mark>) -> Self {
        self.marks = if marks.is_empty() { None } else { Some(marks) };
        self
    }

    pub fn with_mark(mut self, mark: Mark) -> Self {
        self.add_mark(mark);
        self
    }

    /// Append a mark unless one of the same type is already present.
    pub fn add_mark(&mut self, mark: Mark) {
        let marks = self.marks.get_or_insert_with(Vec::new);
        if !marks.iter().any(|m| m.mark_type == mark.mark_type) {
            marks.push(mark);
        }
    }

    pub fn kind(&self) -> NodeKind {
        NodeKind::from_type(&self.node_type)
    }

    pub fn is_inline(&self) -> bool {
        self.kind().is_inline()
    }

    pub fn attr(&self, key: &str) -> Option<&Value> {
        self.attrs.as_ref()?.get(key)
    }

    /// Heading level clamped to 1..=6; 1 when absent or invalid.
    pub fn heading_level(&self) -> u8 {
        self.attr("level")
            .and_then(Value::as_u64)
            .map(|level| level.clamp(1, 6) as u8)
            .unwrap_or(1)
    }

    /// First number of an ordered list.
    pub fn list_start(&self) -> u64 {
        self.attr("start").and_then(Value::as_u64).unwrap_or(1)
    }

    pub fn language(&self) -> Option<&str> {
        self.attr("language")?.as_str().filter(|l| !l.is_empty())
    }

    pub fn children(&self) -> &[TipTapNode] {
        self.content.as_deref().unwrap_or(&[])
    }

    pub fn marks(&self) -> &[Mark] {
        self.marks.as_deref().unwrap_or(&[])
    }

    pub fn has_mark(&self, kind: MarkKind) -> bool {
        self.marks().iter().any(|m| m.kind() == kind)
    }

    pub fn text_str(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// Concatenated text of this node and its descendants. Hard breaks are skipped.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if let Some(text) = &self.text {
            out.push_str(text);
        }
        for child in self.children() {
            child.collect_text(out);
        }
    }
}

/// Root of a TipTap document: `{"type": "doc", "content": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TipTapDocument {
    #[serde(rename = "type")]
    pub doc_type: String,
    #[serde(default)]
    pub content: Vec<TipTapNode>,
}

impl TipTapDocument {
    pub fn new(content: Vec<TipTapNode>) -> Self {
        Self {
            doc_type: DOC.to_string(),
            content,
        }
    }

    /// The canonical empty document: a single empty paragraph.
    pub fn empty() -> Self {
        Self::new(vec![TipTapNode::empty_paragraph()])
    }

    /// True when the document holds nothing but empty paragraphs.
    pub fn is_blank(&self) -> bool {
        self.content.iter().all(|node| {
            node.kind() == NodeKind::Paragraph
                && node
                    .children()
                    .iter()
                    .all(|c| c.kind() == NodeKind::Text && c.text_str().is_empty())
        })
    }

    /// Strict decoding: fails on malformed JSON or shape mismatches.
    /// Use [`crate::validate_json_str`] for untrusted input.
    pub fn from_json_str(json: &str) -> DocumentResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    pub fn to_json_string(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl Default for TipTapDocument {
    fn default() -> Self {
        Self::empty()
    }
}
