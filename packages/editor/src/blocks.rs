//! Flat block model used by the block editor.
//!
//! One [`EditorBlock`] per top-level document node, each holding a run of
//! [`TextSpan`]s. Span formatting is a flat set of flags rather than
//! TipTap's ordered mark list.

use crate::errors::EditorError;
use notebridge_document::MarkKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockType {
    Paragraph,
    Heading,
    BulletList,
    OrderedList,
    Blockquote,
    CodeBlock,
}

impl BlockType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Paragraph => "paragraph",
            BlockType::Heading => "heading",
            BlockType::BulletList => "bulletList",
            BlockType::OrderedList => "orderedList",
            BlockType::Blockquote => "blockquote",
            BlockType::CodeBlock => "codeBlock",
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, BlockType::BulletList | BlockType::OrderedList)
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockType {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "paragraph" => Ok(BlockType::Paragraph),
            "heading" => Ok(BlockType::Heading),
            "bulletList" => Ok(BlockType::BulletList),
            "orderedList" => Ok(BlockType::OrderedList),
            "blockquote" => Ok(BlockType::Blockquote),
            "codeBlock" => Ok(BlockType::CodeBlock),
            other => Err(EditorError::UnknownBlockType(other.to_string())),
        }
    }
}

/// A formatting flag a span can carry. Links have no counterpart here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SpanMark {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Code,
}

impl SpanMark {
    /// In TipTap wrapping order.
    pub const ALL: [SpanMark; 5] = [
        SpanMark::Bold,
        SpanMark::Italic,
        SpanMark::Underline,
        SpanMark::Strikethrough,
        SpanMark::Code,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SpanMark::Bold => "bold",
            SpanMark::Italic => "italic",
            SpanMark::Underline => "underline",
            SpanMark::Strikethrough => "strikethrough",
            SpanMark::Code => "code",
        }
    }

    pub fn mark_kind(&self) -> MarkKind {
        match self {
            SpanMark::Bold => MarkKind::Bold,
            SpanMark::Italic => MarkKind::Italic,
            SpanMark::Underline => MarkKind::Underline,
            SpanMark::Strikethrough => MarkKind::Strike,
            SpanMark::Code => MarkKind::Code,
        }
    }

    pub fn from_mark_kind(kind: MarkKind) -> Option<Self> {
        match kind {
            MarkKind::Bold => Some(SpanMark::Bold),
            MarkKind::Italic => Some(SpanMark::Italic),
            MarkKind::Underline => Some(SpanMark::Underline),
            MarkKind::Strike => Some(SpanMark::Strikethrough),
            MarkKind::Code => Some(SpanMark::Code),
            MarkKind::Link | MarkKind::Unknown => None,
        }
    }
}

impl FromStr for SpanMark {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SpanMark::ALL
            .into_iter()
            .find(|mark| mark.as_str() == s)
            .ok_or_else(|| EditorError::UnknownMark(s.to_string()))
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpanMarks {
    #[serde(default, skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub italic: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub underline: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub strikethrough: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub code: bool,
}

impl SpanMarks {
    pub fn has(&self, mark: SpanMark) -> bool {
        match mark {
            SpanMark::Bold => self.bold,
            SpanMark::Italic => self.italic,
            SpanMark::Underline => self.underline,
            SpanMark::Strikethrough => self.strikethrough,
            SpanMark::Code => self.code,
        }
    }

    pub fn set(&mut self, mark: SpanMark, on: bool) {
        match mark {
            SpanMark::Bold => self.bold = on,
            SpanMark::Italic => self.italic = on,
            SpanMark::Underline => self.underline = on,
            SpanMark::Strikethrough => self.strikethrough = on,
            SpanMark::Code => self.code = on,
        }
    }

    pub fn toggle(&mut self, mark: SpanMark) {
        self.set(mark, !self.has(mark));
    }

    pub fn with(mut self, mark: SpanMark) -> Self {
        self.set(mark, true);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == SpanMarks::default()
    }

    /// Active marks in TipTap wrapping order.
    pub fn iter(&self) -> impl Iterator<Item = SpanMark> + '_ {
        SpanMark::ALL.into_iter().filter(move |mark| self.has(*mark))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSpan {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marks: Option<SpanMarks>,
}

impl TextSpan {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            marks: None,
        }
    }

    /// Build a span; an empty mark set is stored as `None`.
    pub fn new(text: impl Into<String>, marks: SpanMarks) -> Self {
        Self {
            text: text.into(),
            marks: (!marks.is_empty()).then_some(marks),
        }
    }

    pub fn mark_set(&self) -> SpanMarks {
        self.marks.unwrap_or_default()
    }

    pub fn has_mark(&self, mark: SpanMark) -> bool {
        self.mark_set().has(mark)
    }

    /// Length in characters, the unit all span offsets use.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorBlock {
    pub id: String,
    #[serde(rename = "type")]
    pub block_type: BlockType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
    pub spans: Vec<TextSpan>,
}

impl EditorBlock {
    pub fn new(id: impl Into<String>, block_type: BlockType, spans: Vec<TextSpan>) -> Self {
        Self {
            id: id.into(),
            block_type,
            level: None,
            spans,
        }
    }

    pub fn heading(id: impl Into<String>, level: u8, spans: Vec<TextSpan>) -> Self {
        Self {
            level: Some(level),
            ..Self::new(id, BlockType::Heading, spans)
        }
    }

    /// A paragraph holding one empty span.
    pub fn empty(id: impl Into<String>) -> Self {
        Self::new(id, BlockType::Paragraph, vec![TextSpan::plain("")])
    }

    pub fn text(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }
}
