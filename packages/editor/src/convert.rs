//! Conversion between TipTap documents and editor blocks.
//!
//! The block model is one level deep, so some structure does not survive:
//! lists keep only their first item, nested lists inside that item are
//! dropped, horizontal rules disappear and link marks are lost. Each of
//! these is logged at debug level.

use crate::blocks::{BlockType, EditorBlock, SpanMark, SpanMarks, TextSpan};
use crate::errors::EditorResult;
use crate::format::{merge_adjacent_spans, spans_text};
use crate::id_generator::IdSource;
use notebridge_document::{repair, validate, Mark, NodeKind, TipTapDocument, TipTapNode};
use serde_json::Value;
use tracing::debug;

/// One block per top-level node. The document is repaired first, so
/// tables arrive as plain paragraphs. Never returns an empty list.
pub fn tiptap_to_blocks(doc: &TipTapDocument, ids: &mut impl IdSource) -> Vec<EditorBlock> {
    let doc = repair(doc.clone());
    let mut blocks: Vec<EditorBlock> = doc
        .content
        .iter()
        .filter_map(|node| node_to_block(node, ids))
        .collect();

    if blocks.is_empty() {
        blocks.push(EditorBlock::empty(ids.next_id()));
    }
    blocks
}

/// Validate stored TipTap JSON, then convert it.
pub fn blocks_from_tiptap_json(value: &Value, ids: &mut impl IdSource) -> Vec<EditorBlock> {
    tiptap_to_blocks(&validate(value), ids)
}

/// Strict decoding of a serialized block list.
pub fn parse_blocks(json: &str) -> EditorResult<Vec<EditorBlock>> {
    Ok(serde_json::from_str(json)?)
}

/// Inverse of [`tiptap_to_blocks`]. List blocks become single-item lists,
/// newlines become hard breaks (or separate paragraphs inside a
/// blockquote), and the result is repaired.
pub fn blocks_to_tiptap(blocks: &[EditorBlock]) -> TipTapDocument {
    let content = blocks.iter().map(block_to_node).collect();
    repair(TipTapDocument::new(content))
}

fn node_to_block(node: &TipTapNode, ids: &mut impl IdSource) -> Option<EditorBlock> {
    let (block_type, spans) = match node.kind() {
        NodeKind::Paragraph => (BlockType::Paragraph, inline_spans(node.children())),
        NodeKind::Heading => {
            let spans = inline_spans(node.children());
            return Some(EditorBlock::heading(ids.next_id(), node.heading_level(), spans));
        }
        NodeKind::BulletList => (BlockType::BulletList, list_spans(node)),
        NodeKind::OrderedList => (BlockType::OrderedList, list_spans(node)),
        NodeKind::Blockquote => (BlockType::Blockquote, joined_spans(node.children())),
        NodeKind::CodeBlock => {
            if let Some(language) = node.language() {
                debug!(language, "block model drops code block language");
            }
            (BlockType::CodeBlock, vec![TextSpan::plain(node.text_content())])
        }
        NodeKind::HorizontalRule => {
            debug!("block model drops horizontal rule");
            return None;
        }
        _ => {
            let text = node.text_content();
            if text.is_empty() {
                debug!(node = %node.node_type, "dropping empty node");
                return None;
            }
            (BlockType::Paragraph, vec![TextSpan::plain(text)])
        }
    };

    Some(EditorBlock::new(ids.next_id(), block_type, spans))
}

fn list_spans(list: &TipTapNode) -> Vec<TextSpan> {
    let items = list.children();
    if items.len() > 1 {
        debug!(
            list = %list.node_type,
            dropped = items.len() - 1,
            "block model keeps only the first list item"
        );
    }

    match items.first() {
        Some(item) => joined_spans(item.children()),
        None => vec![TextSpan::plain("")],
    }
}

/// Spans of several blocks, separated by newlines. Nested lists are skipped.
fn joined_spans(children: &[TipTapNode]) -> Vec<TextSpan> {
    let mut spans = Vec::new();
    let mut first = true;

    for child in children {
        if child.kind().is_list() {
            debug!("block model drops nested list");
            continue;
        }
        if !first {
            spans.push(TextSpan::plain("\n"));
        }
        first = false;

        match child.kind() {
            NodeKind::Paragraph | NodeKind::Heading => spans.extend(raw_spans(child.children())),
            _ => spans.push(TextSpan::plain(child.text_content())),
        }
    }

    merge_adjacent_spans(spans)
}

fn inline_spans(nodes: &[TipTapNode]) -> Vec<TextSpan> {
    merge_adjacent_spans(raw_spans(nodes))
}

fn raw_spans(nodes: &[TipTapNode]) -> Vec<TextSpan> {
    nodes
        .iter()
        .map(|node| match node.kind() {
            NodeKind::Text => TextSpan::new(node.text_str(), span_marks(node)),
            NodeKind::HardBreak => TextSpan::plain("\n"),
            _ => TextSpan::plain(node.text_content()),
        })
        .collect()
}

fn span_marks(node: &TipTapNode) -> SpanMarks {
    let mut marks = SpanMarks::default();
    for mark in node.marks() {
        match SpanMark::from_mark_kind(mark.kind()) {
            Some(span_mark) => marks.set(span_mark, true),
            None => debug!(mark = %mark.mark_type, "block model drops mark"),
        }
    }
    marks
}

fn block_to_node(block: &EditorBlock) -> TipTapNode {
    match block.block_type {
        BlockType::Paragraph => TipTapNode::paragraph(inline_nodes(&block.spans)),
        BlockType::Heading => {
            let level = block.level.unwrap_or(1).clamp(1, 6);
            TipTapNode::heading(level, inline_nodes(&block.spans))
        }
        BlockType::BulletList => single_item_list(NodeKind::BulletList, &block.spans),
        BlockType::OrderedList => single_item_list(NodeKind::OrderedList, &block.spans),
        BlockType::Blockquote => TipTapNode::blockquote(
            split_lines(&block.spans)
                .iter()
                .map(|line| TipTapNode::paragraph(inline_nodes(line)))
                .collect(),
        ),
        BlockType::CodeBlock => TipTapNode::code_block(spans_text(&block.spans), None),
    }
}

fn single_item_list(kind: NodeKind, spans: &[TextSpan]) -> TipTapNode {
    let paragraph = TipTapNode::paragraph(inline_nodes(spans));
    TipTapNode::list(kind, vec![TipTapNode::list_item(vec![paragraph])])
}

fn inline_nodes(spans: &[TextSpan]) -> Vec<TipTapNode> {
    let mut nodes = Vec::new();
    for span in spans {
        for (i, line) in span.text.split('\n').enumerate() {
            if i > 0 {
                nodes.push(TipTapNode::hard_break());
            }
            if !line.is_empty() {
                nodes.push(text_node(line, span.mark_set()));
            }
        }
    }
    nodes
}

fn text_node(text: &str, marks: SpanMarks) -> TipTapNode {
    TipTapNode::text(text).with_marks(marks.iter().map(|mark| Mark::new(mark.mark_kind())).collect())
}

fn split_lines(spans: &[TextSpan]) -> Vec<Vec<TextSpan>> {
    let mut lines = vec![Vec::new()];
    for span in spans {
        for (i, part) in span.text.split('\n').enumerate() {
            if i > 0 {
                lines.push(Vec::new());
            }
            if part.is_empty() {
                continue;
            }
            if let Some(line) = lines.last_mut() {
                line.push(TextSpan {
                    text: part.to_string(),
                    marks: span.marks,
                });
            }
        }
    }
    lines
}
