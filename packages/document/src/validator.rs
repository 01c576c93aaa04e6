//! Self-healing validation for TipTap JSON of any provenance.
//!
//! Whatever comes in, what goes out satisfies the document invariants:
//! - the root is a `doc` with at least one block;
//! - every paragraph and heading has non-empty inline content;
//! - lists hold only list items, and list items hold only blocks;
//! - no `table` node survives.

use crate::config::ConverterOptions;
use crate::table::flatten_table;
use crate::tiptap::{Mark, MarkKind, NodeKind, TipTapDocument, TipTapNode, DOC};
use serde_json::Value;
use tracing::debug;

/// Repairs typed documents against the invariants.
pub struct Repairer<'a> {
    options: &'a ConverterOptions,
}

impl<'a> Repairer<'a> {
    pub fn new(options: &'a ConverterOptions) -> Self {
        Self { options }
    }

    /// Validate untyped JSON. Total: anything that is not a `doc` object with
    /// a `content` array yields the canonical empty document.
    pub fn validate(&self, value: &Value) -> TipTapDocument {
        let Some(root) = value.as_object() else {
            debug!("document root is not an object");
            return TipTapDocument::empty();
        };
        if root.get("type").and_then(Value::as_str) != Some(DOC) {
            debug!("document root is not of type doc");
            return TipTapDocument::empty();
        }
        let Some(items) = root.get("content").and_then(Value::as_array) else {
            debug!("document root has no content array");
            return TipTapDocument::empty();
        };

        let limit = self.options.parser.max_depth;
        let content = items
            .iter()
            .filter_map(|item| node_from_value(item, 1, limit))
            .collect();
        self.repair(TipTapDocument::new(content))
    }

    pub fn repair(&self, doc: TipTapDocument) -> TipTapDocument {
        let content = self.repair_blocks(doc.content);
        if content.is_empty() {
            return TipTapDocument::empty();
        }
        TipTapDocument::new(content)
    }

    fn repair_blocks(&self, nodes: Vec<TipTapNode>) -> Vec<TipTapNode> {
        let mut out = Vec::with_capacity(nodes.len());
        let mut run = Vec::new();

        for node in nodes {
            match node.kind() {
                NodeKind::Text | NodeKind::HardBreak => {
                    if is_valid_inline(&node) {
                        run.push(clean_marks(node));
                    } else {
                        debug!("dropping text node without text");
                    }
                }
                NodeKind::Table => {
                    flush_run(&mut out, &mut run);
                    out.extend(flatten_table(&node, self.options));
                }
                NodeKind::TableRow
                | NodeKind::TableRowGroup
                | NodeKind::TableCell
                | NodeKind::TableHeader => {
                    flush_run(&mut out, &mut run);
                    debug!(node = %node.node_type, "flattening stray table part");
                    out.push(TipTapNode::paragraph(vec![TipTapNode::text(node.text_content())]));
                }
                _ => {
                    flush_run(&mut out, &mut run);
                    if let Some(block) = self.repair_block(node) {
                        out.push(block);
                    }
                }
            }
        }
        flush_run(&mut out, &mut run);

        out
    }

    fn repair_block(&self, mut node: TipTapNode) -> Option<TipTapNode> {
        match node.kind() {
            NodeKind::Paragraph => {
                node.content = Some(repair_inline(node.content.take()));
                Some(node)
            }
            NodeKind::Heading => {
                let valid_level = node
                    .attr("level")
                    .and_then(Value::as_u64)
                    .is_some_and(|level| (1..=6).contains(&level));
                if !valid_level {
                    debug!("normalising heading level");
                    let level = node.heading_level();
                    node = node.with_attr("level", Value::from(level));
                }
                node.content = Some(repair_inline(node.content.take()));
                Some(node)
            }
            NodeKind::BulletList | NodeKind::OrderedList => self.repair_list(node),
            NodeKind::ListItem => {
                debug!("wrapping stray list item in a bullet list");
                let item = self.repair_list_item(node);
                Some(TipTapNode::list(NodeKind::BulletList, vec![item]))
            }
            NodeKind::Blockquote => {
                let mut content = self.repair_blocks(node.content.take().unwrap_or_default());
                if content.is_empty() {
                    content.push(TipTapNode::empty_paragraph());
                }
                node.content = Some(content);
                Some(node)
            }
            NodeKind::CodeBlock => {
                let code: String = node
                    .children()
                    .iter()
                    .filter(|n| n.kind() == NodeKind::Text)
                    .map(TipTapNode::text_str)
                    .collect();
                node.content = if code.is_empty() {
                    None
                } else {
                    Some(vec![TipTapNode::text(code)])
                };
                node.marks = None;
                Some(node)
            }
            NodeKind::HorizontalRule => {
                node.content = None;
                Some(node)
            }
            _ => {
                if let Some(content) = node.content.take() {
                    node.content = Some(self.repair_blocks(content));
                }
                Some(node)
            }
        }
    }

    fn repair_list(&self, mut node: TipTapNode) -> Option<TipTapNode> {
        let mut items: Vec<TipTapNode> = Vec::new();

        for child in node.content.take().unwrap_or_default() {
            match child.kind() {
                NodeKind::ListItem => items.push(self.repair_list_item(child)),
                NodeKind::BulletList | NodeKind::OrderedList => {
                    let Some(nested) = self.repair_list(child) else {
                        continue;
                    };
                    match items.last_mut() {
                        Some(last) => last.content.get_or_insert_with(Vec::new).push(nested),
                        None => items.push(TipTapNode::list_item(vec![
                            TipTapNode::empty_paragraph(),
                            nested,
                        ])),
                    }
                }
                _ => {
                    let blocks = self.repair_blocks(vec![child]);
                    if !blocks.is_empty() {
                        debug!("wrapping non-item list child");
                        items.push(self.repair_list_item(TipTapNode::list_item(blocks)));
                    }
                }
            }
        }

        if items.is_empty() {
            debug!(list = %node.node_type, "dropping empty list");
            return None;
        }
        node.content = Some(items);
        Some(node)
    }

    fn repair_list_item(&self, mut item: TipTapNode) -> TipTapNode {
        let mut content = self.repair_blocks(item.content.take().unwrap_or_default());
        let starts_with_paragraph = content
            .first()
            .is_some_and(|n| n.kind() == NodeKind::Paragraph);
        if !starts_with_paragraph {
            content.insert(0, TipTapNode::empty_paragraph());
        }
        item.content = Some(content);
        item.marks = None;
        item.text = None;
        item
    }
}

fn flush_run(out: &mut Vec<TipTapNode>, run: &mut Vec<TipTapNode>) {
    if !run.is_empty() {
        out.push(TipTapNode::paragraph(merge_text(std::mem::take(run))));
    }
}

fn is_valid_inline(node: &TipTapNode) -> bool {
    match node.kind() {
        NodeKind::Text => node.text.is_some(),
        NodeKind::HardBreak => true,
        _ => false,
    }
}

fn mark_rank(mark: &Mark) -> usize {
    MarkKind::WRAP_ORDER
        .iter()
        .position(|&kind| kind == mark.kind())
        .unwrap_or(MarkKind::WRAP_ORDER.len())
}

/// Drop untyped and duplicate marks, then sort into wrapping order.
/// Unknown marks keep their relative order after the known ones.
fn clean_marks(mut node: TipTapNode) -> TipTapNode {
    if let Some(marks) = node.marks.take() {
        let mut cleaned: Vec<Mark> = Vec::with_capacity(marks.len());
        for mark in marks {
            if mark.mark_type.is_empty() || cleaned.iter().any(|m| m.mark_type == mark.mark_type) {
                continue;
            }
            cleaned.push(mark);
        }
        cleaned.sort_by_key(mark_rank);
        node = node.with_marks(cleaned);
    }
    node
}

/// Merge neighbouring text nodes that carry the same marks.
fn merge_text(nodes: Vec<TipTapNode>) -> Vec<TipTapNode> {
    let mut out: Vec<TipTapNode> = Vec::with_capacity(nodes.len());
    for node in nodes {
        if let Some(last) = out.last_mut() {
            let mergeable = node.kind() == NodeKind::Text
                && last.kind() == NodeKind::Text
                && last.marks == node.marks;
            if mergeable {
                last.text.get_or_insert_with(String::new).push_str(node.text_str());
                continue;
            }
        }
        out.push(node);
    }
    out
}

/// Keep only valid inline children; never leave the content empty.
fn repair_inline(content: Option<Vec<TipTapNode>>) -> Vec<TipTapNode> {
    let mut inline = Vec::new();
    for node in content.unwrap_or_default() {
        if is_valid_inline(&node) {
            inline.push(clean_marks(node));
        } else {
            debug!(node = %node.node_type, "dropping invalid inline child");
        }
    }
    if inline.is_empty() {
        inline.push(TipTapNode::empty_text());
    }
    merge_text(inline)
}

/// Lenient conversion of one JSON node. Entries without a string `type` are
/// dropped. A node at `limit` depth is replaced by a text node holding all of
/// its text.
fn node_from_value(value: &Value, depth: usize, limit: usize) -> Option<TipTapNode> {
    let object = value.as_object()?;
    let Some(node_type) = object
        .get("type")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
    else {
        debug!("dropping node without a type");
        return None;
    };

    if depth >= limit && object.get("content").is_some_and(Value::is_array) {
        debug!(node = node_type, limit, "flattening deeply nested json node");
        return Some(TipTapNode::text(value_text(value)));
    }

    let content = object
        .get("content")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| node_from_value(item, depth + 1, limit))
                .collect()
        });
    let marks = object
        .get("marks")
        .and_then(Value::as_array)
        .map(|marks| marks.iter().filter_map(mark_from_value).collect::<Vec<_>>())
        .filter(|marks| !marks.is_empty());

    Some(TipTapNode {
        node_type: node_type.to_string(),
        attrs: object.get("attrs").and_then(Value::as_object).cloned(),
        content,
        marks,
        text: object.get("text").and_then(Value::as_str).map(str::to_string),
    })
}

/// All `text` strings below a JSON node, in document order. Iterative, so
/// any depth is safe.
fn value_text(value: &Value) -> String {
    let mut out = String::new();
    let mut stack = vec![value];
    while let Some(value) = stack.pop() {
        let Some(object) = value.as_object() else {
            continue;
        };
        if let Some(text) = object.get("text").and_then(Value::as_str) {
            out.push_str(text);
        }
        if let Some(items) = object.get("content").and_then(Value::as_array) {
            stack.extend(items.iter().rev());
        }
    }
    out
}

fn mark_from_value(value: &Value) -> Option<Mark> {
    let object = value.as_object()?;
    let mark_type = object.get("type")?.as_str().filter(|t| !t.is_empty())?;
    Some(Mark {
        mark_type: mark_type.to_string(),
        attrs: object.get("attrs").and_then(Value::as_object).cloned(),
    })
}

/// Validate untyped JSON with default options.
pub fn validate(value: &Value) -> TipTapDocument {
    Repairer::new(&ConverterOptions::default()).validate(value)
}

/// Validate raw JSON text; malformed JSON yields the canonical empty document.
pub fn validate_json_str(json: &str) -> TipTapDocument {
    match serde_json::from_str::<Value>(json) {
        Ok(value) => validate(&value),
        Err(err) => {
            debug!(error = %err, "document json does not parse");
            TipTapDocument::empty()
        }
    }
}

/// Repair a typed document with default options.
pub fn repair(doc: TipTapDocument) -> TipTapDocument {
    Repairer::new(&ConverterOptions::default()).repair(doc)
}
