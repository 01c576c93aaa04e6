//! Render-only block list for native views.
//!
//! Reads TipTap nodes directly, without going through HTML, and flattens
//! nested lists into numbered, depth-annotated items.

use crate::config::ConverterOptions;
use crate::table::flatten_table;
use crate::tiptap::{MarkKind, NodeKind, TipTapDocument, TipTapNode};
use crate::validator::Repairer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Formatting of a run, flattened from the node's mark list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub code: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyledRun {
    pub text: String,
    pub style: RunStyle,
}

impl StyledRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: RunStyle::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RenderBlock {
    Paragraph {
        runs: Vec<StyledRun>,
    },
    Heading {
        level: u8,
        runs: Vec<StyledRun>,
    },
    #[serde(rename_all = "camelCase")]
    ListItem {
        ordered: bool,
        /// Item number for ordered lists.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        number: Option<u64>,
        /// 0 for top-level lists.
        depth: usize,
        runs: Vec<StyledRun>,
    },
    Blockquote {
        children: Vec<RenderBlock>,
    },
    CodeBlock {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        language: Option<String>,
        code: String,
    },
    HorizontalRule,
}

impl RenderBlock {
    /// Plain text of the block's runs or code.
    pub fn text(&self) -> String {
        match self {
            RenderBlock::Paragraph { runs }
            | RenderBlock::Heading { runs, .. }
            | RenderBlock::ListItem { runs, .. } => runs.iter().map(|r| r.text.as_str()).collect(),
            RenderBlock::Blockquote { children } => children
                .iter()
                .map(RenderBlock::text)
                .collect::<Vec<_>>()
                .join("\n"),
            RenderBlock::CodeBlock { code, .. } => code.clone(),
            RenderBlock::HorizontalRule => String::new(),
        }
    }
}

pub struct BlockRenderer<'a> {
    options: &'a ConverterOptions,
}

impl<'a> BlockRenderer<'a> {
    pub fn new(options: &'a ConverterOptions) -> Self {
        Self { options }
    }

    pub fn render(&self, doc: &TipTapDocument) -> Vec<RenderBlock> {
        let mut blocks = Vec::new();
        for node in &doc.content {
            self.render_block(node, &mut blocks);
        }
        blocks
    }

    fn render_block(&self, node: &TipTapNode, out: &mut Vec<RenderBlock>) {
        match node.kind() {
            NodeKind::Paragraph => out.push(RenderBlock::Paragraph {
                runs: inline_runs(node.children()),
            }),
            NodeKind::Heading => out.push(RenderBlock::Heading {
                level: node.heading_level(),
                runs: inline_runs(node.children()),
            }),
            NodeKind::BulletList | NodeKind::OrderedList => self.render_list(node, 0, out),
            NodeKind::Blockquote => {
                let mut children = Vec::new();
                for child in node.children() {
                    self.render_block(child, &mut children);
                }
                out.push(RenderBlock::Blockquote { children });
            }
            NodeKind::CodeBlock => out.push(RenderBlock::CodeBlock {
                language: node.language().map(str::to_string),
                code: node.text_content(),
            }),
            NodeKind::HorizontalRule => out.push(RenderBlock::HorizontalRule),
            NodeKind::Table => {
                for paragraph in flatten_table(node, self.options) {
                    self.render_block(&paragraph, out);
                }
            }
            NodeKind::Text | NodeKind::HardBreak => out.push(RenderBlock::Paragraph {
                runs: inline_runs(std::slice::from_ref(node)),
            }),
            _ => {
                if node.content.is_some() {
                    for child in node.children() {
                        self.render_block(child, out);
                    }
                } else if !node.text_str().is_empty() {
                    out.push(RenderBlock::Paragraph {
                        runs: vec![StyledRun::plain(node.text_str())],
                    });
                }
            }
        }
    }

    fn render_list(&self, list: &TipTapNode, depth: usize, out: &mut Vec<RenderBlock>) {
        let ordered = list.kind() == NodeKind::OrderedList;
        let start = list.list_start();

        for (index, item) in list.children().iter().enumerate() {
            let mut runs = Vec::new();
            let mut nested = Vec::new();

            for child in item.children() {
                if child.kind().is_list() {
                    nested.push(child);
                    continue;
                }
                if !runs.is_empty() {
                    runs.push(StyledRun::plain("\n"));
                }
                match child.kind() {
                    NodeKind::Paragraph | NodeKind::Heading => {
                        runs.extend(inline_runs(child.children()))
                    }
                    _ => runs.push(StyledRun::plain(child.text_content())),
                }
            }

            out.push(RenderBlock::ListItem {
                ordered,
                number: ordered.then(|| start.saturating_add(index as u64)),
                depth,
                runs,
            });

            for list in nested {
                self.render_list(list, depth + 1, out);
            }
        }
    }
}

fn run_style(node: &TipTapNode) -> RunStyle {
    let mut style = RunStyle::default();
    for mark in node.marks() {
        match mark.kind() {
            MarkKind::Bold => style.bold = true,
            MarkKind::Italic => style.italic = true,
            MarkKind::Underline => style.underline = true,
            MarkKind::Strike => style.strikethrough = true,
            MarkKind::Code => style.code = true,
            MarkKind::Link => style.link = mark.href().map(str::to_string),
            MarkKind::Unknown => {}
        }
    }
    style
}

fn inline_runs(nodes: &[TipTapNode]) -> Vec<StyledRun> {
    nodes
        .iter()
        .filter_map(|node| match node.kind() {
            NodeKind::Text => Some(StyledRun {
                text: node.text_str().to_string(),
                style: run_style(node),
            }),
            NodeKind::HardBreak => Some(StyledRun::plain("\n")),
            _ => {
                let text = node.text_content();
                (!text.is_empty()).then(|| StyledRun::plain(text))
            }
        })
        .collect()
}

/// Render a document that is already known to be valid.
pub fn render_blocks(doc: &TipTapDocument) -> Vec<RenderBlock> {
    BlockRenderer::new(&ConverterOptions::default()).render(doc)
}

/// Validate untyped JSON, then render it.
pub fn render_blocks_from_json(value: &Value) -> Vec<RenderBlock> {
    let options = ConverterOptions::default();
    let doc = Repairer::new(&options).validate(value);
    BlockRenderer::new(&options).render(&doc)
}
