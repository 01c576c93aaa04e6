use crate::config::ConverterOptions;
use crate::error::DocumentResult;
use crate::tiptap::{Mark, MarkKind, NodeKind, TipTapDocument, TipTapNode};
use crate::validator::Repairer;
use notebridge_parser::{ParsedElement, Parser};
use serde_json::Value;
use tracing::debug;

/// Maps parsed HTML onto TipTap nodes.
///
/// Inline wrappers (`strong`, `em`, `a`, ...) follow a fixed rule: when the
/// wrapper holds exactly one child and that child becomes a text node, the
/// wrapper's mark is added to it. Any other wrapper is flattened into a
/// single text node carrying only the wrapper's own mark, so formatting
/// nested inside multi-child wrappers is dropped. Stored notes depend on
/// this, keep it as is.
#[derive(Debug, Clone, Default)]
pub struct HtmlConverter {
    options: ConverterOptions,
}

impl HtmlConverter {
    pub fn new(options: ConverterOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ConverterOptions {
        &self.options
    }

    /// Convert an HTML string into a repaired document. Never fails; missing
    /// or blank input gives the canonical empty document.
    pub fn convert(&self, html: Option<&str>) -> TipTapDocument {
        let Some(html) = html.filter(|h| !h.trim().is_empty()) else {
            return TipTapDocument::empty();
        };

        let mut parser = Parser::with_options(html, self.options.parser.clone());
        let parsed = parser.parse();
        if !parser.diagnostics().is_empty() {
            debug!(
                count = parser.diagnostics().len(),
                "html conversion absorbed malformed input"
            );
        }

        self.convert_parsed(&parsed)
    }

    /// Like [`HtmlConverter::convert`], but fails if any part of the input
    /// had to be absorbed as literal text.
    pub fn try_convert(&self, html: &str) -> DocumentResult<TipTapDocument> {
        let mut parser = Parser::with_options(html, self.options.parser.clone());
        let parsed = parser.parse();
        if let Some(err) = parser.diagnostics().first() {
            return Err(err.clone().into());
        }
        Ok(self.convert_parsed(&parsed))
    }

    pub fn convert_parsed(&self, parsed: &[ParsedElement]) -> TipTapDocument {
        let content = self.block_content(parsed);
        Repairer::new(&self.options).repair(TipTapDocument::new(content))
    }

    /// Map one parsed node. `None` means the node is dropped.
    ///
    /// Tables come back as intermediate `table` nodes; they are flattened
    /// into paragraphs when the document is repaired.
    pub fn to_tiptap(&self, element: &ParsedElement) -> Option<TipTapNode> {
        match element {
            ParsedElement::Text { text } => {
                if text.is_empty() {
                    None
                } else {
                    Some(TipTapNode::text(decode(text)))
                }
            }
            ParsedElement::Element { tag_name, .. } => self.convert_element(tag_name, element),
        }
    }

    fn convert_element(&self, tag: &str, element: &ParsedElement) -> Option<TipTapNode> {
        let children = element.children();

        match tag {
            "p" => Some(TipTapNode::paragraph(non_empty(self.inline_content(children)))),
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = tag[1..].parse::<u8>().unwrap_or(1);
                Some(TipTapNode::heading(level, non_empty(self.inline_content(children))))
            }
            "ul" => self.convert_list(NodeKind::BulletList, element),
            "ol" => self.convert_list(NodeKind::OrderedList, element),
            "li" => Some(self.convert_list_item(children)),
            "blockquote" => {
                let mut content = self.block_content(children);
                if content.is_empty() {
                    content.push(TipTapNode::empty_paragraph());
                }
                Some(TipTapNode::blockquote(content))
            }
            "pre" => Some(TipTapNode::code_block(
                decode(&element.text_content()),
                code_language(element),
            )),
            "br" => Some(TipTapNode::hard_break()),
            "hr" => Some(TipTapNode::horizontal_rule()),
            "div" => {
                let content = self.inline_content(children);
                let has_content = content
                    .iter()
                    .any(|n| n.kind() != NodeKind::Text || !n.text_str().is_empty());
                if has_content {
                    Some(TipTapNode::paragraph(content))
                } else {
                    debug!("dropping empty div");
                    None
                }
            }
            "strong" | "b" => self.convert_mark(element, Mark::new(MarkKind::Bold)),
            "em" | "i" => self.convert_mark(element, Mark::new(MarkKind::Italic)),
            "u" => self.convert_mark(element, Mark::new(MarkKind::Underline)),
            "s" | "strike" => self.convert_mark(element, Mark::new(MarkKind::Strike)),
            "code" => self.convert_mark(element, Mark::new(MarkKind::Code)),
            "a" => {
                let mark = match element.attr("href") {
                    Some(href) => Mark::link(decode(href)),
                    None => Mark::new(MarkKind::Link),
                };
                self.convert_mark(element, mark)
            }
            "table" => Some(self.convert_table_part(NodeKind::Table, children)),
            "thead" | "tbody" | "tfoot" => {
                Some(self.convert_table_part(NodeKind::TableRowGroup, children))
            }
            "tr" => Some(self.convert_table_part(NodeKind::TableRow, children)),
            "td" => Some(self.convert_table_cell(NodeKind::TableCell, children)),
            "th" => Some(self.convert_table_cell(NodeKind::TableHeader, children)),
            _ => {
                let text = element.text_content();
                if text.is_empty() {
                    None
                } else {
                    Some(TipTapNode::text(decode(&text)))
                }
            }
        }
    }

    fn convert_mark(&self, element: &ParsedElement, mark: Mark) -> Option<TipTapNode> {
        if let [only] = element.children() {
            if let Some(mut node) = self.to_tiptap(only).filter(|n| n.kind() == NodeKind::Text) {
                node.add_mark(mark);
                return Some(node);
            }
        }

        let text = decode(&element.text_content());
        if text.is_empty() {
            return None;
        }
        Some(TipTapNode::text(text).with_mark(mark))
    }

    fn convert_list(&self, kind: NodeKind, element: &ParsedElement) -> Option<TipTapNode> {
        let mut items: Vec<TipTapNode> = Vec::new();

        for child in element.children() {
            if child.is_tag("li") {
                items.push(self.convert_list_item(child.children()));
                continue;
            }
            if let ParsedElement::Text { text } = child {
                if text.trim().is_empty() {
                    continue;
                }
            }

            let Some(node) = self.to_tiptap(child) else {
                continue;
            };
            if node.kind().is_list() {
                // Legacy markup puts nested lists directly inside the list.
                match items.last_mut() {
                    Some(last) => last.content.get_or_insert_with(Vec::new).push(node),
                    None => items.push(TipTapNode::list_item(vec![
                        TipTapNode::empty_paragraph(),
                        node,
                    ])),
                }
            } else if node.is_inline() {
                items.push(TipTapNode::list_item(vec![TipTapNode::paragraph(vec![node])]));
            } else {
                items.push(TipTapNode::list_item(vec![node]));
            }
        }

        if items.is_empty() {
            debug!(list = kind.as_str(), "dropping list without items");
            return None;
        }

        let mut list = TipTapNode::list(kind, items);
        if kind == NodeKind::OrderedList {
            let start = element
                .attr("start")
                .and_then(|s| s.trim().parse::<u64>().ok())
                .filter(|&start| start != 1);
            if let Some(start) = start {
                list = list.with_attr("start", Value::from(start));
            }
        }
        Some(list)
    }

    fn convert_list_item(&self, children: &[ParsedElement]) -> TipTapNode {
        let mut content = self.block_content(children);
        if content.is_empty() {
            content.push(TipTapNode::empty_paragraph());
        }
        TipTapNode::list_item(content)
    }

    fn convert_table_part(&self, kind: NodeKind, children: &[ParsedElement]) -> TipTapNode {
        let content = children
            .iter()
            .filter(|c| !c.is_text())
            .filter_map(|c| self.to_tiptap(c))
            .collect();
        TipTapNode::new(kind).with_content(content)
    }

    fn convert_table_cell(&self, kind: NodeKind, children: &[ParsedElement]) -> TipTapNode {
        let mut content = self.block_content(children);
        if content.is_empty() {
            content.push(TipTapNode::empty_paragraph());
        }
        TipTapNode::new(kind).with_content(content)
    }

    /// Convert children for a block container. Runs of inline nodes are
    /// wrapped into paragraphs; runs that are only whitespace are dropped.
    fn block_content(&self, children: &[ParsedElement]) -> Vec<TipTapNode> {
        let mut blocks = Vec::new();
        let mut run = Vec::new();

        for child in children {
            let Some(node) = self.to_tiptap(child) else {
                continue;
            };
            if node.is_inline() {
                run.push(node);
            } else {
                flush_inline_run(&mut blocks, &mut run);
                blocks.push(node);
            }
        }
        flush_inline_run(&mut blocks, &mut run);

        blocks
    }

    /// Convert children for an inline container. Block nodes found here
    /// contribute their inline content, separated by hard breaks.
    fn inline_content(&self, children: &[ParsedElement]) -> Vec<TipTapNode> {
        let mut out = Vec::new();

        for child in children {
            let Some(node) = self.to_tiptap(child) else {
                continue;
            };
            if node.is_inline() {
                out.push(node);
                continue;
            }

            let lifted = lift_inline(node);
            if lifted.is_empty() {
                continue;
            }
            if !out.is_empty() {
                out.push(TipTapNode::hard_break());
            }
            out.extend(lifted);
        }

        out
    }
}

fn flush_inline_run(blocks: &mut Vec<TipTapNode>, run: &mut Vec<TipTapNode>) {
    if run.is_empty() {
        return;
    }
    let blank = run
        .iter()
        .all(|n| n.kind() == NodeKind::Text && n.text_str().trim().is_empty());
    let nodes = std::mem::take(run);
    if blank {
        return;
    }
    blocks.push(TipTapNode::paragraph(nodes));
}

/// Inline content of a block, with hard breaks between its child blocks.
fn lift_inline(node: TipTapNode) -> Vec<TipTapNode> {
    if node.is_inline() {
        return vec![node];
    }

    let mut out = Vec::new();
    for child in node.content.unwrap_or_default() {
        let child_is_block = !child.is_inline();
        let lifted = lift_inline(child);
        if lifted.is_empty() {
            continue;
        }
        if child_is_block && !out.is_empty() {
            out.push(TipTapNode::hard_break());
        }
        out.extend(lifted);
    }
    out
}

fn non_empty(mut content: Vec<TipTapNode>) -> Vec<TipTapNode> {
    if content.is_empty() {
        content.push(TipTapNode::empty_text());
    }
    content
}

fn decode(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}

/// `language-xxx` class of a `<code>` child, as written by the serializer.
fn code_language(pre: &ParsedElement) -> Option<String> {
    let code = pre.children().iter().find(|c| c.is_tag("code"))?;
    code.attr("class")?
        .split_whitespace()
        .find_map(|class| class.strip_prefix("language-"))
        .filter(|language| !language.is_empty())
        .map(str::to_string)
}

/// Convert an HTML string with default options.
///
/// `None`, the empty string and whitespace-only input all produce the
/// canonical empty document.
pub fn html_to_tiptap(html: Option<&str>) -> TipTapDocument {
    HtmlConverter::default().convert(html)
}

/// Map a single parsed node with default options.
pub fn to_tiptap(element: &ParsedElement) -> Option<TipTapNode> {
    HtmlConverter::default().to_tiptap(element)
}
