use crate::config::ConverterOptions;
use crate::table::row_texts;
use crate::tiptap::{Mark, MarkKind, NodeKind, TipTapDocument, TipTapNode};
use crate::validator::Repairer;
use serde_json::Value;

const TABLE_FALLBACK_STYLE: &str =
    "border:1px solid #d0d7de;border-radius:6px;padding:8px 12px;margin:8px 0;font-family:monospace;";

struct Context<'a> {
    options: &'a ConverterOptions,
    buffer: String,
}

impl<'a> Context<'a> {
    fn new(options: &'a ConverterOptions) -> Self {
        Self {
            options,
            buffer: String::new(),
        }
    }

    fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn get_output(self) -> String {
        self.buffer
    }
}

/// Serializes TipTap nodes to the HTML the editing surface consumes.
///
/// This is a structural inverse of the HTML converter. It never fails:
/// unknown nodes serialize their children, or their escaped text.
#[derive(Debug, Clone, Default)]
pub struct HtmlSerializer {
    options: ConverterOptions,
}

impl HtmlSerializer {
    pub fn new(options: ConverterOptions) -> Self {
        Self { options }
    }

    pub fn serialize_node(&self, node: &TipTapNode) -> String {
        let mut ctx = Context::new(&self.options);
        write_node(node, &mut ctx);
        ctx.get_output()
    }

    /// Serialize a document as-is, without repairing it first.
    pub fn serialize_document(&self, doc: &TipTapDocument) -> String {
        let mut ctx = Context::new(&self.options);
        for node in &doc.content {
            write_node(node, &mut ctx);
        }
        ctx.get_output()
    }

    /// Repair, then serialize.
    pub fn serialize_validated(&self, doc: &TipTapDocument) -> String {
        let repaired = Repairer::new(&self.options).repair(doc.clone());
        self.serialize_document(&repaired)
    }

    /// Validate untyped JSON, then serialize.
    pub fn serialize_json(&self, value: &Value) -> String {
        let doc = Repairer::new(&self.options).validate(value);
        self.serialize_document(&doc)
    }
}

fn write_children(node: &TipTapNode, ctx: &mut Context) {
    for child in node.children() {
        write_node(child, ctx);
    }
}

fn write_wrapped(tag: &str, node: &TipTapNode, ctx: &mut Context) {
    ctx.add(&format!("<{}>", tag));
    write_children(node, ctx);
    ctx.add(&format!("</{}>", tag));
}

fn write_node(node: &TipTapNode, ctx: &mut Context) {
    match node.kind() {
        NodeKind::Doc => write_children(node, ctx),
        NodeKind::Paragraph => write_wrapped("p", node, ctx),
        NodeKind::Heading => write_wrapped(&format!("h{}", node.heading_level()), node, ctx),
        NodeKind::BulletList => write_wrapped("ul", node, ctx),
        NodeKind::OrderedList => {
            let start = node.list_start();
            if start == 1 {
                ctx.add("<ol>");
            } else {
                ctx.add(&format!("<ol start=\"{}\">", start));
            }
            write_children(node, ctx);
            ctx.add("</ol>");
        }
        NodeKind::ListItem => write_wrapped("li", node, ctx),
        NodeKind::Blockquote => write_wrapped("blockquote", node, ctx),
        NodeKind::CodeBlock => {
            match node.language() {
                Some(language) => ctx.add(&format!(
                    "<pre><code class=\"language-{}\">",
                    escape_html(language)
                )),
                None => ctx.add("<pre><code>"),
            }
            ctx.add(&escape_html(&node.text_content()));
            ctx.add("</code></pre>");
        }
        NodeKind::HardBreak => ctx.add("<br>"),
        NodeKind::HorizontalRule => ctx.add("<hr>"),
        NodeKind::Text => {
            let html = text_html(node);
            ctx.add(&html);
        }
        NodeKind::Table => write_table_fallback(node, ctx),
        NodeKind::TableRow
        | NodeKind::TableRowGroup
        | NodeKind::TableCell
        | NodeKind::TableHeader
        | NodeKind::Unknown => {
            if node.content.is_some() {
                write_children(node, ctx);
            } else {
                ctx.add(&escape_html(node.text_str()));
            }
        }
    }
}

/// Escaped text wrapped in its marks. Marks are applied in a fixed order
/// (bold innermost, link outermost) regardless of their order on the node.
fn text_html(node: &TipTapNode) -> String {
    let mut html = escape_html(node.text_str());
    for kind in MarkKind::WRAP_ORDER {
        if let Some(mark) = node.marks().iter().find(|m| m.kind() == kind) {
            html = wrap_mark(mark, html);
        }
    }
    html
}

fn wrap_mark(mark: &Mark, inner: String) -> String {
    match mark.kind() {
        MarkKind::Bold => format!("<strong>{}</strong>", inner),
        MarkKind::Italic => format!("<em>{}</em>", inner),
        MarkKind::Underline => format!("<u>{}</u>", inner),
        MarkKind::Strike => format!("<s>{}</s>", inner),
        MarkKind::Code => format!("<code>{}</code>", inner),
        MarkKind::Link => match mark.href() {
            Some(href) => format!("<a href=\"{}\">{}</a>", escape_html(href), inner),
            None => format!("<a>{}</a>", inner),
        },
        MarkKind::Unknown => inner,
    }
}

/// Tables degrade to their row text inside a styled block so that a
/// round trip through the editor looks the same as the first render.
fn write_table_fallback(table: &TipTapNode, ctx: &mut Context) {
    let rows = row_texts(table, &ctx.options.table_cell_separator);
    let marker = escape_html(&ctx.options.table_marker);
    let divider = escape_html(&ctx.options.table_divider);

    ctx.add(&format!(
        "<div class=\"table-fallback\" style=\"{}\"><strong>{}</strong>",
        TABLE_FALLBACK_STYLE, marker
    ));
    for (i, row) in rows.iter().enumerate() {
        ctx.add("<br>");
        ctx.add(&escape_html(row));
        if i == 0 {
            ctx.add("<br>");
            ctx.add(&divider);
        }
    }
    ctx.add("</div>");
}

pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Serialize one node with default options.
pub fn to_html(node: &TipTapNode) -> String {
    HtmlSerializer::default().serialize_node(node)
}

/// Repair and serialize a document with default options.
pub fn tiptap_to_html(doc: &TipTapDocument) -> String {
    HtmlSerializer::default().serialize_validated(doc)
}

/// Validate and serialize untyped JSON with default options.
pub fn json_to_html(value: &Value) -> String {
    HtmlSerializer::default().serialize_json(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_marks_wrap_in_fixed_order() {
        let forward = TipTapNode::text("x").with_marks(vec![
            Mark::new(MarkKind::Bold),
            Mark::new(MarkKind::Italic),
            Mark::link("https://x.test"),
        ]);
        let reversed = TipTapNode::text("x").with_marks(vec![
            Mark::link("https://x.test"),
            Mark::new(MarkKind::Italic),
            Mark::new(MarkKind::Bold),
        ]);
        let expected = r#"<a href="https://x.test"><em><strong>x</strong></em></a>"#;
        assert_eq!(to_html(&forward), expected);
        assert_eq!(to_html(&reversed), expected);
    }

    #[test]
    fn test_text_is_escaped_before_wrapping() {
        let node = TipTapNode::text("1 < 2").with_mark(Mark::new(MarkKind::Code));
        assert_eq!(to_html(&node), "<code>1 &lt; 2</code>");
    }

    #[test]
    fn test_block_nodes() {
        let doc = TipTapDocument::new(vec![
            TipTapNode::heading(2, vec![TipTapNode::text("T")]),
            TipTapNode::paragraph(vec![
                TipTapNode::text("a"),
                TipTapNode::hard_break(),
                TipTapNode::text("b"),
            ]),
            TipTapNode::list(
                NodeKind::OrderedList,
                vec![TipTapNode::list_item(vec![TipTapNode::paragraph(vec![
                    TipTapNode::text("i"),
                ])])],
            )
            .with_attr("start", json!(3)),
            TipTapNode::blockquote(vec![TipTapNode::paragraph(vec![TipTapNode::text("q")])]),
            TipTapNode::code_block("let x = 1;", Some("rust".into())),
            TipTapNode::horizontal_rule(),
        ]);

        assert_eq!(
            HtmlSerializer::default().serialize_document(&doc),
            concat!(
                "<h2>T</h2>",
                "<p>a<br>b</p>",
                "<ol start=\"3\"><li><p>i</p></li></ol>",
                "<blockquote><p>q</p></blockquote>",
                "<pre><code class=\"language-rust\">let x = 1;</code></pre>",
                "<hr>"
            )
        );
    }

    #[test]
    fn test_empty_paragraph() {
        assert_eq!(to_html(&TipTapNode::empty_paragraph()), "<p></p>");
    }

    #[test]
    fn test_unknown_nodes_never_fail() {
        let with_content = TipTapNode::of_type("callout")
            .with_content(vec![TipTapNode::paragraph(vec![TipTapNode::text("c")])]);
        assert_eq!(to_html(&with_content), "<p>c</p>");

        let mut leaf = TipTapNode::of_type("emoji");
        leaf.text = Some("<3".into());
        assert_eq!(to_html(&leaf), "&lt;3");

        assert_eq!(to_html(&TipTapNode::of_type("mystery")), "");
    }

    #[test]
    fn test_table_fallback() {
        let cell = |kind: NodeKind, t: &str| {
            TipTapNode::new(kind).with_content(vec![TipTapNode::paragraph(vec![TipTapNode::text(t)])])
        };
        let table = TipTapNode::new(NodeKind::Table).with_content(vec![
            TipTapNode::new(NodeKind::TableRow)
                .with_content(vec![cell(NodeKind::TableHeader, "A"), cell(NodeKind::TableHeader, "B")]),
            TipTapNode::new(NodeKind::TableRow)
                .with_content(vec![cell(NodeKind::TableCell, "1"), cell(NodeKind::TableCell, "2")]),
        ]);

        let html = to_html(&table);
        assert!(html.starts_with("<div class=\"table-fallback\""));
        assert!(html.ends_with("<strong>📊 TABLE</strong><br>A | B<br>---<br>1 | 2</div>"));
        assert!(!html.contains("<table"));
    }

    #[test]
    fn test_json_to_html_validates_first() {
        assert_eq!(json_to_html(&json!({"nope": true})), "<p></p>");
        assert_eq!(
            json_to_html(&json!({"type": "doc", "content": [{"type": "paragraph"}]})),
            "<p></p>"
        );
    }
}
