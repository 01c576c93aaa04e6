/// Round-trip and invariant tests across the converter, serializer and repairer.
use crate::*;
use serde_json::json;

fn serialize(doc: &TipTapDocument) -> String {
    HtmlSerializer::default().serialize_document(doc)
}

fn text(t: &str, marks: &[MarkKind]) -> TipTapNode {
    TipTapNode::text(t).with_marks(marks.iter().map(|&kind| Mark::new(kind)).collect())
}

fn paragraph(t: &str) -> TipTapNode {
    TipTapNode::paragraph(vec![TipTapNode::text(t)])
}

fn supported_document() -> TipTapDocument {
    let mut content: Vec<TipTapNode> = (1..=6)
        .map(|level| TipTapNode::heading(level, vec![TipTapNode::text(format!("Heading {}", level))]))
        .collect();

    content.push(TipTapNode::paragraph(vec![
        TipTapNode::text("Plain "),
        text("bold", &[MarkKind::Bold]),
        TipTapNode::text(" and "),
        text("both", &[MarkKind::Bold, MarkKind::Italic]),
        TipTapNode::hard_break(),
        TipTapNode::text("all").with_marks(vec![
            Mark::new(MarkKind::Bold),
            Mark::new(MarkKind::Italic),
            Mark::new(MarkKind::Underline),
            Mark::new(MarkKind::Strike),
            Mark::new(MarkKind::Code),
            Mark::link("https://example.com/?a=1&b=2"),
        ]),
        TipTapNode::text(" end "),
    ]));
    content.push(paragraph("Tom & Jerry's <tag> \"quoted\""));
    content.push(TipTapNode::list(
        NodeKind::BulletList,
        vec![TipTapNode::list_item(vec![paragraph("bullet")])],
    ));
    content.push(TipTapNode::list(
        NodeKind::OrderedList,
        vec![TipTapNode::list_item(vec![paragraph("numbered")])],
    ));
    content.push(TipTapNode::blockquote(vec![paragraph("quoted")]));
    content.push(TipTapNode::code_block("let x = 1 < 2;\n  y", None));
    content.push(TipTapNode::horizontal_rule());
    content.push(TipTapNode::empty_paragraph());

    TipTapDocument::new(content)
}

fn assert_invariants(doc: &TipTapDocument) {
    assert_eq!(doc.doc_type, "doc");
    assert!(!doc.content.is_empty(), "document content must not be empty");
    for node in &doc.content {
        assert_node_invariants(node);
    }
}

fn assert_node_invariants(node: &TipTapNode) {
    match node.kind() {
        NodeKind::Paragraph | NodeKind::Heading => {
            let content = node.content.as_ref().expect("textblock content must exist");
            assert!(!content.is_empty(), "textblock content must not be empty");
            assert!(content.iter().all(TipTapNode::is_inline));
        }
        NodeKind::BulletList | NodeKind::OrderedList => {
            assert!(!node.children().is_empty());
            for item in node.children() {
                assert_eq!(item.kind(), NodeKind::ListItem);
                assert!(item.children().iter().all(|c| !c.is_inline()));
            }
        }
        NodeKind::Table => panic!("table nodes must not leave the engine"),
        _ => {}
    }
    for child in node.children() {
        if !child.is_inline() {
            assert_node_invariants(child);
        }
    }
}

#[test]
fn test_idempotence_for_supported_documents() {
    let doc = supported_document();
    let html = serialize(&doc);
    let reparsed = html_to_tiptap(Some(&html));

    assert_eq!(reparsed, repair(doc.clone()));
    assert_eq!(reparsed, doc);
}

#[test]
fn test_idempotence_through_json() {
    let doc = supported_document();
    let value = doc.to_json_value();
    let html = json_to_html(&value);

    assert_eq!(html_to_tiptap(Some(&html)), validate(&value));
}

#[test]
fn test_html_round_trip_is_stable() {
    let inputs = [
        "<h1>Title</h1><p>Hello <strong>bold</strong> and <em>italic</em></p>",
        "<ul><li><p>one</p></li><li><p>two</p></li></ul>",
        "<ol start=\"3\"><li><p>three</p></li></ol>",
        "<blockquote><p>quote</p><p>more</p></blockquote>",
        "<pre><code class=\"language-js\">const a = 1 &lt; 2;</code></pre>",
        "<p>a<br>b</p><hr><p><a href=\"https://x.test\">link</a></p>",
        "<p><u>under</u> <s>struck</s> <code>mono</code></p>",
    ];

    for html in inputs {
        let once = html_to_tiptap(Some(html));
        assert_eq!(serialize(&once), html, "round trip changed {}", html);
    }
}

#[test]
fn test_loosely_written_html_converges() {
    let html = "<ul><li>one</li><li>two</li></ul><b>loose</b>";
    let first = html_to_tiptap(Some(html));
    let second = html_to_tiptap(Some(&serialize(&first)));

    assert_eq!(first, second);
    assert_eq!(
        serialize(&first),
        "<ul><li><p>one</p></li><li><p>two</p></li></ul><p><strong>loose</strong></p>"
    );
}

#[test]
fn test_never_empty_for_arbitrary_input() {
    let inputs = [
        "",
        "<",
        "<p>",
        "<p></p>",
        "<h1></h1><h2>",
        "<ul></ul><ol><li></li></ol>",
        "<blockquote></blockquote>",
        "<strong></strong>",
        "<div><div></div></div>",
        "<table></table>",
        "<table><tr></tr></table>",
        "<td>stray cell</td>",
        "plain text",
        "<p>unterminated",
        "<<<>>>",
        "<!-- only a comment -->",
        "<br><br>",
        "<li>orphan</li>",
        "<pre></pre>",
        "<p><ul><li>nested in p</li></ul></p>",
    ];

    for input in inputs {
        let doc = html_to_tiptap(Some(input));
        assert_invariants(&doc);
    }
}

#[test]
fn test_never_empty_for_generated_input() {
    let pieces = [
        "<p>", "</p>", "<h2>", "</h2>", "<ul>", "<li>", "</li>", "</ul>", "<table>", "<tr>",
        "<td>", "</td>", "</tr>", "</table>", "<strong>", "</strong>", "<br>", "x", " ", "<",
        "&amp;", "<div>", "</div>", "<blockquote>", "</blockquote>",
    ];
    let mut state: u64 = 0x9e37_79b9_7f4a_7c15;

    for _ in 0..300 {
        let mut html = String::new();
        for _ in 0..20 {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            html.push_str(pieces[(state % pieces.len() as u64) as usize]);
        }
        let doc = html_to_tiptap(Some(&html));
        assert_invariants(&doc);

        // The serializer must accept anything the converter produces.
        let again = html_to_tiptap(Some(&serialize(&doc)));
        assert_invariants(&again);
    }
}

#[test]
fn test_parser_robustness_keeps_text() {
    let doc = html_to_tiptap(Some("<p>unterminated"));
    assert!(to_plain_text(&doc).contains("unterminated"));
}

#[test]
fn test_mark_merge() {
    let doc = html_to_tiptap(Some("<strong>bold text</strong>"));
    assert_eq!(
        doc.to_json_value(),
        json!({"type": "doc", "content": [{"type": "paragraph", "content": [
            {"type": "text", "text": "bold text", "marks": [{"type": "bold"}]}
        ]}]})
    );
}

#[test]
fn test_table_degradation() {
    let doc = html_to_tiptap(Some(
        "<table><tr><th>A</th><th>B</th></tr><tr><td>1</td><td>2</td></tr></table>",
    ));
    let texts: Vec<String> = doc.content.iter().map(TipTapNode::text_content).collect();
    assert_eq!(texts, vec!["📊 TABLE", "A | B", "---", "1 | 2"]);

    // The fallback HTML reads the same after another pass.
    let html = tiptap_to_html(&doc);
    assert_eq!(
        html,
        "<p><strong>📊 TABLE</strong></p><p>A | B</p><p>---</p><p>1 | 2</p>"
    );
}

#[test]
fn test_custom_table_options() {
    let options = ConverterOptions::from_json_str(
        r#"{"tableMarker": "[table]", "tableDivider": "===", "tableCellSeparator": ", "}"#,
    )
    .unwrap();
    let doc = HtmlConverter::new(options)
        .convert(Some("<table><tr><td>a</td><td>b</td></tr></table>"));
    let texts: Vec<String> = doc.content.iter().map(TipTapNode::text_content).collect();
    assert_eq!(texts, vec!["[table]", "a, b", "==="]);
}

#[test]
fn test_external_table_json_renders_fallback_and_reparses() {
    let cell = |t: &str| json!({"type": "tableCell", "content": [{"type": "paragraph", "content": [{"type": "text", "text": t}]}]});
    let table = TipTapNode::new(NodeKind::Table).with_content(vec![
        serde_json::from_value(json!({"type": "tableRow", "content": [cell("A"), cell("B")]})).unwrap(),
        serde_json::from_value(json!({"type": "tableRow", "content": [cell("1"), cell("2")]})).unwrap(),
    ]);

    let html = to_html(&table);
    let doc = html_to_tiptap(Some(&html));
    assert_eq!(doc.content.len(), 1);
    assert_eq!(to_plain_text(&doc), "📊 TABLE\nA | B\n---\n1 | 2");
}

#[test]
fn test_null_input() {
    let empty = json!({"type": "doc", "content": [{"type": "paragraph", "content": [{"type": "text", "text": ""}]}]});
    assert_eq!(html_to_tiptap(None).to_json_value(), empty);
    assert_eq!(html_to_tiptap(Some("")).to_json_value(), empty);
}

#[test]
fn test_nested_lists_survive_html_round_trip() {
    let html = "<ul><li><p>a</p><ul><li><p>b</p></li></ul></li><li><p>c</p></li></ul>";
    let doc = html_to_tiptap(Some(html));
    assert_eq!(serialize(&doc), html);
}

#[test]
fn test_idempotence_for_non_canonical_documents() {
    let doc = TipTapDocument::new(vec![
        TipTapNode::paragraph(vec![
            TipTapNode::text("a"),
            TipTapNode::text("b"),
            text("c", &[MarkKind::Italic, MarkKind::Bold]),
            text("d", &[MarkKind::Bold]),
            text("e", &[MarkKind::Bold]),
        ]),
        TipTapNode::code_block("", None).with_content(vec![TipTapNode::text("x"), TipTapNode::text("y")]),
    ]);

    let expected = repair(doc.clone());
    assert_eq!(
        serde_json::to_value(&expected.content[0]).unwrap(),
        json!({"type": "paragraph", "content": [
            {"type": "text", "text": "ab"},
            {"type": "text", "text": "c", "marks": [{"type": "bold"}, {"type": "italic"}]},
            {"type": "text", "text": "de", "marks": [{"type": "bold"}]}
        ]})
    );

    let reparsed = html_to_tiptap(Some(&serialize(&doc)));
    assert_eq!(reparsed.to_json_value(), expected.to_json_value());
    assert_eq!(repair(expected.clone()), expected);
}

#[test]
fn test_deep_nesting_converts_and_serializes() {
    let depth = 2000;
    let inputs = [
        format!("{}x{}", "<div>".repeat(depth), "</div>".repeat(depth)),
        format!("{}x{}", "<blockquote>".repeat(depth), "</blockquote>".repeat(depth)),
        format!("{}x{}", "<ul><li>".repeat(depth), "</li></ul>".repeat(depth)),
    ];

    for html in &inputs {
        let doc = html_to_tiptap(Some(html));
        assert_invariants(&doc);
        assert!(to_plain_text(&doc).contains('x'));

        let out = serialize(&doc);
        assert!(!out.is_empty());
        assert_invariants(&html_to_tiptap(Some(&out)));
    }
}
