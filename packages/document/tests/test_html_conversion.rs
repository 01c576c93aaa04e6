use notebridge_document::{
    html_to_tiptap, json_to_html, render_blocks, tiptap_to_html, to_plain_text, validate_json_str,
    ConverterOptions, HtmlConverter, HtmlSerializer, NodeKind, RenderBlock, TipTapDocument,
};
use serde_json::json;

const NOTE: &str = r#"<h2>Trip &amp; packing</h2>
<p>Leave at <strong>7am</strong>, bring the <a href="https://maps.example/route">map</a>.</p>
<ul>
  <li><p>Passport</p></li>
  <li><p>Charger</p><ul><li><p>USB-C</p></li></ul></li>
</ul>
<blockquote><p>Pack light.</p></blockquote>
<table><tr><th>Day</th><th>City</th></tr><tr><td>1</td><td>Lyon</td></tr></table>"#;

#[test]
fn test_full_note_conversion() {
    let doc = html_to_tiptap(Some(NOTE));
    let kinds: Vec<NodeKind> = doc.content.iter().map(|n| n.kind()).collect();

    assert_eq!(
        kinds,
        vec![
            NodeKind::Heading,
            NodeKind::Paragraph,
            NodeKind::BulletList,
            NodeKind::Blockquote,
            NodeKind::Paragraph,
            NodeKind::Paragraph,
            NodeKind::Paragraph,
            NodeKind::Paragraph,
        ]
    );
    assert_eq!(doc.content[0].text_content(), "Trip & packing");
    assert_eq!(
        to_plain_text(&doc),
        "Trip & packing\nLeave at 7am, bring the map.\nPassport\nCharger\nUSB-C\nPack light.\n📊 TABLE\nDay | City\n---\n1 | Lyon"
    );
}

#[test]
fn test_note_survives_editor_round_trip() {
    let first = html_to_tiptap(Some(NOTE));
    let html = tiptap_to_html(&first);
    let second = html_to_tiptap(Some(&html));

    assert_eq!(first, second);
    assert!(!html.contains("<table"));
}

#[test]
fn test_stored_json_to_editor_html() {
    let stored = r#"{"type":"doc","content":[
        {"type":"heading","attrs":{"level":9},"content":[{"type":"text","text":"Big"}]},
        {"type":"paragraph"},
        {"type":"bulletList","content":[]},
        {"type":"paragraph","content":[{"type":"text","text":"a & b","marks":[{"type":"italic"}]}]}
    ]}"#;

    let doc = validate_json_str(stored);
    assert_eq!(
        HtmlSerializer::default().serialize_document(&doc),
        "<h6>Big</h6><p></p><p><em>a &amp; b</em></p>"
    );
    assert_eq!(validate_json_str("{not json").to_json_value(), TipTapDocument::empty().to_json_value());
}

#[test]
fn test_json_to_html_handles_garbage() {
    assert_eq!(json_to_html(&json!(null)), "<p></p>");
    assert_eq!(json_to_html(&json!({"type": "doc", "content": [{"text": "no type"}]})), "<p></p>");
}

#[test]
fn test_render_blocks_for_converted_note() {
    let doc = html_to_tiptap(Some(NOTE));
    let blocks = render_blocks(&doc);

    let items: Vec<(usize, String)> = blocks
        .iter()
        .filter_map(|block| match block {
            RenderBlock::ListItem { depth, .. } => Some((*depth, block.text())),
            _ => None,
        })
        .collect();
    assert_eq!(
        items,
        vec![
            (0, "Passport".to_string()),
            (0, "Charger".to_string()),
            (1, "USB-C".to_string()),
        ]
    );
}

#[test]
fn test_options_from_json() {
    let options = ConverterOptions::from_json_str(
        r#"{"tableMarker": "TABLE", "parser": {"closeTagMatching": "firstMatch"}}"#,
    )
    .unwrap();
    let converter = HtmlConverter::new(options);

    let doc = converter.convert(Some("<table><tr><td>x</td></tr></table>"));
    assert_eq!(doc.content[0].text_content(), "TABLE");

    assert!(ConverterOptions::from_json_str(r#"{"parser": {"maxDepth": 0}}"#).is_err());
    assert!(ConverterOptions::from_json_str("[]").is_err());
}
