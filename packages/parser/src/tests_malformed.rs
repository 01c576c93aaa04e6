/// Robustness tests: arbitrary and malformed input must always produce a tree.
use crate::*;

fn all_text(nodes: &[ParsedElement]) -> String {
    nodes.iter().map(ParsedElement::text_content).collect()
}

#[test]
fn test_unterminated_contains_literal_text() {
    let nodes = parse_html("<p>unterminated");
    assert!(all_text(&nodes).contains("unterminated"));
}

#[test]
fn test_malformed_inputs_never_panic() {
    let inputs = [
        "",
        "<",
        ">",
        "<<<<",
        "</",
        "<p",
        "<p>",
        "</p></p></p>",
        "<p><p><p>",
        "<!--",
        "<!-- -- >",
        "<a href=\"unclosed>text</a>",
        "<a href='x'>",
        "<br><br/><br />",
        "<table><tr><td>cell",
        "<<p>>",
        "text only",
        "<p>é ü 漢字 🎉</p>",
        "<p>🎉<",
        "<ul><li><ul><li></ul>",
        "<\u{0}>",
        "<p>\n\t</p>",
    ];

    for input in inputs {
        let _ = parse_html(input);
        let options = ParserOptions {
            close_tag_matching: CloseTagMatching::FirstMatch,
            ..ParserOptions::default()
        };
        let _ = parse_html_with(input, &options);
    }
}

#[test]
fn test_text_is_never_lost_on_absorption() {
    let input = "<div>start <em>middle";
    let nodes = parse_html(input);
    assert_eq!(all_text(&nodes), input);
}

#[test]
fn test_generated_fragments_terminate() {
    // Deterministic pseudo-random fragment soup.
    let pieces = [
        "<p>", "</p>", "<b>", "</b>", "<br>", "<", ">", "/", "text", " ", "<!--", "-->",
        "<a href=\"x\">", "</a>", "<ul>", "<li>", "</li>", "</ul>", "é", "&amp;", "'", "\"",
    ];
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;

    for _ in 0..500 {
        let mut input = String::new();
        for _ in 0..24 {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            input.push_str(pieces[(state % pieces.len() as u64) as usize]);
        }

        let mut parser = Parser::new(&input);
        let nodes = parser.parse();
        // Nothing is invented: every character of output text came from the input.
        assert!(all_text(&nodes).len() <= input.len());
    }
}

#[test]
fn test_deep_nesting_is_bounded() {
    let depth = 2000;
    let input = format!("{}x{}", "<div>".repeat(depth), "</div>".repeat(depth));
    let mut parser = Parser::new(&input);
    let nodes = parser.parse();

    assert_eq!(nodes.len(), 1);
    assert!(parser
        .diagnostics()
        .iter()
        .any(|d| matches!(d, ParseError::NestingTooDeep { .. })));
}
