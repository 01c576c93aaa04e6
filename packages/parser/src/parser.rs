use crate::ast::ParsedElement;
use crate::attributes::extract_attributes;
use crate::error::ParseError;
use crate::tokenizer::{find_close, scan_tag, Scan, TagToken};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// How the closing tag of a container element is located.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CloseTagMatching {
    /// Count nested open tags of the same name, so `<li>` inside `<li>` closes correctly.
    #[default]
    DepthTracked,
    /// Take the first literal `</name>` after the open tag, ignoring nesting.
    /// Kept for content stored by editors that relied on this behaviour.
    FirstMatch,
}

/// Default nesting limit. Conversion, repair and serialization all recurse
/// once per level and must fit a default thread stack at this depth.
pub const DEFAULT_MAX_DEPTH: usize = 128;

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

/// Parser configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParserOptions {
    #[serde(default)]
    pub close_tag_matching: CloseTagMatching,

    /// Elements nested deeper than this keep their inner HTML as literal text.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            close_tag_matching: CloseTagMatching::default(),
            max_depth: default_max_depth(),
        }
    }
}

/// Single-pass, cursor-based HTML parser.
///
/// Malformed input is never an error: an unterminated tag or an element
/// without a matching close turns the rest of the fragment into text, and the
/// problem is recorded in [`Parser::diagnostics`].
pub struct Parser<'src> {
    source: &'src str,
    options: ParserOptions,
    diagnostics: Vec<ParseError>,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        Self::with_options(source, ParserOptions::default())
    }

    pub fn with_options(source: &'src str, options: ParserOptions) -> Self {
        Self {
            source,
            options,
            diagnostics: Vec::new(),
        }
    }

    /// Parse the whole source into a list of top-level nodes.
    pub fn parse(&mut self) -> Vec<ParsedElement> {
        self.diagnostics.clear();
        let source = self.source;
        self.parse_fragment(source, 0, 0)
    }

    /// Problems absorbed during the last call to [`Parser::parse`].
    pub fn diagnostics(&self) -> &[ParseError] {
        &self.diagnostics
    }

    fn parse_fragment(&mut self, fragment: &'src str, base: usize, depth: usize) -> Vec<ParsedElement> {
        let lower = fragment.to_ascii_lowercase();
        let mut nodes = Vec::new();
        let mut pos = 0;

        while pos < fragment.len() {
            let Some(rel) = fragment[pos..].find('<') else {
                push_text(&mut nodes, &fragment[pos..]);
                break;
            };
            let lt = pos + rel;
            push_text(&mut nodes, &fragment[pos..lt]);

            match scan_tag(fragment, lt) {
                Scan::Literal => {
                    push_text(&mut nodes, "<");
                    pos = lt + 1;
                }
                Scan::Unterminated(err) => {
                    self.record(err, base);
                    push_text(&mut nodes, &fragment[lt..]);
                    break;
                }
                Scan::Tag { token, end } => match token {
                    TagToken::Close { name } => {
                        debug!(tag = %name, pos = base + lt, "skipping stray closing tag");
                        pos = end;
                    }
                    TagToken::Comment | TagToken::Declaration => {
                        pos = end;
                    }
                    TagToken::Open {
                        name,
                        attrs,
                        self_closing,
                    } => {
                        let attributes = extract_attributes(attrs);

                        if self_closing {
                            nodes.push(ParsedElement::Element {
                                tag_name: name,
                                attributes,
                                children: Vec::new(),
                            });
                            pos = end;
                            continue;
                        }

                        let Some(close) =
                            find_close(&lower, end, &name, self.options.close_tag_matching)
                        else {
                            self.record(ParseError::unclosed_element(lt, name), base);
                            push_text(&mut nodes, &fragment[lt..]);
                            break;
                        };

                        let inner = &fragment[end..close.start];
                        let children = if depth + 1 > self.options.max_depth {
                            self.record(
                                ParseError::nesting_too_deep(end, self.options.max_depth),
                                base,
                            );
                            let mut raw = Vec::new();
                            push_text(&mut raw, inner);
                            raw
                        } else {
                            self.parse_fragment(inner, base + end, depth + 1)
                        };

                        nodes.push(ParsedElement::Element {
                            tag_name: name,
                            attributes,
                            children,
                        });
                        pos = close.end;
                    }
                },
            }
        }

        nodes
    }

    fn record(&mut self, err: ParseError, base: usize) {
        let err = match err {
            ParseError::UnterminatedTag { pos } => ParseError::unterminated_tag(base + pos),
            ParseError::UnclosedElement { pos, tag } => ParseError::unclosed_element(base + pos, tag),
            ParseError::UnterminatedComment { pos } => ParseError::unterminated_comment(base + pos),
            ParseError::NestingTooDeep { pos, limit } => {
                ParseError::nesting_too_deep(base + pos, limit)
            }
        };

        match &err {
            ParseError::NestingTooDeep { .. } => warn!(error = %err, "absorbing deeply nested html"),
            _ => debug!(error = %err, "absorbing malformed html as text"),
        }

        self.diagnostics.push(err);
    }
}

/// Append text, merging with a preceding text node.
fn push_text(nodes: &mut Vec<ParsedElement>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(ParsedElement::Text { text: last }) = nodes.last_mut() {
        last.push_str(text);
    } else {
        nodes.push(ParsedElement::text(text));
    }
}

/// Parse an HTML string with default options. Never fails.
pub fn parse_html(html: &str) -> Vec<ParsedElement> {
    Parser::new(html).parse()
}

/// Parse an HTML string with explicit options. Never fails.
pub fn parse_html_with(html: &str, options: &ParserOptions) -> Vec<ParsedElement> {
    Parser::with_options(html, options.clone()).parse()
}
