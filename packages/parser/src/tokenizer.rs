use crate::error::ParseError;
use crate::parser::CloseTagMatching;

/// Tags that never have a closing counterpart.
const VOID_TAGS: &[&str] = &[
    "br", "hr", "img", "input", "meta", "link", "area", "base", "col", "embed", "param", "source",
    "track", "wbr",
];

pub fn is_void_tag(tag: &str) -> bool {
    VOID_TAGS.contains(&tag)
}

/// A single tag recognised at a `<`.
#[derive(Debug, Clone, PartialEq)]
pub enum TagToken<'src> {
    Open {
        name: String,
        /// Raw text between the tag name and `>`.
        attrs: &'src str,
        self_closing: bool,
    },
    Close {
        name: String,
    },
    Comment,
    /// `<!DOCTYPE ...>`, `<?xml ...?>` and similar.
    Declaration,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Scan<'src> {
    /// A tag spanning from the `<` up to (exclusive) `end`.
    Tag { token: TagToken<'src>, end: usize },
    /// The `<` does not start a tag and is plain text.
    Literal,
    /// A tag was started but never finished.
    Unterminated(ParseError),
}

/// Classify the tag starting at byte `lt`, which must point at a `<`.
pub fn scan_tag(source: &str, lt: usize) -> Scan<'_> {
    let rest = &source[lt..];

    if let Some(body) = rest.strip_prefix("<!--") {
        return match body.find("-->") {
            Some(i) => Scan::Tag {
                token: TagToken::Comment,
                end: lt + 4 + i + 3,
            },
            None => Scan::Unterminated(ParseError::unterminated_comment(lt)),
        };
    }

    let bytes = rest.as_bytes();
    let next = bytes.get(1).copied();
    let is_close = next == Some(b'/');
    let is_declaration = matches!(next, Some(b'!') | Some(b'?'));
    let name_start = if is_close { 2 } else { 1 };

    if !is_declaration && !bytes.get(name_start).is_some_and(u8::is_ascii_alphabetic) {
        return Scan::Literal;
    }

    let Some(gt) = rest.find('>') else {
        return Scan::Unterminated(ParseError::unterminated_tag(lt));
    };
    let end = lt + gt + 1;

    if is_declaration {
        return Scan::Tag {
            token: TagToken::Declaration,
            end,
        };
    }

    let inner = &rest[name_start..gt];
    let name_len = inner
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == ':'))
        .unwrap_or(inner.len());
    let name = inner[..name_len].to_ascii_lowercase();

    if is_close {
        return Scan::Tag {
            token: TagToken::Close { name },
            end,
        };
    }

    let attrs = &inner[name_len..];
    let self_closing = is_void_tag(&name) || attrs.trim_end().ends_with('/');

    Scan::Tag {
        token: TagToken::Open {
            name,
            attrs,
            self_closing,
        },
        end,
    }
}

/// Byte range of a closing tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloseTag {
    pub start: usize,
    pub end: usize,
}

/// Find the tag closing `name`, searching `lower` (an ASCII-lowercased copy
/// of the fragment) from byte `from`, which sits just after the opening `>`.
pub fn find_close(
    lower: &str,
    from: usize,
    name: &str,
    matching: CloseTagMatching,
) -> Option<CloseTag> {
    match matching {
        CloseTagMatching::FirstMatch => {
            let needle = format!("</{name}>");
            lower[from..].find(&needle).map(|i| CloseTag {
                start: from + i,
                end: from + i + needle.len(),
            })
        }
        CloseTagMatching::DepthTracked => find_balanced_close(lower, from, name),
    }
}

fn find_balanced_close(lower: &str, from: usize, name: &str) -> Option<CloseTag> {
    let mut depth = 1usize;
    let mut pos = from;

    while let Some(rel) = lower[pos..].find('<') {
        let lt = pos + rel;
        let rest = &lower[lt..];

        if let Some(body) = rest.strip_prefix("<!--") {
            pos = lt + 4 + body.find("-->")? + 3;
            continue;
        }

        if let Some(after) = rest.strip_prefix("</").and_then(|r| r.strip_prefix(name)) {
            let trimmed = after.trim_start();
            if trimmed.starts_with('>') {
                let end = lt + (rest.len() - trimmed.len()) + 1;
                depth -= 1;
                if depth == 0 {
                    return Some(CloseTag { start: lt, end });
                }
                pos = end;
                continue;
            }
        } else if let Some(after) = rest[1..].strip_prefix(name) {
            if after.starts_with(|c: char| c == '>' || c == '/' || c.is_ascii_whitespace()) {
                let gt = after.find('>')?;
                if !after[..gt].trim_end().ends_with('/') {
                    depth += 1;
                }
                pos = lt + 1 + name.len() + gt + 1;
                continue;
            }
        }

        pos = lt + 1;
    }

    None
}
