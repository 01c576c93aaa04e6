//! Range formatting over span runs.
//!
//! All offsets count characters (Unicode scalar values) across the
//! concatenated span text, and ranges are half-open: `[start, end)`.

use crate::blocks::{SpanMark, TextSpan};

/// Byte index of the `chars`-th character, or the end of the string.
fn byte_index(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map(|(index, _)| index)
        .unwrap_or(text.len())
}

fn ordered(start: usize, end: usize) -> (usize, usize) {
    if start > end {
        (end, start)
    } else {
        (start, end)
    }
}

/// Toggle `mark` over the characters in `[start, end)`.
///
/// Every span overlapping the range is split into up to three pieces: the
/// part before the range and the part after it keep their marks, the part
/// inside has `mark` toggled. Toggling is per span, so a range covering
/// both bold and plain text flips each piece independently. Spans outside
/// the range are returned untouched.
pub fn apply_format(spans: &[TextSpan], start: usize, end: usize, mark: SpanMark) -> Vec<TextSpan> {
    let (start, end) = ordered(start, end);
    if start == end {
        return spans.to_vec();
    }

    let mut out = Vec::with_capacity(spans.len() + 2);
    let mut offset = 0;

    for span in spans {
        let len = span.char_len();
        let span_start = offset;
        offset += len;

        if len == 0 || offset <= start || span_start >= end {
            out.push(span.clone());
            continue;
        }

        let from = byte_index(&span.text, start.saturating_sub(span_start));
        let to = byte_index(&span.text, (end - span_start).min(len));
        let (before, rest) = span.text.split_at(from);
        let (inside, after) = rest.split_at(to - from);

        if !before.is_empty() {
            out.push(TextSpan {
                text: before.to_string(),
                marks: span.marks,
            });
        }

        let mut marks = span.mark_set();
        marks.toggle(mark);
        out.push(TextSpan::new(inside, marks));

        if !after.is_empty() {
            out.push(TextSpan {
                text: after.to_string(),
                marks: span.marks,
            });
        }
    }

    out
}

/// Drop empty spans and merge neighbours with equal marks. Always returns
/// at least one span.
pub fn merge_adjacent_spans(spans: Vec<TextSpan>) -> Vec<TextSpan> {
    let mut out: Vec<TextSpan> = Vec::with_capacity(spans.len());

    for span in spans {
        if span.text.is_empty() {
            continue;
        }
        match out.last_mut() {
            Some(last) if last.mark_set() == span.mark_set() => last.text.push_str(&span.text),
            _ => {
                let marks = span.mark_set();
                out.push(TextSpan::new(span.text, marks))
            }
        }
    }

    if out.is_empty() {
        out.push(TextSpan::plain(""));
    }
    out
}

/// True when the range covers at least one character and every covered
/// character carries `mark`.
pub fn is_format_active(spans: &[TextSpan], start: usize, end: usize, mark: SpanMark) -> bool {
    let (start, end) = ordered(start, end);
    if start == end {
        return false;
    }
    let mut offset = 0;
    let mut covered = false;

    for span in spans {
        let len = span.char_len();
        let span_start = offset;
        offset += len;

        if len == 0 || offset <= start || span_start >= end {
            continue;
        }
        if !span.has_mark(mark) {
            return false;
        }
        covered = true;
    }

    covered
}

pub fn spans_text(spans: &[TextSpan]) -> String {
    spans.iter().map(|span| span.text.as_str()).collect()
}
