//! Table degradation.
//!
//! The editing surface cannot render tables, so a table is reduced to a bold
//! marker paragraph followed by one paragraph per row (cells joined by the
//! configured separator) and a divider paragraph after the header row.

use crate::config::ConverterOptions;
use crate::tiptap::{Mark, MarkKind, NodeKind, TipTapNode};

/// Rows of a table, taken from direct `tableRow` children and from
/// `thead`/`tbody`/`tfoot` placeholders, in document order.
pub fn collect_rows(table: &TipTapNode) -> Vec<&TipTapNode> {
    let mut rows = Vec::new();
    for child in table.children() {
        match child.kind() {
            NodeKind::TableRow => rows.push(child),
            NodeKind::TableRowGroup => rows.extend(
                child
                    .children()
                    .iter()
                    .filter(|row| row.kind() == NodeKind::TableRow),
            ),
            _ => {}
        }
    }
    rows
}

/// Text of each cell (its paragraphs concatenated), joined with `separator`.
pub fn row_text(row: &TipTapNode, separator: &str) -> String {
    row.children()
        .iter()
        .filter(|cell| matches!(cell.kind(), NodeKind::TableCell | NodeKind::TableHeader))
        .map(|cell| {
            cell.children()
                .iter()
                .map(TipTapNode::text_content)
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join(separator)
}

pub fn row_texts(table: &TipTapNode, separator: &str) -> Vec<String> {
    collect_rows(table)
        .into_iter()
        .map(|row| row_text(row, separator))
        .collect()
}

/// Replace a table node with plain paragraphs.
pub fn flatten_table(table: &TipTapNode, options: &ConverterOptions) -> Vec<TipTapNode> {
    let rows = row_texts(table, &options.table_cell_separator);
    let mut out = Vec::with_capacity(rows.len() + 2);

    out.push(TipTapNode::paragraph(vec![
        TipTapNode::text(options.table_marker.as_str()).with_mark(Mark::new(MarkKind::Bold))
    ]));

    for (i, row) in rows.into_iter().enumerate() {
        out.push(TipTapNode::paragraph(vec![TipTapNode::text(row)]));
        if i == 0 {
            out.push(TipTapNode::paragraph(vec![TipTapNode::text(
                options.table_divider.as_str(),
            )]));
        }
    }

    out
}
