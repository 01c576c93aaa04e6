use crate::tiptap::{NodeKind, TipTapDocument, TipTapNode};

/// Visitor pattern for traversing TipTap nodes immutably
///
/// Default implementations walk the entire tree. Override the hooks you
/// need; call the matching `walk_*` function to keep descending.
pub trait Visitor: Sized {
    fn visit_document(&mut self, doc: &TipTapDocument) {
        walk_document(self, doc);
    }

    fn visit_block(&mut self, node: &TipTapNode) {
        walk_node(self, node);
    }

    fn visit_text(&mut self, _node: &TipTapNode) {
        // Leaf node, no children to walk
    }

    fn visit_hard_break(&mut self, _node: &TipTapNode) {
        // Leaf node, no children to walk
    }
}

pub fn walk_document<V: Visitor>(visitor: &mut V, doc: &TipTapDocument) {
    for node in &doc.content {
        visit_node(visitor, node);
    }
}

pub fn walk_node<V: Visitor>(visitor: &mut V, node: &TipTapNode) {
    for child in node.children() {
        visit_node(visitor, child);
    }
}

fn visit_node<V: Visitor>(visitor: &mut V, node: &TipTapNode) {
    match node.kind() {
        NodeKind::Text => visitor.visit_text(node),
        NodeKind::HardBreak => visitor.visit_hard_break(node),
        _ => visitor.visit_block(node),
    }
}

/// Collects plain text; textblocks are separated by newlines.
#[derive(Default)]
pub struct PlainTextCollector {
    output: String,
    /// Whether a textblock has been emitted yet.
    started: bool,
}

impl PlainTextCollector {
    pub fn into_text(self) -> String {
        self.output
    }
}

impl Visitor for PlainTextCollector {
    fn visit_block(&mut self, node: &TipTapNode) {
        let is_textblock = matches!(
            node.kind(),
            NodeKind::Paragraph | NodeKind::Heading | NodeKind::CodeBlock | NodeKind::HorizontalRule
        );

        if is_textblock {
            if self.started {
                self.output.push('\n');
            }
            self.started = true;
        }
        walk_node(self, node);
    }

    fn visit_text(&mut self, node: &TipTapNode) {
        self.output.push_str(node.text_str());
    }

    fn visit_hard_break(&mut self, _node: &TipTapNode) {
        self.output.push('\n');
    }
}

/// Plain text of a document, for previews and search.
pub fn to_plain_text(doc: &TipTapDocument) -> String {
    let mut collector = PlainTextCollector::default();
    collector.visit_document(doc);
    collector.into_text()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_joins_blocks() {
        let doc = TipTapDocument::new(vec![
            TipTapNode::heading(1, vec![TipTapNode::text("Title")]),
            TipTapNode::paragraph(vec![
                TipTapNode::text("a"),
                TipTapNode::hard_break(),
                TipTapNode::text("b"),
            ]),
            TipTapNode::list(
                NodeKind::BulletList,
                vec![
                    TipTapNode::list_item(vec![TipTapNode::paragraph(vec![TipTapNode::text("x")])]),
                    TipTapNode::list_item(vec![TipTapNode::paragraph(vec![TipTapNode::text("y")])]),
                ],
            ),
        ]);

        assert_eq!(to_plain_text(&doc), "Title\na\nb\nx\ny");
    }

    #[test]
    fn test_custom_visitor_counts_text_nodes() {
        #[derive(Default)]
        struct Counter(usize);
        impl Visitor for Counter {
            fn visit_text(&mut self, _node: &TipTapNode) {
                self.0 += 1;
            }
        }

        let doc = TipTapDocument::new(vec![TipTapNode::blockquote(vec![
            TipTapNode::paragraph(vec![TipTapNode::text("a"), TipTapNode::text("b")]),
        ])]);
        let mut counter = Counter::default();
        counter.visit_document(&doc);
        assert_eq!(counter.0, 2);
    }

    #[test]
    fn test_empty_document_is_empty_text() {
        assert_eq!(to_plain_text(&TipTapDocument::empty()), "");
    }
}
