use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Generic element tree produced by the HTML parser.
///
/// The tree is transient: it lives for one conversion call and is then
/// mapped onto typed document nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ParsedElement {
    #[serde(rename_all = "camelCase")]
    Element {
        tag_name: String,
        #[serde(default, skip_serializing_if = "HashMap::is_empty")]
        attributes: HashMap<String, String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        children: Vec<ParsedElement>,
    },

    /// Raw text, whitespace preserved exactly and entities left encoded.
    Text { text: String },
}

impl ParsedElement {
    pub fn element(tag_name: impl Into<String>) -> Self {
        ParsedElement::Element {
            tag_name: tag_name.into(),
            attributes: HashMap::new(),
            children: Vec::new(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        ParsedElement::Text { text: text.into() }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let ParsedElement::Element {
            ref mut attributes, ..
        } = self
        {
            attributes.insert(key.into(), value.into());
        }
        self
    }

    pub fn with_child(mut self, child: ParsedElement) -> Self {
        if let ParsedElement::Element {
            ref mut children, ..
        } = self
        {
            children.push(child);
        }
        self
    }

    pub fn with_children(mut self, new_children: Vec<ParsedElement>) -> Self {
        if let ParsedElement::Element {
            ref mut children, ..
        } = self
        {
            children.extend(new_children);
        }
        self
    }

    pub fn tag_name(&self) -> Option<&str> {
        match self {
            ParsedElement::Element { tag_name, .. } => Some(tag_name),
            ParsedElement::Text { .. } => None,
        }
    }

    pub fn is_tag(&self, tag: &str) -> bool {
        self.tag_name() == Some(tag)
    }

    pub fn is_text(&self) -> bool {
        matches!(self, ParsedElement::Text { .. })
    }

    pub fn children(&self) -> &[ParsedElement] {
        match self {
            ParsedElement::Element { children, .. } => children,
            ParsedElement::Text { .. } => &[],
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        match self {
            ParsedElement::Element { attributes, .. } => attributes.get(name).map(String::as_str),
            ParsedElement::Text { .. } => None,
        }
    }

    /// Concatenated text of this node and all descendants, in document order.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            ParsedElement::Text { text } => out.push_str(text),
            ParsedElement::Element { children, .. } => {
                for child in children {
                    child.collect_text(out);
                }
            }
        }
    }
}
