//! TipTap document conversion.
//!
//! Converts rich-text notes between HTML (what the editing surface speaks)
//! and TipTap JSON (what is stored), repairs documents from untrusted
//! sources, and derives render-only block lists for native views.

pub mod config;
pub mod error;
pub mod from_html;
pub mod render;
pub mod serializer;
pub mod table;
pub mod tiptap;
pub mod validator;
pub mod visitor;

#[cfg(test)]
mod tests_roundtrip;

pub use config::ConverterOptions;
pub use error::{DocumentError, DocumentResult};
pub use from_html::{html_to_tiptap, to_tiptap, HtmlConverter};
pub use render::{render_blocks, render_blocks_from_json, BlockRenderer, RenderBlock, RunStyle, StyledRun};
pub use serializer::{escape_html, json_to_html, tiptap_to_html, to_html, HtmlSerializer};
pub use tiptap::{Attrs, Mark, MarkKind, NodeKind, TipTapDocument, TipTapNode};
pub use validator::{repair, validate, validate_json_str, Repairer};
pub use visitor::{to_plain_text, PlainTextCollector, Visitor};
