//! # Notebridge Editor
//!
//! Flat block model for the block-based note editor.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ document: TipTap JSON (stored form)         │
//! └─────────────────────────────────────────────┘
//!                     ⇅
//! ┌─────────────────────────────────────────────┐
//! │ editor: EditorBlock[] for one session       │
//! │  - one block per top-level node             │
//! │  - flat span marks, no links                │
//! │  - range formatting by character offset     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Blocks are never stored. They are rebuilt from TipTap on load and
//! flattened back on every change, and their IDs only have to be unique
//! within a session, so ID generation is injected rather than global.
//!
//! ## Usage
//!
//! ```rust
//! use notebridge_document::html_to_tiptap;
//! use notebridge_editor::{apply_format, blocks_to_tiptap, tiptap_to_blocks, IdGenerator, SpanMark};
//!
//! let doc = html_to_tiptap(Some("<p>hello world</p>"));
//! let mut ids = IdGenerator::for_note("note-1");
//! let mut blocks = tiptap_to_blocks(&doc, &mut ids);
//!
//! blocks[0].spans = apply_format(&blocks[0].spans, 6, 11, SpanMark::Bold);
//! let updated = blocks_to_tiptap(&blocks);
//! assert_eq!(updated.content[0].children().len(), 2);
//! ```

pub mod blocks;
pub mod convert;
pub mod errors;
pub mod format;
pub mod id_generator;

pub use blocks::{BlockType, EditorBlock, SpanMark, SpanMarks, TextSpan};
pub use convert::{blocks_from_tiptap_json, blocks_to_tiptap, parse_blocks, tiptap_to_blocks};
pub use errors::{EditorError, EditorResult};
pub use format::{apply_format, is_format_active, merge_adjacent_spans, spans_text};
pub use id_generator::{note_seed, IdGenerator, IdSource};
