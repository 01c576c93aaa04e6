//! Error types for the block editor

use thiserror::Error;

pub type EditorResult<T> = Result<T, EditorError>;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Unknown block type: {0}")]
    UnknownBlockType(String),

    #[error("Unknown span mark: {0}")]
    UnknownMark(String),

    #[error("Invalid block JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}
