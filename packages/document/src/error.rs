use notebridge_parser::ParseError;
use thiserror::Error;

pub type DocumentResult<T> = Result<T, DocumentError>;

/// Errors from the strict entry points.
///
/// The conversion functions themselves never fail; they fall back to an
/// empty document or best-effort output instead.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<&str> for DocumentError {
    fn from(s: &str) -> Self {
        DocumentError::InvalidConfig(s.to_string())
    }
}
