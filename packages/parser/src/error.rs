use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

/// Problems found while scanning HTML.
///
/// The parser never returns these to callers of `parse_html`; they are
/// recorded as diagnostics while the offending input is absorbed as text.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Unterminated tag at {pos}: no closing '>'")]
    UnterminatedTag { pos: usize },

    #[error("Unclosed element <{tag}> at {pos}: no matching </{tag}>")]
    UnclosedElement { pos: usize, tag: String },

    #[error("Unterminated comment at {pos}")]
    UnterminatedComment { pos: usize },

    #[error("Nesting too deep at {pos}: limit is {limit}")]
    NestingTooDeep { pos: usize, limit: usize },
}

impl ParseError {
    pub fn unterminated_tag(pos: usize) -> Self {
        Self::UnterminatedTag { pos }
    }

    pub fn unclosed_element(pos: usize, tag: impl Into<String>) -> Self {
        Self::UnclosedElement {
            pos,
            tag: tag.into(),
        }
    }

    pub fn unterminated_comment(pos: usize) -> Self {
        Self::UnterminatedComment { pos }
    }

    pub fn nesting_too_deep(pos: usize, limit: usize) -> Self {
        Self::NestingTooDeep { pos, limit }
    }

    /// Byte offset into the fragment that was being scanned.
    pub fn pos(&self) -> usize {
        match self {
            Self::UnterminatedTag { pos }
            | Self::UnclosedElement { pos, .. }
            | Self::UnterminatedComment { pos }
            | Self::NestingTooDeep { pos, .. } => *pos,
        }
    }
}
