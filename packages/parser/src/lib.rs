pub mod ast;
pub mod attributes;
pub mod error;
pub mod parser;
pub mod tokenizer;

#[cfg(test)]
mod tests_malformed;

pub use ast::ParsedElement;
pub use attributes::extract_attributes;
pub use error::{ParseError, ParseResult};
pub use parser::{
    parse_html, parse_html_with, CloseTagMatching, Parser, ParserOptions, DEFAULT_MAX_DEPTH,
};
