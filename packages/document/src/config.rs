use crate::error::{DocumentError, DocumentResult};
use notebridge_parser::ParserOptions;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TABLE_MARKER: &str = "📊 TABLE";
pub const DEFAULT_TABLE_DIVIDER: &str = "---";
pub const DEFAULT_TABLE_CELL_SEPARATOR: &str = " | ";
/// Highest `parser.maxDepth` accepted from configuration.
pub const MAX_PARSER_DEPTH: usize = 256;

/// Conversion settings shared by the HTML converter, serializer and repairer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConverterOptions {
    /// Bold paragraph emitted in front of a flattened table
    #[serde(default = "default_table_marker")]
    pub table_marker: String,

    /// Paragraph emitted after a flattened table's header row
    #[serde(default = "default_table_divider")]
    pub table_divider: String,

    /// Joins the cells of one table row
    #[serde(default = "default_table_cell_separator")]
    pub table_cell_separator: String,

    #[serde(default)]
    pub parser: ParserOptions,
}

fn default_table_marker() -> String {
    DEFAULT_TABLE_MARKER.to_string()
}

fn default_table_divider() -> String {
    DEFAULT_TABLE_DIVIDER.to_string()
}

fn default_table_cell_separator() -> String {
    DEFAULT_TABLE_CELL_SEPARATOR.to_string()
}

impl Default for ConverterOptions {
    fn default() -> Self {
        Self {
            table_marker: default_table_marker(),
            table_divider: default_table_divider(),
            table_cell_separator: default_table_cell_separator(),
            parser: ParserOptions::default(),
        }
    }
}

impl ConverterOptions {
    /// Load options from a JSON object; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> DocumentResult<Self> {
        let options: ConverterOptions = serde_json::from_str(json)?;
        options.check()?;
        Ok(options)
    }

    fn check(&self) -> DocumentResult<()> {
        if self.parser.max_depth == 0 || self.parser.max_depth > MAX_PARSER_DEPTH {
            return Err(DocumentError::InvalidConfig(format!(
                "parser.maxDepth must be between 1 and {}",
                MAX_PARSER_DEPTH
            )));
        }
        if self.table_cell_separator.is_empty() {
            return Err("tableCellSeparator must not be empty".into());
        }
        Ok(())
    }
}
