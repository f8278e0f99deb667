//! Error types for tabular parsing

use thiserror::Error;

/// Errors that can occur while parsing row-oriented files
#[derive(Error, Debug)]
pub enum TabularError {
    /// CSV/TSV parse error
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON parse error
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Spreadsheet container or sheet XML error
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    /// File extension is not a known tabular format
    #[error("Unsupported tabular format: {0}")]
    UnsupportedFormat(String),

    /// Parsed content does not form a usable table
    #[error("Invalid table structure: {0}")]
    InvalidStructure(String),
}
