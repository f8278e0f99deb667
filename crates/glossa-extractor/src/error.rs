//! Error types for the extraction pipeline

use glossa_domain::DatasetId;
use thiserror::Error;

/// Errors that can occur during a processing run
#[derive(Error, Debug)]
pub enum ExtractError {
    /// File exceeds the configured size ceiling; rejected before any parsing
    #[error("file too large: {size} bytes (limit: {limit})")]
    FileTooLarge {
        /// Declared size of the rejected file
        size: u64,
        /// Configured ceiling
        limit: u64,
    },

    /// Every model attempt failed; carries the last underlying failure
    #[error("extraction failed after {attempts} attempts: {last}")]
    AllAttemptsFailed {
        /// Number of attempts made
        attempts: u32,
        /// Message of the last failure
        last: String,
    },

    /// LLM provider error outside the retry loop
    #[error("LLM error: {0}")]
    Llm(String),

    /// Model output did not match the expected shape
    #[error("invalid response format: {0}")]
    InvalidFormat(String),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// PDF text extraction failed; fatal for the run, no fallback
    #[error("PDF text extraction failed: {0}")]
    Pdf(String),

    /// Built without the `pdf` feature but given a PDF
    #[error("PDF support disabled at build time")]
    PdfSupportDisabled,

    /// Catalog persistence failed; fatal for the run, not retried
    #[error("catalog error: {0}")]
    Store(String),

    /// Object store download/upload failed; fatal for the run, not retried
    #[error("object store error: {0}")]
    ObjectStore(String),

    /// A run for this dataset is already in flight
    #[error("dataset {0} is already being processed")]
    AlreadyProcessing(DatasetId),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for ExtractError {
    fn from(e: serde_json::Error) -> Self {
        ExtractError::JsonParse(e.to_string())
    }
}
