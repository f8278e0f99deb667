//! Request and result types for processing runs

use glossa_domain::{ColumnProfile, DatasetId, ExtractionMode, GlossaryTerm, PolicyRule};
use serde::{Deserialize, Serialize};

/// Request to process one registered dataset end to end
#[derive(Debug, Clone)]
pub struct ProcessRequest {
    /// Dataset to process
    pub dataset_id: DatasetId,

    /// Human-readable dataset name (appears verbatim in prompts)
    pub dataset_name: String,

    /// Path of the raw file in the object store
    pub storage_path: String,

    /// Original filename
    pub filename: String,

    /// Declared media type
    pub media_type: String,

    /// Declared size in bytes
    pub declared_size: u64,

    /// Optional business-context string
    pub business_context: Option<String>,

    /// Extraction depth
    pub mode: ExtractionMode,
}

/// Outcome of classifying and reading one file
///
/// Invariant: a tabular classification fills `column_profiles` and leaves
/// `text` empty; an unstructured classification does the reverse.
#[derive(Debug, Clone, Default)]
pub struct FilePreview {
    /// Per-column profiles (empty unless tabular)
    pub column_profiles: Vec<ColumnProfile>,

    /// Extracted text (empty unless unstructured)
    pub text: String,

    /// Warnings gathered while reading (row caps, tabular fallback)
    pub warnings: Vec<String>,
}

impl FilePreview {
    /// Whether the file was handled as tabular data
    pub fn is_tabular(&self) -> bool {
        !self.column_profiles.is_empty()
    }
}

/// Result of one complete processing run
#[derive(Debug, Clone)]
pub struct ExtractionReport {
    /// Deduplicated glossary terms
    pub terms: Vec<GlossaryTerm>,

    /// Policy rules (document path only)
    pub rules: Vec<PolicyRule>,

    /// Column profiles (tabular path only)
    pub column_profiles: Vec<ColumnProfile>,

    /// Warnings accumulated across the run
    pub warnings: Vec<String>,

    /// Summary metadata
    pub metadata: ExtractionMetadata,
}

/// Metadata about a processing run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionMetadata {
    /// Dataset that was processed
    pub dataset_id: DatasetId,

    /// Model used for the extraction calls
    pub model_name: String,

    /// Wall-clock processing time in milliseconds
    pub duration_ms: u64,

    /// Number of terms persisted
    pub terms_extracted: usize,

    /// Number of rules persisted
    pub rules_extracted: usize,
}
