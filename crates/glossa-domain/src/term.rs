//! Glossary term module - the primary extraction output

use crate::DatasetId;
use serde::{Deserialize, Serialize};

/// Fallback category assigned when the model returns none
pub const DEFAULT_CATEGORY: &str = "general";

/// A business glossary term extracted from a dataset or document
///
/// Terms are created from model output, merged by the deduplicator, and
/// terminal once persisted to the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlossaryTerm {
    /// Canonical term name (trimmed)
    pub name: String,

    /// Definition text
    pub definition: String,

    /// Column names that contributed evidence for this term
    #[serde(default)]
    pub source_columns: Vec<String>,

    /// Observed data-type tags
    #[serde(default)]
    pub data_types: Vec<String>,

    /// Example values observed in the data
    #[serde(default)]
    pub sample_values: Vec<String>,

    /// Synonym strings
    #[serde(default)]
    pub synonyms: Vec<String>,

    /// Category label
    pub category: String,

    /// Model confidence, clamped to [0, 1]
    pub confidence: f64,

    /// Dataset this term was extracted from, once linked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_id: Option<DatasetId>,

    /// Source filename, once linked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
}

impl GlossaryTerm {
    /// Create a term with the fallback category and a neutral confidence
    ///
    /// The name is trimmed; the original casing is preserved.
    pub fn new(name: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            name: name.into().trim().to_string(),
            definition: definition.into(),
            source_columns: Vec::new(),
            data_types: Vec::new(),
            sample_values: Vec::new(),
            synonyms: Vec::new(),
            category: DEFAULT_CATEGORY.to_string(),
            confidence: 0.5,
            dataset_id: None,
            source_file: None,
        }
    }

    /// Set the confidence, clamping it to [0, 1]
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }

    /// Normalized key used for case-insensitive deduplication
    pub fn normalized_name(&self) -> String {
        self.name.trim().to_lowercase()
    }

    /// Check that the term is well-formed enough to keep
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("term name is empty".to_string());
        }
        if self.definition.trim().is_empty() {
            return Err(format!("term '{}' has an empty definition", self.name));
        }
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(format!(
                "term '{}' confidence {} out of range [0.0, 1.0]",
                self.name, self.confidence
            ));
        }
        Ok(())
    }
}
