//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the extraction pipeline and
//! infrastructure. Implementations live in other crates (glossa-store,
//! glossa-llm).

use crate::{Dataset, DatasetId, GlossaryTerm, PolicyRule, ProcessingStatus};
use async_trait::async_trait;

/// Trait for the relational catalog holding datasets, terms, and rules
///
/// Implemented by the infrastructure layer (glossa-store)
pub trait CatalogStore {
    /// Error type for catalog operations
    type Error;

    /// Register a dataset
    fn create_dataset(&mut self, dataset: Dataset) -> Result<DatasetId, Self::Error>;

    /// Get a dataset by ID
    fn get_dataset(&self, id: DatasetId) -> Result<Option<Dataset>, Self::Error>;

    /// List all registered datasets, newest first
    fn list_datasets(&self) -> Result<Vec<Dataset>, Self::Error>;

    /// Upsert glossary terms for a dataset; the conflict target is the
    /// (dataset, normalized term name) pair. Returns the number written.
    fn upsert_terms(
        &mut self,
        id: DatasetId,
        terms: &[GlossaryTerm],
    ) -> Result<usize, Self::Error>;

    /// Insert policy rules for a dataset (plain insert, no conflict target).
    /// Returns the number written.
    fn insert_rules(&mut self, id: DatasetId, rules: &[PolicyRule]) -> Result<usize, Self::Error>;

    /// List glossary terms for a dataset, highest confidence first
    fn list_terms(&self, id: DatasetId) -> Result<Vec<GlossaryTerm>, Self::Error>;

    /// List policy rules for a dataset
    fn list_rules(&self, id: DatasetId) -> Result<Vec<PolicyRule>, Self::Error>;

    /// Update the processing status of a dataset
    fn set_status(
        &mut self,
        id: DatasetId,
        status: ProcessingStatus,
        message: Option<&str>,
    ) -> Result<(), Self::Error>;

    /// Get the processing status of a dataset plus its attached message
    fn get_status(
        &self,
        id: DatasetId,
    ) -> Result<Option<(ProcessingStatus, Option<String>)>, Self::Error>;
}

/// Trait for raw file staging
///
/// Implemented by the infrastructure layer (glossa-store)
pub trait ObjectStore {
    /// Error type for object store operations
    type Error;

    /// Download the object at `path`
    fn download(&self, path: &str) -> Result<Vec<u8>, Self::Error>;

    /// Upload bytes to `path`
    fn upload(&self, path: &str, bytes: &[u8], content_type: &str) -> Result<(), Self::Error>;
}

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (glossa-llm). Calls suspend at the
/// network boundary; retry and timeout policy live in the extraction client,
/// not here.
#[async_trait]
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Generate text completion
    async fn generate(&self, prompt: &str) -> Result<String, Self::Error>;

    /// Generate with a response schema constraining the output shape
    ///
    /// The schema is a correctness aid, not a guarantee; callers must still
    /// parse defensively.
    async fn generate_structured(
        &self,
        prompt: &str,
        schema_json: &str,
    ) -> Result<String, Self::Error>;
}
