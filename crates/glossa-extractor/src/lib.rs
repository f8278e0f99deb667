//! Glossa Extractor
//!
//! Turns uploaded files into business glossary terms and policy rules using
//! a hosted text-generation model.
//!
//! # Overview
//!
//! The extractor is the application layer of Glossa. Given a file's raw
//! bytes, it profiles tabular content (or extracts document text), renders an
//! extraction prompt, calls the model with bounded retry, deduplicates the
//! returned terms, and persists results through the catalog traits.
//!
//! # Architecture
//!
//! ```text
//! bytes → FileOrchestrator → {profiles | text} → PromptBuilder
//!       → ExtractionClient (retry/backoff/schema) → dedup_terms
//!       → CatalogStore
//! ```
//!
//! # Key Behaviors
//!
//! - **Graceful tabular fallback**: a tabular parse failure degrades to text
//!   extraction with a warning instead of failing the run
//! - **Bounded retry**: each model attempt is individually timed out; failed
//!   attempts back off exponentially up to a fixed attempt ceiling
//! - **In-flight guard**: a process-local set silently skips duplicate
//!   triggers for a dataset already being processed; it is not durable, so a
//!   restart loses all in-flight tracking
//!
//! # Example Usage
//!
//! ```no_run
//! use glossa_extractor::{ExtractionClient, ExtractorConfig, FileOrchestrator, PromptBuilder};
//! use glossa_domain::FilePayload;
//! use glossa_llm::MockProvider;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ExtractorConfig::default();
//! let orchestrator = FileOrchestrator::new(config.clone());
//!
//! let payload = FilePayload::new(b"name,amount\nwidget,100\n".to_vec(), "items.csv", "text/csv");
//! let preview = orchestrator.preview(&payload)?;
//!
//! let prompt = PromptBuilder::new("Items")
//!     .build_term_prompt(&preview.column_profiles, &preview.text);
//!
//! let provider = Arc::new(MockProvider::new(r#"{"terms":[]}"#));
//! let client = ExtractionClient::new(provider, config);
//! let extraction = client.extract_terms(&prompt).await?;
//!
//! println!("Extracted {} terms", extraction.terms.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod client;
mod config;
mod dedup;
mod error;
mod orchestrator;
mod parser;
mod prompt;
mod reader;
mod service;
mod types;


pub use client::{ExtractionClient, TermExtraction};
pub use config::ExtractorConfig;
pub use dedup::dedup_terms;
pub use error::ExtractError;
pub use orchestrator::FileOrchestrator;
pub use prompt::PromptBuilder;
pub use reader::extract_text;
pub use service::{InFlightSet, ProcessingService, ScheduleOutcome};
pub use types::{ExtractionMetadata, ExtractionReport, FilePreview, ProcessRequest};
