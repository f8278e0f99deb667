//! Glossa Domain Layer
//!
//! This crate contains the core value objects and trait interfaces for Glossa.
//! It carries no infrastructure code: storage, HTTP, and LLM implementations
//! live in other crates and plug in through the traits defined here.
//!
//! ## Key Concepts
//!
//! - **Dataset**: An uploaded file registered for extraction, tracked by a
//!   UUIDv7-based [`DatasetId`] and a [`ProcessingStatus`]
//! - **ColumnProfile**: Per-column statistical/type summary of a tabular file
//! - **GlossaryTerm**: A business vocabulary entry extracted by the LLM
//! - **PolicyRule**: A governance rule extracted from document text
//! - **SemanticType**: The fixed enumeration of detected column types
//!
//! ## Architecture
//!
//! - Value objects are passed by copy/return; nothing here is shared mutable
//!   state
//! - Trait definitions ([`traits::CatalogStore`], [`traits::ObjectStore`],
//!   [`traits::LlmProvider`]) form the seams to the infrastructure layers

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod dataset;
pub mod mode;
pub mod payload;
pub mod profile;
pub mod rule;
pub mod semantic_type;
pub mod term;
pub mod traits;

// Re-exports for convenience
pub use dataset::{Dataset, DatasetId, ProcessingStatus};
pub use mode::ExtractionMode;
pub use payload::FilePayload;
pub use profile::{ColumnProfile, ColumnStats};
pub use rule::PolicyRule;
pub use semantic_type::SemanticType;
pub use term::GlossaryTerm;
