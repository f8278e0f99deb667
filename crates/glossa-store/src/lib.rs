//! Glossa Storage Layer
//!
//! Implements the `CatalogStore` and `ObjectStore` traits from
//! `glossa-domain`.
//!
//! # Architecture
//!
//! - SQLite for the catalog (datasets, glossary terms, policy rules)
//! - Filesystem staging for raw uploads
//!
//! # Examples
//!
//! ```no_run
//! use glossa_store::SqliteCatalog;
//!
//! let catalog = SqliteCatalog::new(":memory:").unwrap();
//! // Catalog is now ready for dataset operations
//! ```

#![warn(missing_docs)]

mod object_store;

pub use object_store::FsObjectStore;

use glossa_domain::traits::CatalogStore;
use glossa_domain::{Dataset, DatasetId, GlossaryTerm, PolicyRule, ProcessingStatus};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Filesystem error from the object store
    #[error("Object store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Dataset not found
    #[error("Dataset not found: {0}")]
    NotFound(String),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// SQLite-based implementation of `CatalogStore`
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Callers share a catalog across
/// tasks behind a mutex, or give each thread its own instance.
pub struct SqliteCatalog {
    conn: Connection,
}

impl SqliteCatalog {
    /// Create a catalog backed by the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use glossa_store::SqliteCatalog;
    ///
    /// let catalog = SqliteCatalog::new("glossa.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let mut catalog = Self { conn };
        catalog.initialize_schema()?;
        Ok(catalog)
    }

    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    /// Convert a DatasetId to bytes for storage
    fn id_to_bytes(id: DatasetId) -> Vec<u8> {
        id.value().to_be_bytes().to_vec()
    }

    /// Convert bytes back to a DatasetId
    fn bytes_to_id(bytes: &[u8]) -> Result<DatasetId, StoreError> {
        if bytes.len() != 16 {
            return Err(StoreError::InvalidData(format!(
                "Expected 16 bytes for DatasetId, got {}",
                bytes.len()
            )));
        }
        let mut arr = [0u8; 16];
        arr.copy_from_slice(bytes);
        Ok(DatasetId::from_value(u128::from_be_bytes(arr)))
    }

    fn strings_to_json(values: &[String]) -> String {
        serde_json::to_string(values).unwrap_or_else(|_| "[]".to_string())
    }

    fn json_to_strings(json: &str) -> Result<Vec<String>, StoreError> {
        serde_json::from_str(json)
            .map_err(|e| StoreError::InvalidData(format!("Bad JSON list column: {}", e)))
    }

    fn row_to_dataset(row: &Row<'_>) -> rusqlite::Result<Dataset> {
        let id_bytes: Vec<u8> = row.get(0)?;
        let id = Self::bytes_to_id(&id_bytes).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Blob, Box::new(e))
        })?;

        let status_str: String = row.get(7)?;
        let status = ProcessingStatus::parse(&status_str).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                7,
                rusqlite::types::Type::Text,
                Box::new(StoreError::InvalidData(format!(
                    "Unknown status: {}",
                    status_str
                ))),
            )
        })?;

        Ok(Dataset {
            id,
            name: row.get(1)?,
            filename: row.get(2)?,
            media_type: row.get(3)?,
            size_bytes: row.get::<_, i64>(4)? as u64,
            storage_path: row.get(5)?,
            business_context: row.get(6)?,
            status,
            status_message: row.get(8)?,
            created_at: row.get::<_, i64>(9)? as u64,
        })
    }

    fn row_to_term(row: &Row<'_>) -> rusqlite::Result<GlossaryTerm> {
        let dataset_bytes: Vec<u8> = row.get(0)?;
        let dataset_id = Self::bytes_to_id(&dataset_bytes).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Blob, Box::new(e))
        })?;

        let list = |index: usize, json: String| {
            Self::json_to_strings(&json).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    index,
                    rusqlite::types::Type::Text,
                    Box::new(e),
                )
            })
        };

        Ok(GlossaryTerm {
            name: row.get(1)?,
            definition: row.get(2)?,
            source_columns: list(3, row.get(3)?)?,
            data_types: list(4, row.get(4)?)?,
            sample_values: list(5, row.get(5)?)?,
            synonyms: list(6, row.get(6)?)?,
            category: row.get(7)?,
            confidence: row.get(8)?,
            dataset_id: Some(dataset_id),
            source_file: row.get(9)?,
        })
    }

    fn row_to_rule(row: &Row<'_>) -> rusqlite::Result<PolicyRule> {
        let dataset_bytes: Vec<u8> = row.get(0)?;
        let dataset_id = Self::bytes_to_id(&dataset_bytes).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Blob, Box::new(e))
        })?;

        let list = |index: usize, json: String| {
            Self::json_to_strings(&json).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    index,
                    rusqlite::types::Type::Text,
                    Box::new(e),
                )
            })
        };

        Ok(PolicyRule {
            code: row.get(1)?,
            text: row.get(2)?,
            citations: list(3, row.get(3)?)?,
            tags: list(4, row.get(4)?)?,
            severity: row.get(5)?,
            effective_date: row.get(6)?,
            confidence: row.get(7)?,
            dataset_id: Some(dataset_id),
        })
    }
}

impl CatalogStore for SqliteCatalog {
    type Error = StoreError;

    fn create_dataset(&mut self, dataset: Dataset) -> Result<DatasetId, Self::Error> {
        self.conn.execute(
            "INSERT INTO datasets (id, name, filename, media_type, size_bytes, storage_path,
                                   business_context, status, status_message, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                Self::id_to_bytes(dataset.id),
                &dataset.name,
                &dataset.filename,
                &dataset.media_type,
                dataset.size_bytes as i64,
                &dataset.storage_path,
                &dataset.business_context,
                dataset.status.as_str(),
                &dataset.status_message,
                dataset.created_at as i64,
            ],
        )?;

        Ok(dataset.id)
    }

    fn get_dataset(&self, id: DatasetId) -> Result<Option<Dataset>, Self::Error> {
        let dataset = self
            .conn
            .query_row(
                "SELECT id, name, filename, media_type, size_bytes, storage_path,
                        business_context, status, status_message, created_at
                 FROM datasets WHERE id = ?1",
                params![Self::id_to_bytes(id)],
                Self::row_to_dataset,
            )
            .optional()?;

        Ok(dataset)
    }

    fn list_datasets(&self) -> Result<Vec<Dataset>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, filename, media_type, size_bytes, storage_path,
                    business_context, status, status_message, created_at
             FROM datasets ORDER BY created_at DESC, id DESC",
        )?;

        let datasets = stmt
            .query_map([], Self::row_to_dataset)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(datasets)
    }

    fn upsert_terms(
        &mut self,
        id: DatasetId,
        terms: &[GlossaryTerm],
    ) -> Result<usize, Self::Error> {
        let id_bytes = Self::id_to_bytes(id);
        let tx = self.conn.transaction()?;

        let mut written = 0;
        for term in terms {
            tx.execute(
                "INSERT INTO glossary_terms (dataset_id, name, normalized_name, definition,
                                             source_columns, data_types, sample_values, synonyms,
                                             category, confidence, source_file)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                 ON CONFLICT(dataset_id, normalized_name) DO UPDATE SET
                   name = excluded.name,
                   definition = excluded.definition,
                   source_columns = excluded.source_columns,
                   data_types = excluded.data_types,
                   sample_values = excluded.sample_values,
                   synonyms = excluded.synonyms,
                   category = excluded.category,
                   confidence = excluded.confidence,
                   source_file = excluded.source_file",
                params![
                    &id_bytes,
                    &term.name,
                    term.normalized_name(),
                    &term.definition,
                    Self::strings_to_json(&term.source_columns),
                    Self::strings_to_json(&term.data_types),
                    Self::strings_to_json(&term.sample_values),
                    Self::strings_to_json(&term.synonyms),
                    &term.category,
                    term.confidence,
                    &term.source_file,
                ],
            )?;
            written += 1;
        }

        tx.commit()?;
        Ok(written)
    }

    fn insert_rules(&mut self, id: DatasetId, rules: &[PolicyRule]) -> Result<usize, Self::Error> {
        let id_bytes = Self::id_to_bytes(id);
        let tx = self.conn.transaction()?;

        let mut written = 0;
        for rule in rules {
            tx.execute(
                "INSERT INTO policy_rules (dataset_id, code, rule_text, citations, tags,
                                           severity, effective_date, confidence)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    &id_bytes,
                    &rule.code,
                    &rule.text,
                    Self::strings_to_json(&rule.citations),
                    Self::strings_to_json(&rule.tags),
                    &rule.severity,
                    &rule.effective_date,
                    rule.confidence,
                ],
            )?;
            written += 1;
        }

        tx.commit()?;
        Ok(written)
    }

    fn list_terms(&self, id: DatasetId) -> Result<Vec<GlossaryTerm>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT dataset_id, name, definition, source_columns, data_types, sample_values,
                    synonyms, category, confidence, source_file
             FROM glossary_terms WHERE dataset_id = ?1
             ORDER BY confidence DESC, normalized_name ASC",
        )?;

        let terms = stmt
            .query_map(params![Self::id_to_bytes(id)], Self::row_to_term)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(terms)
    }

    fn list_rules(&self, id: DatasetId) -> Result<Vec<PolicyRule>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT dataset_id, code, rule_text, citations, tags, severity, effective_date,
                    confidence
             FROM policy_rules WHERE dataset_id = ?1 ORDER BY id ASC",
        )?;

        let rules = stmt
            .query_map(params![Self::id_to_bytes(id)], Self::row_to_rule)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rules)
    }

    fn set_status(
        &mut self,
        id: DatasetId,
        status: ProcessingStatus,
        message: Option<&str>,
    ) -> Result<(), Self::Error> {
        let updated = self.conn.execute(
            "UPDATE datasets SET status = ?2, status_message = ?3 WHERE id = ?1",
            params![Self::id_to_bytes(id), status.as_str(), message],
        )?;

        if updated == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    fn get_status(
        &self,
        id: DatasetId,
    ) -> Result<Option<(ProcessingStatus, Option<String>)>, Self::Error> {
        let result = self
            .conn
            .query_row(
                "SELECT status, status_message FROM datasets WHERE id = ?1",
                params![Self::id_to_bytes(id)],
                |row| {
                    let status_str: String = row.get(0)?;
                    let message: Option<String> = row.get(1)?;
                    Ok((status_str, message))
                },
            )
            .optional()?;

        match result {
            Some((status_str, message)) => {
                let status = ProcessingStatus::parse(&status_str).ok_or_else(|| {
                    StoreError::InvalidData(format!("Unknown status: {}", status_str))
                })?;
                Ok(Some((status, message)))
            }
            None => Ok(None),
        }
    }
}
