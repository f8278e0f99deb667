//! File orchestrator - classify a raw file and turn it into a preview
//!
//! Sits between the object store and the prompt builder: enforces the size
//! limit, decides tabular versus unstructured, and produces the
//! [`FilePreview`] the extraction prompts are built from.

use crate::config::ExtractorConfig;
use crate::error::ExtractError;
use crate::reader;
use crate::types::FilePreview;
use glossa_domain::FilePayload;
use glossa_tabular::{parse_rows, profile_rows};
use tracing::{debug, warn};

/// Extensions handled by the tabular path
const TABULAR_EXTENSIONS: [&str; 5] = ["csv", "tsv", "json", "xlsx", "xls"];

/// Classifies and reads uploaded files
#[derive(Debug, Clone)]
pub struct FileOrchestrator {
    config: ExtractorConfig,
}

impl FileOrchestrator {
    /// Create an orchestrator with the given configuration
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Classify and read one file into a [`FilePreview`]
    ///
    /// The size limit is enforced before any byte of content is inspected,
    /// against the larger of the declared and actual sizes. A file that looks
    /// tabular but fails to parse falls back to the unstructured path with a
    /// warning rather than failing the run.
    pub fn preview(&self, payload: &FilePayload) -> Result<FilePreview, ExtractError> {
        let size = payload.size.max(payload.bytes.len() as u64);
        if size > self.config.max_file_size_bytes {
            return Err(ExtractError::FileTooLarge {
                size,
                limit: self.config.max_file_size_bytes,
            });
        }

        let mut warnings = Vec::new();

        if is_tabular_file(payload) {
            match parse_rows(&payload.bytes, &payload.filename) {
                Ok(rows) => {
                    let profile = profile_rows(&rows, &self.config.profile_limits());
                    debug!(
                        "Classified '{}' as tabular: {} columns, {} rows",
                        payload.filename,
                        profile.columns.len(),
                        profile.total_rows
                    );
                    warnings.extend(profile.warnings);
                    return Ok(FilePreview {
                        column_profiles: profile.columns,
                        text: String::new(),
                        warnings,
                    });
                }
                Err(e) => {
                    warn!("Tabular parse of '{}' failed: {}", payload.filename, e);
                    warnings.push(format!(
                        "Failed to parse '{}' as tabular data ({}); treating as unstructured text",
                        payload.filename, e
                    ));
                }
            }
        }

        let text = reader::extract_text(
            &payload.bytes,
            &payload.filename,
            &payload.media_type,
            self.config.max_text_length,
        )?;
        debug!(
            "Classified '{}' as unstructured: {} chars",
            payload.filename,
            text.chars().count()
        );
        Ok(FilePreview {
            column_profiles: Vec::new(),
            text,
            warnings,
        })
    }
}

/// Whether the file should first be tried as tabular data
fn is_tabular_file(payload: &FilePayload) -> bool {
    if let Some(extension) = payload.extension() {
        if TABULAR_EXTENSIONS.contains(&extension.as_str()) {
            return true;
        }
    }

    let media = payload.media_type.to_lowercase();
    media.contains("csv") || media.contains("spreadsheet") || media.contains("excel")
}
