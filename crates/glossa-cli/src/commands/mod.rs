//! Command implementations.

mod datasets;
mod extract;
mod preview;
mod rules;
mod status;
mod terms;

pub use datasets::execute_datasets;
pub use extract::execute_extract;
pub use preview::execute_preview;
pub use rules::execute_rules;
pub use status::execute_status;
pub use terms::execute_terms;

use crate::error::{CliError, Result};
use glossa_domain::traits::CatalogStore;
use glossa_domain::DatasetId;
use glossa_store::SqliteCatalog;

/// Resolve a dataset argument: a full UUID or a unique ID prefix.
pub(crate) fn resolve_dataset(catalog: &SqliteCatalog, input: &str) -> Result<DatasetId> {
    if let Ok(id) = DatasetId::from_string(input) {
        return Ok(id);
    }

    let matches: Vec<DatasetId> = catalog
        .list_datasets()?
        .into_iter()
        .map(|d| d.id)
        .filter(|id| id.to_string().starts_with(input))
        .collect();

    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(CliError::DatasetNotFound(input.to_string())),
        _ => Err(CliError::InvalidInput(format!(
            "Dataset prefix '{}' is ambiguous ({} matches)",
            input,
            matches.len()
        ))),
    }
}

/// Guess a media type from the filename extension.
pub(crate) fn guess_media_type(filename: &str) -> &'static str {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "csv" => "text/csv",
        "tsv" => "text/tab-separated-values",
        "json" => "application/json",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "xls" => "application/vnd.ms-excel",
        "pdf" => "application/pdf",
        "txt" | "md" => "text/plain",
        _ => "application/octet-stream",
    }
}
