//! Terms command implementation.

use super::resolve_dataset;
use crate::cli::DatasetArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use glossa_domain::traits::CatalogStore;
use glossa_store::SqliteCatalog;

/// Execute the terms command: list glossary terms for a dataset.
pub fn execute_terms(args: DatasetArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let catalog = SqliteCatalog::new(config.database_path()?)?;
    let id = resolve_dataset(&catalog, &args.dataset)?;
    let terms = catalog.list_terms(id)?;
    println!("{}", formatter.format_terms(&terms)?);
    Ok(())
}
