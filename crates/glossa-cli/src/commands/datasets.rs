//! Datasets command implementation.

use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use glossa_domain::traits::CatalogStore;
use glossa_store::SqliteCatalog;

/// Execute the datasets command: list registered datasets, newest first.
pub fn execute_datasets(config: &Config, formatter: &Formatter) -> Result<()> {
    let catalog = SqliteCatalog::new(config.database_path()?)?;
    let datasets = catalog.list_datasets()?;
    println!("{}", formatter.format_datasets(&datasets)?);
    Ok(())
}
