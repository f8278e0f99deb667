//! Status command implementation.

use super::resolve_dataset;
use crate::cli::DatasetArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use glossa_domain::traits::CatalogStore;
use glossa_store::SqliteCatalog;

/// Execute the status command: show a dataset's processing status.
pub fn execute_status(args: DatasetArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let catalog = SqliteCatalog::new(config.database_path()?)?;
    let id = resolve_dataset(&catalog, &args.dataset)?;

    let (status, message) = catalog
        .get_status(id)?
        .ok_or_else(|| CliError::DatasetNotFound(args.dataset))?;
    println!("{}", formatter.format_status(status, message.as_deref())?);
    Ok(())
}
