//! Rules command implementation.

use super::resolve_dataset;
use crate::cli::DatasetArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use glossa_domain::traits::CatalogStore;
use glossa_store::SqliteCatalog;

/// Execute the rules command: list policy rules for a dataset.
pub fn execute_rules(args: DatasetArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let catalog = SqliteCatalog::new(config.database_path()?)?;
    let id = resolve_dataset(&catalog, &args.dataset)?;
    let rules = catalog.list_rules(id)?;
    println!("{}", formatter.format_rules(&rules)?);
    Ok(())
}
