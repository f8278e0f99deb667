//! Preview command implementation.

use super::guess_media_type;
use crate::cli::PreviewArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use glossa_domain::FilePayload;
use glossa_extractor::FileOrchestrator;
use std::fs;

/// Execute the preview command: profile a local file without model calls.
pub fn execute_preview(args: PreviewArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let bytes = fs::read(&args.file)?;
    let filename = args
        .file
        .file_name()
        .ok_or_else(|| CliError::InvalidInput(format!("Not a file: {}", args.file.display())))?
        .to_string_lossy()
        .into_owned();
    let media_type = args
        .media_type
        .unwrap_or_else(|| guess_media_type(&filename).to_string());

    let payload = FilePayload::new(bytes, filename, media_type);
    let orchestrator = FileOrchestrator::new(config.extraction.clone());
    let preview = orchestrator.preview(&payload)?;

    for warning in &preview.warnings {
        eprintln!("{}", formatter.warning(warning));
    }

    if preview.is_tabular() {
        println!("{}", formatter.format_profiles(&preview.column_profiles)?);
    } else {
        println!(
            "{}",
            formatter.info(&format!(
                "Unstructured document: {} characters of text extracted",
                preview.text.chars().count()
            ))
        );
    }

    Ok(())
}
