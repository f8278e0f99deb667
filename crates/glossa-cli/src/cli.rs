//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Glossa CLI - Extract business glossaries from datasets and documents.
#[derive(Debug, Parser)]
#[command(name = "glossa")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (IDs only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Profile a local file without calling the model
    Preview(PreviewArgs),

    /// Register a file and run term extraction end to end
    Extract(ExtractArgs),

    /// List registered datasets
    Datasets,

    /// List glossary terms for a dataset
    Terms(DatasetArgs),

    /// List policy rules for a dataset
    Rules(DatasetArgs),

    /// Show the processing status of a dataset
    Status(DatasetArgs),
}

/// Arguments for the preview command.
#[derive(Debug, Parser)]
pub struct PreviewArgs {
    /// File to profile
    pub file: PathBuf,

    /// Override the detected media type
    #[arg(short, long)]
    pub media_type: Option<String>,
}

/// Arguments for the extract command.
#[derive(Debug, Parser)]
pub struct ExtractArgs {
    /// File to process
    pub file: PathBuf,

    /// Dataset name (defaults to the filename)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Business context passed to the model
    #[arg(short, long)]
    pub context: Option<String>,

    /// Extraction depth
    #[arg(short, long, value_enum, default_value = "basic")]
    pub mode: ModeArg,

    /// Override the detected media type
    #[arg(long)]
    pub media_type: Option<String>,
}

/// Arguments for commands that address one dataset.
#[derive(Debug, Parser)]
pub struct DatasetArgs {
    /// Dataset ID (full UUID or unique prefix)
    pub dataset: String,
}

/// Extraction mode argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ModeArg {
    /// Primary entities only
    Basic,
    /// Also include derived and relationship concepts
    Comprehensive,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<ModeArg> for glossa_domain::ExtractionMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Basic => glossa_domain::ExtractionMode::Basic,
            ModeArg::Comprehensive => glossa_domain::ExtractionMode::Comprehensive,
        }
    }
}
