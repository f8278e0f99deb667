//! Glossa CLI - Command-line interface for the Glossa glossary extractor.

use clap::Parser;
use glossa_cli::commands;
use glossa_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> glossa_cli::Result<()> {
    let cli = Cli::parse();

    // Load or create config
    let config = Config::load().unwrap_or_else(|_| {
        let cfg = Config::default();
        cfg.save().ok();
        cfg
    });

    let format = cli.format.map(Into::into).unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Preview(args) => commands::execute_preview(args, &config, &formatter)?,
        Command::Extract(args) => commands::execute_extract(args, &config, &formatter).await?,
        Command::Datasets => commands::execute_datasets(&config, &formatter)?,
        Command::Terms(args) => commands::execute_terms(args, &config, &formatter)?,
        Command::Rules(args) => commands::execute_rules(args, &config, &formatter)?,
        Command::Status(args) => commands::execute_status(args, &config, &formatter)?,
    }

    Ok(())
}
