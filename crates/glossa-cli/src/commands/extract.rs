//! Extract command implementation.

use super::guess_media_type;
use crate::cli::ExtractArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use glossa_domain::traits::{CatalogStore, LlmProvider, ObjectStore};
use glossa_domain::{Dataset, DatasetId};
use glossa_extractor::{ExtractionReport, ProcessRequest, ProcessingService};
use glossa_llm::{GeminiProvider, MockProvider};
use glossa_store::{FsObjectStore, SqliteCatalog};
use std::fs;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

/// Execute the extract command: register, stage, and process one file.
pub async fn execute_extract(
    args: ExtractArgs,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
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
    let name = args.name.unwrap_or_else(|| filename.clone());

    let id = DatasetId::new();
    let storage_path = format!("uploads/{}/{}", id, filename);
    let created_at = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| CliError::Config(format!("System clock error: {}", e)))?
        .as_secs();

    let objects = Arc::new(FsObjectStore::new(config.objects_dir()?)?);
    objects.upload(&storage_path, &bytes, &media_type)?;

    let catalog = Arc::new(Mutex::new(SqliteCatalog::new(config.database_path()?)?));
    {
        let mut dataset = Dataset::new(
            id,
            name.clone(),
            filename.clone(),
            media_type.clone(),
            bytes.len() as u64,
            storage_path.clone(),
            created_at,
        );
        if let Some(context) = &args.context {
            dataset = dataset.with_business_context(context.clone());
        }
        catalog.lock().unwrap().create_dataset(dataset)?;
    }

    let request = ProcessRequest {
        dataset_id: id,
        dataset_name: name,
        storage_path,
        filename: filename.clone(),
        media_type,
        declared_size: bytes.len() as u64,
        business_context: args.context,
        mode: args.mode.into(),
    };

    let report = match config.llm.provider.as_str() {
        "gemini" => {
            let api_key = config.api_key()?;
            let model = config.extraction.model.clone();
            let provider = match &config.llm.endpoint {
                Some(endpoint) => GeminiProvider::with_endpoint(endpoint.clone(), api_key, model),
                None => GeminiProvider::new(api_key, model),
            }
            .with_temperature(config.extraction.temperature);
            run_pipeline(Arc::new(provider), catalog, objects, config, request).await?
        }
        "mock" => {
            let provider = MockProvider::new(r#"{"terms": []}"#);
            run_pipeline(Arc::new(provider), catalog, objects, config, request).await?
        }
        other => {
            return Err(CliError::Config(format!(
                "Unknown llm.provider '{}'; expected \"gemini\" or \"mock\"",
                other
            )))
        }
    };

    for warning in &report.warnings {
        eprintln!("{}", formatter.warning(warning));
    }

    println!(
        "{}",
        formatter.success(&format!(
            "Extracted {} term(s) and {} rule(s) from '{}' in {}ms",
            report.metadata.terms_extracted,
            report.metadata.rules_extracted,
            filename,
            report.metadata.duration_ms
        ))
    );
    println!("{}", formatter.info(&format!("Dataset ID: {}", id)));

    if !report.terms.is_empty() {
        println!("{}", formatter.format_terms(&report.terms)?);
    }
    if !report.rules.is_empty() {
        println!("{}", formatter.format_rules(&report.rules)?);
    }

    Ok(())
}

async fn run_pipeline<P>(
    provider: Arc<P>,
    catalog: Arc<Mutex<SqliteCatalog>>,
    objects: Arc<FsObjectStore>,
    config: &Config,
    request: ProcessRequest,
) -> Result<ExtractionReport>
where
    P: LlmProvider + Send + Sync + 'static,
    P::Error: std::fmt::Display,
{
    let service =
        ProcessingService::new(provider, catalog, objects, config.extraction.clone());
    Ok(service.process(request).await?)
}
