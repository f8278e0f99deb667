//! Processing service - end-to-end runs with in-flight tracking
//!
//! One run per dataset at a time: a process-local set records datasets being
//! worked on, and duplicate triggers are reported rather than queued. The set
//! is not durable; a restart loses all in-flight tracking and any spawned
//! runs with it.

use crate::client::ExtractionClient;
use crate::config::ExtractorConfig;
use crate::error::ExtractError;
use crate::orchestrator::FileOrchestrator;
use crate::prompt::PromptBuilder;
use crate::types::{ExtractionMetadata, ExtractionReport, ProcessRequest};
use crate::{dedup, reader};
use glossa_domain::{
    traits::{CatalogStore, LlmProvider, ObjectStore},
    DatasetId, FilePayload, ProcessingStatus,
};
use std::collections::HashSet;
use std::fmt::Display;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Shared set of datasets currently being processed
pub type InFlightSet = Arc<Mutex<HashSet<DatasetId>>>;

/// Removes its dataset from the in-flight set when dropped
///
/// Tied to the run's scope so the entry is released on every exit path,
/// including panics inside the run.
struct InFlightGuard {
    set: InFlightSet,
    id: DatasetId,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.set.lock().unwrap().remove(&self.id);
    }
}

/// Outcome of scheduling a background run
#[derive(Debug)]
pub enum ScheduleOutcome {
    /// A background task was spawned for the dataset
    Started(JoinHandle<()>),

    /// A run for this dataset is already in flight; nothing was spawned
    AlreadyProcessing,
}

/// End-to-end processing service over pluggable infrastructure
pub struct ProcessingService<P, C, O> {
    client: ExtractionClient<P>,
    orchestrator: FileOrchestrator,
    catalog: Arc<Mutex<C>>,
    objects: Arc<O>,
    in_flight: InFlightSet,
}

impl<P, C, O> Clone for ProcessingService<P, C, O> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            orchestrator: self.orchestrator.clone(),
            catalog: Arc::clone(&self.catalog),
            objects: Arc::clone(&self.objects),
            in_flight: Arc::clone(&self.in_flight),
        }
    }
}

impl<P, C, O> ProcessingService<P, C, O>
where
    P: LlmProvider + Send + Sync + 'static,
    P::Error: Display,
    C: CatalogStore + Send + 'static,
    C::Error: Display,
    O: ObjectStore + Send + Sync + 'static,
    O::Error: Display,
{
    /// Create a service over the given provider, catalog, and object store
    pub fn new(
        provider: Arc<P>,
        catalog: Arc<Mutex<C>>,
        objects: Arc<O>,
        config: ExtractorConfig,
    ) -> Self {
        Self {
            client: ExtractionClient::new(provider, config.clone()),
            orchestrator: FileOrchestrator::new(config),
            catalog,
            objects,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Datasets currently being processed
    pub fn in_flight(&self) -> InFlightSet {
        Arc::clone(&self.in_flight)
    }

    /// Process a dataset to completion on the caller's task
    ///
    /// Returns `AlreadyProcessing` without doing any work if a run for the
    /// dataset is in flight. On failure the dataset's status is set to
    /// `Failed` with the error message attached.
    pub async fn process(&self, request: ProcessRequest) -> Result<ExtractionReport, ExtractError> {
        let _guard = self
            .try_reserve(request.dataset_id)
            .ok_or(ExtractError::AlreadyProcessing(request.dataset_id))?;

        match self.run(&request).await {
            Ok(report) => Ok(report),
            Err(e) => {
                self.record_failure(&request, &e);
                Err(e)
            }
        }
    }

    /// Spawn a background run for a dataset and return immediately
    ///
    /// The in-flight entry is reserved synchronously, so a second `schedule`
    /// call racing this one sees `AlreadyProcessing` even before the spawned
    /// task starts. Callers observe the result through the dataset's status.
    pub fn schedule(&self, request: ProcessRequest) -> ScheduleOutcome {
        let Some(guard) = self.try_reserve(request.dataset_id) else {
            info!(
                "Skipping dataset {}: a run is already in flight",
                request.dataset_id
            );
            return ScheduleOutcome::AlreadyProcessing;
        };

        let service = self.clone();
        let handle = tokio::spawn(async move {
            let _guard = guard;
            match service.run(&request).await {
                Ok(report) => {
                    info!(
                        "Processed dataset {}: {} terms, {} rules",
                        request.dataset_id,
                        report.metadata.terms_extracted,
                        report.metadata.rules_extracted
                    );
                }
                Err(e) => {
                    service.record_failure(&request, &e);
                }
            }
        });

        ScheduleOutcome::Started(handle)
    }

    /// Insert the dataset into the in-flight set, or report it taken
    fn try_reserve(&self, id: DatasetId) -> Option<InFlightGuard> {
        let mut in_flight = self.in_flight.lock().unwrap();
        if !in_flight.insert(id) {
            return None;
        }
        Some(InFlightGuard {
            set: Arc::clone(&self.in_flight),
            id,
        })
    }

    /// One full run: download, preview, extract, deduplicate, persist
    async fn run(&self, request: &ProcessRequest) -> Result<ExtractionReport, ExtractError> {
        let started = Instant::now();
        self.set_status(request.dataset_id, ProcessingStatus::Processing, None)?;

        let bytes = self
            .objects
            .download(&request.storage_path)
            .map_err(|e| ExtractError::ObjectStore(e.to_string()))?;
        let mut payload = FilePayload::new(bytes, &request.filename, &request.media_type);
        if request.declared_size > 0 {
            payload = payload.with_declared_size(request.declared_size);
        }

        let preview = self.orchestrator.preview(&payload)?;

        let builder = PromptBuilder::new(&request.dataset_name)
            .with_business_context(request.business_context.clone())
            .with_mode(request.mode);

        let prompt = builder.build_term_prompt(&preview.column_profiles, &preview.text);
        let extraction = self.client.extract_terms(&prompt).await?;

        let mut terms = dedup::dedup_terms(extraction.terms);
        for term in &mut terms {
            term.dataset_id = Some(request.dataset_id);
            term.source_file = Some(request.filename.clone());
        }

        // Rules come out of documents only; tabular data has none to state
        let mut rules = Vec::new();
        if !preview.is_tabular() && reader::is_pdf(&request.filename, &request.media_type) {
            rules = self
                .client
                .extract_rules(&builder.build_rule_prompt(&preview.text))
                .await?;
            for rule in &mut rules {
                rule.dataset_id = Some(request.dataset_id);
            }
        }

        {
            let mut catalog = self.catalog.lock().unwrap();
            catalog
                .upsert_terms(request.dataset_id, &terms)
                .map_err(|e| ExtractError::Store(e.to_string()))?;
            if !rules.is_empty() {
                catalog
                    .insert_rules(request.dataset_id, &rules)
                    .map_err(|e| ExtractError::Store(e.to_string()))?;
            }
        }
        self.set_status(request.dataset_id, ProcessingStatus::Completed, None)?;

        let metadata = ExtractionMetadata {
            dataset_id: request.dataset_id,
            model_name: self.client.config().model.clone(),
            duration_ms: started.elapsed().as_millis() as u64,
            terms_extracted: terms.len(),
            rules_extracted: rules.len(),
        };

        Ok(ExtractionReport {
            terms,
            rules,
            column_profiles: preview.column_profiles,
            warnings: preview.warnings,
            metadata,
        })
    }

    /// Record a failed run in the catalog and the log
    fn record_failure(&self, request: &ProcessRequest, e: &ExtractError) {
        error!(
            "Processing failed for dataset {} (path '{}'): {}",
            request.dataset_id, request.storage_path, e
        );
        if let Err(status_err) =
            self.set_status(request.dataset_id, ProcessingStatus::Failed, Some(&e.to_string()))
        {
            error!(
                "Failed to record failure for dataset {}: {}",
                request.dataset_id, status_err
            );
        }
    }

    fn set_status(
        &self,
        id: DatasetId,
        status: ProcessingStatus,
        message: Option<&str>,
    ) -> Result<(), ExtractError> {
        self.catalog
            .lock()
            .unwrap()
            .set_status(id, status, message)
            .map_err(|e| ExtractError::Store(e.to_string()))
    }
}
