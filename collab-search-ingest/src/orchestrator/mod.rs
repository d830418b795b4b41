//! Orchestrator module for the collaboration search ingest.
//!
//! Manages the index lifecycle and drives every configured source through
//! the fetch, transform and bulk-load steps, either into the live indices or
//! into fresh indices that replace them behind aliases.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::errors::IngestError;
use crate::fetcher::{default_sources, IngestSourceConfig};
use crate::loader::BulkLoader;
use crate::processor::DocumentProcessor;
use collab_search_platform::{IngestSource, TaskReporter};
use collab_search_repository::{
    AliasBinding, IndexOperationResult, IndexPattern, SearchIndex, SearchIndexProvider,
};
use collab_search_shared::{IngestBatchResult, IngestReport, Page};

/// Message returned by every operation while no backend client is available.
pub const BACKEND_UNAVAILABLE: &str = "search backend client not initialized";

/// Configuration for the ingest service.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Pause between two consecutive bulk requests of one source.
    pub batch_delay: Duration,
    /// Sources in the order they are ingested.
    pub sources: Vec<IngestSourceConfig>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            batch_delay: Duration::from_secs(1),
            sources: default_sources(),
        }
    }
}

/// Service that owns the search indices and fills them from the store.
///
/// The service:
/// - Creates and removes the indices named by the index pattern
/// - Pages through every source sequentially
/// - Records one batch result per page in the ingest report
/// - Rebuilds every index from scratch and swaps it in behind its alias
///
/// Without a backend provider the service runs degraded: lifecycle calls
/// return an unacknowledged result and `ingest` returns a failure report.
pub struct SearchIngestService {
    store: Arc<dyn IngestSource>,
    provider: Option<Arc<dyn SearchIndexProvider>>,
    reporter: Arc<dyn TaskReporter>,
    index_pattern: IndexPattern,
    processor: DocumentProcessor,
    config: IngestConfig,
}

impl SearchIngestService {
    /// Create a new ingest service with the default sources and delay.
    pub fn new(
        store: Arc<dyn IngestSource>,
        provider: Option<Arc<dyn SearchIndexProvider>>,
        reporter: Arc<dyn TaskReporter>,
        index_pattern: IndexPattern,
    ) -> Self {
        Self::with_config(
            store,
            provider,
            reporter,
            index_pattern,
            IngestConfig::default(),
        )
    }

    /// Create a new ingest service with custom configuration.
    pub fn with_config(
        store: Arc<dyn IngestSource>,
        provider: Option<Arc<dyn SearchIndexProvider>>,
        reporter: Arc<dyn TaskReporter>,
        index_pattern: IndexPattern,
        config: IngestConfig,
    ) -> Self {
        Self {
            store,
            provider,
            reporter,
            index_pattern,
            processor: DocumentProcessor::new(),
            config,
        }
    }

    /// Create every index that does not exist yet.
    ///
    /// Indices are handled one at a time and a failure does not stop the
    /// remaining ones. The aggregate is acknowledged only when every index
    /// exists afterwards.
    #[instrument(skip(self))]
    pub async fn ensure_indices_exist(&self) -> IndexOperationResult {
        let Some(provider) = &self.provider else {
            warn!("Cannot create indices: {}", BACKEND_UNAVAILABLE);
            return IndexOperationResult::failed(BACKEND_UNAVAILABLE);
        };

        Self::create_missing(provider.as_ref(), &self.index_pattern.all()).await
    }

    /// Delete every index that exists. Absent indices count as removed.
    #[instrument(skip(self))]
    pub async fn remove_indices(&self) -> IndexOperationResult {
        let Some(provider) = &self.provider else {
            warn!("Cannot remove indices: {}", BACKEND_UNAVAILABLE);
            return IndexOperationResult::failed(BACKEND_UNAVAILABLE);
        };

        Self::remove_existing(provider.as_ref(), &self.index_pattern.all()).await
    }

    /// Ingest every source into its index and report the outcome per index.
    ///
    /// Sources run strictly one after another. An error while reading or
    /// writing a page ends that source only; it is recorded as a failed
    /// batch and posted to the task error sink.
    #[instrument(skip(self), fields(task_id = %task_id))]
    pub async fn ingest(&self, task_id: Uuid) -> IngestReport {
        let Some(provider) = &self.provider else {
            warn!("Cannot ingest: {}", BACKEND_UNAVAILABLE);
            return IngestReport::degraded(BACKEND_UNAVAILABLE);
        };

        self.ingest_into(provider, task_id, None).await
    }

    /// Rebuild every index from scratch without serving partial data.
    ///
    /// Fresh indices named with a timestamp suffix are created and filled,
    /// then every alias is moved onto them in one atomic request and the
    /// indices the aliases pointed at before are deleted. The task is closed
    /// as completed, or with the error of the first step that failed.
    ///
    /// # Returns
    ///
    /// The ingest report of the fresh indices; empty when the run failed
    /// before ingesting.
    #[instrument(skip(self), fields(task_id = %task_id))]
    pub async fn ingest_from_scratch(&self, task_id: Uuid) -> IngestReport {
        let suffix = Utc::now().format("%Y%m%d%H%M%S").to_string();
        self.ingest_from_scratch_with_suffix(task_id, &suffix).await
    }

    async fn ingest_from_scratch_with_suffix(&self, task_id: Uuid, suffix: &str) -> IngestReport {
        let Some(provider) = &self.provider else {
            warn!("Cannot ingest from scratch: {}", BACKEND_UNAVAILABLE);
            let message = format!("Ingest from scratch failed: {}", BACKEND_UNAVAILABLE);
            self.reporter.complete_with_error(task_id, &message).await;
            return IngestReport::degraded(BACKEND_UNAVAILABLE);
        };

        info!(suffix = %suffix, "Starting ingest from scratch");
        let mut report = IngestReport::new();
        match self.rebuild(provider, task_id, suffix, &mut report).await {
            Ok(()) => {
                info!("Ingest from scratch completed");
                self.reporter.complete(task_id).await;
            }
            Err(e) => {
                error!(error = %e, "Ingest from scratch failed");
                let message = format!("Ingest from scratch failed: {}", e);
                self.reporter.complete_with_error(task_id, &message).await;
            }
        }

        report
    }

    async fn rebuild(
        &self,
        provider: &Arc<dyn SearchIndexProvider>,
        task_id: Uuid,
        suffix: &str,
        report: &mut IngestReport,
    ) -> Result<(), IngestError> {
        self.reporter
            .update_task_results(task_id, "Creating indices")
            .await;
        let fresh: Vec<String> = SearchIndex::ALL
            .iter()
            .map(|index| self.index_pattern.suffixed_index_name(*index, suffix))
            .collect();
        let created = Self::create_missing(provider.as_ref(), &fresh).await;
        if !created.acknowledged {
            let message = format!(
                "Failed to create indices: {}",
                created.message.unwrap_or_default()
            );
            self.reporter.update_task_errors(task_id, &message).await;
            return Err(IngestError::step(message));
        }
        self.reporter
            .update_task_results(task_id, "Indices created")
            .await;

        *report = self.ingest_into(provider, task_id, Some(suffix)).await;

        let previous = provider.get_aliases(&self.index_pattern.all()).await?;
        let status = if previous.is_empty() {
            "No active aliases found"
        } else {
            "Active aliases found"
        };
        self.reporter.update_task_results(task_id, status).await;
        self.reporter
            .update_task_results(task_id, "Assigning aliases to new indices")
            .await;

        let bindings: Vec<AliasBinding> = SearchIndex::ALL
            .iter()
            .map(|index| {
                AliasBinding::new(
                    self.index_pattern.index_name(*index),
                    self.index_pattern.suffixed_index_name(*index, suffix),
                )
            })
            .collect();
        let assigned = provider
            .update_aliases(&bindings, !previous.is_empty())
            .await?;
        if !assigned.acknowledged {
            return Err(IngestError::step(format!(
                "Failed to assign aliases: {}",
                assigned.message.unwrap_or_default()
            )));
        }

        // A run that reuses its own suffix must not drop what it just built.
        let mut stale: Vec<String> = previous
            .into_iter()
            .map(|binding| binding.index)
            .filter(|index| !fresh.contains(index))
            .collect();
        stale.sort();
        stale.dedup();
        if stale.is_empty() {
            return Ok(());
        }

        let message = format!("Removing the old indices: {}", stale.join(","));
        info!("{}", message);
        self.reporter.update_task_results(task_id, &message).await;
        let removed = Self::remove_existing(provider.as_ref(), &stale).await;
        if !removed.acknowledged {
            return Err(IngestError::step(format!(
                "Failed to delete old indices: {}",
                removed.message.unwrap_or_default()
            )));
        }

        Ok(())
    }

    async fn create_missing(
        provider: &dyn SearchIndexProvider,
        indices: &[String],
    ) -> IndexOperationResult {
        let mut aggregate = IndexOperationResult::acknowledged();
        for index in indices {
            let outcome = match provider.index_exists(index).await {
                Ok(true) => {
                    debug!(index = %index, "Index already exists");
                    IndexOperationResult::acknowledged()
                }
                Ok(false) => match provider.create_index(index).await {
                    Ok(result) => result,
                    Err(e) => IndexOperationResult::failed(e.to_string()),
                },
                Err(e) => IndexOperationResult::failed(e.to_string()),
            };

            if outcome.acknowledged {
                info!(index = %index, "Index ready");
            } else {
                error!(index = %index, reason = ?outcome.message, "Failed to create index");
            }
            aggregate.merge(outcome);
        }

        aggregate
    }

    async fn remove_existing(
        provider: &dyn SearchIndexProvider,
        indices: &[String],
    ) -> IndexOperationResult {
        let mut aggregate = IndexOperationResult::acknowledged();
        for index in indices {
            let outcome = match provider.index_exists(index).await {
                Ok(false) => continue,
                Ok(true) => match provider.delete_index(index).await {
                    Ok(result) => result,
                    Err(e) => IndexOperationResult::failed(e.to_string()),
                },
                Err(e) => IndexOperationResult::failed(e.to_string()),
            };

            if outcome.acknowledged {
                info!(index = %index, "Index removed");
            } else {
                error!(index = %index, reason = ?outcome.message, "Failed to remove index");
            }
            aggregate.merge(outcome);
        }

        aggregate
    }

    /// Run every source into the live indices, or into the suffixed ones of
    /// a re-index.
    async fn ingest_into(
        &self,
        provider: &Arc<dyn SearchIndexProvider>,
        task_id: Uuid,
        suffix: Option<&str>,
    ) -> IngestReport {
        info!(sources = self.config.sources.len(), "Starting ingest");
        let loader = BulkLoader::new(provider.clone(), self.reporter.clone());
        let mut report = IngestReport::new();

        for source in &self.config.sources {
            let index = match suffix {
                Some(suffix) => self.index_pattern.suffixed_index_name(source.index, suffix),
                None => self.index_pattern.index_name(source.index),
            };
            if let Err(e) = self
                .ingest_source(&loader, source, &index, task_id, &mut report)
                .await
            {
                let name = source.fetcher.name();
                let message = format!("[{}] - {} ingestion failed: {}", index, name, e);
                error!(index = %index, source = name, error = %e, "Source ingestion failed");
                self.reporter.update_task_errors(task_id, &message).await;
                report.record(&index, IngestBatchResult::failed(message));
            }
        }

        info!(total = report.total(), "Ingest finished");
        report
    }

    async fn ingest_source(
        &self,
        loader: &BulkLoader,
        source: &IngestSourceConfig,
        index: &str,
        task_id: Uuid,
        report: &mut IngestReport,
    ) -> Result<(), IngestError> {
        let mut offset = 0;

        loop {
            let page = Page::new(offset, source.batch_size);
            let documents = source
                .fetcher
                .fetch(self.store.as_ref(), &self.processor, page)
                .await?;

            if documents.is_empty() {
                debug!(
                    index = %index,
                    source = source.fetcher.name(),
                    offset,
                    "Source exhausted"
                );
                return Ok(());
            }

            let batch = loader.ingest_bulk(&documents, index, task_id).await?;
            report.record(index, batch);

            offset += source.batch_size;
            tokio::time::sleep(self.config.batch_delay).await;
        }
    }
}
