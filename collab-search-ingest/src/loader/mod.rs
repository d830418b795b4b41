//! Loader module for the collaboration search ingest.
//!
//! Writes one page of documents into the search index with a single bulk
//! request and reports the outcome to the task sink.

use std::sync::Arc;

use tracing::{debug, error, instrument};
use uuid::Uuid;

use crate::errors::IngestError;
use collab_search_platform::TaskReporter;
use collab_search_repository::SearchIndexProvider;
use collab_search_shared::{IngestBatchResult, SearchDocument};

/// Loader that bulk-indexes pages of documents.
pub struct BulkLoader {
    provider: Arc<dyn SearchIndexProvider>,
    reporter: Arc<dyn TaskReporter>,
}

impl BulkLoader {
    /// Create a new bulk loader.
    pub fn new(provider: Arc<dyn SearchIndexProvider>, reporter: Arc<dyn TaskReporter>) -> Self {
        Self { provider, reporter }
    }

    /// Index a page of documents and describe the outcome.
    ///
    /// An empty page succeeds without contacting the backend. When the
    /// backend rejects any document the whole batch is reported as failed
    /// with a total of zero, and the rejected documents are attached.
    ///
    /// # Returns
    ///
    /// * `Ok(IngestBatchResult)` - The batch outcome, already posted to the task sink
    /// * `Err(IngestError)` - If the bulk request itself could not be completed
    #[instrument(skip(self, documents), fields(count = documents.len()))]
    pub async fn ingest_bulk(
        &self,
        documents: &[SearchDocument],
        index: &str,
        task_id: Uuid,
    ) -> Result<IngestBatchResult, IngestError> {
        if documents.is_empty() {
            return Ok(IngestBatchResult::succeeded("No data indexed", 0));
        }

        let response = self.provider.bulk_index(index, documents).await?;

        if response.errors || !response.errored.is_empty() {
            let errored = response.errored.len();
            let message = format!(
                "[{}] - {} documents errored. {} documents indexed.",
                index,
                errored,
                documents.len().saturating_sub(errored)
            );
            error!(index = %index, errored, "{}", message);
            self.reporter.update_task_errors(task_id, &message).await;

            return Ok(
                IngestBatchResult::failed(message).with_errored_documents(response.errored)
            );
        }

        let message = format!("[{}] - {} documents indexed", index, documents.len());
        debug!(index = %index, "{}", message);
        self.reporter.update_task_results(task_id, &message).await;

        Ok(IngestBatchResult::succeeded(message, documents.len()))
    }
}
