//! Error types for the collaboration search ingest.

use collab_search_platform::StoreError;
use collab_search_repository::SearchIndexError;
use thiserror::Error;

/// Errors that can occur while ingesting one source or running one step of
/// a re-index.
///
/// None of these escape [`crate::SearchIngestService`]: during an ingest
/// they end the current source and are recorded as a failed batch, during a
/// re-index they close the task with an error.
#[derive(Error, Debug)]
pub enum IngestError {
    /// A page could not be read from the store.
    #[error("Fetch error: {0}")]
    FetchError(#[from] StoreError),

    /// The bulk request could not be completed.
    #[error("Search index error: {0}")]
    SearchIndexError(#[from] SearchIndexError),

    /// The backend refused a re-index step.
    #[error("{0}")]
    StepError(String),
}

impl IngestError {
    /// Create a step error.
    pub fn step(msg: impl Into<String>) -> Self {
        Self::StepError(msg.into())
    }
}
