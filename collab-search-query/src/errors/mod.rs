//! Error types for the collaboration search query engine.

use collab_search_platform::StoreError;
use collab_search_repository::SearchIndexError;
use thiserror::Error;
use uuid::Uuid;

/// Errors that reject a search before or during matching.
///
/// Hydration failures never surface here; the assembler logs them and drops
/// the affected match.
#[derive(Error, Debug)]
pub enum QueryError {
    /// The search input is malformed.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The space named by the scope filter does not exist.
    #[error("Space not found: {0}")]
    SpaceNotFound(Uuid),

    /// A store read failed while matching.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// No search backend is configured.
    #[error("Search backend unavailable")]
    BackendUnavailable,

    /// The search backend request failed.
    #[error("Search index error: {0}")]
    SearchIndex(#[from] SearchIndexError),
}

impl QueryError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
