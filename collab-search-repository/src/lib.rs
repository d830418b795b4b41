//! # Collaboration Search Repository
//!
//! This crate provides the interface to the search backend and its
//! OpenSearch implementation, together with index naming and the response
//! types of bulk writes and index lifecycle operations.

pub mod config;
pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod types;

pub use config::{IndexPattern, SearchIndex, DEFAULT_INDEX_PATTERN};
pub use errors::SearchIndexError;
pub use interfaces::SearchIndexProvider;
pub use opensearch::OpenSearchClient;
pub use types::{
    AliasBinding, BulkIndexResponse, IndexOperationResult, IndexSearchHit, IndexSearchRequest,
    SearchTarget,
};
