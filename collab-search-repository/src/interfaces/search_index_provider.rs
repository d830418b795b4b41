//! Search index provider trait definition.
//!
//! This module defines the abstract interface for search index operations,
//! allowing for different backend implementations (OpenSearch, Elasticsearch, etc.).

use async_trait::async_trait;

use crate::errors::SearchIndexError;
use crate::types::{
    AliasBinding, BulkIndexResponse, IndexOperationResult, IndexSearchHit, IndexSearchRequest,
};
use collab_search_shared::SearchDocument;

/// Abstracts the underlying search index implementation (OpenSearch, Elasticsearch, etc.).
///
/// Implementations are injected into the ingestion service as
/// `Arc<dyn SearchIndexProvider>` so tests can substitute a mock backend.
///
/// Transport failures are returned as `Err`. Failures the backend reports in
/// a well-formed response are returned as `Ok` values that describe them.
#[async_trait]
pub trait SearchIndexProvider: Send + Sync {
    /// Index a page of documents with a single bulk request.
    ///
    /// Every document is written with its entity id as the document id, and
    /// the index is refreshed before the request returns.
    ///
    /// # Arguments
    ///
    /// * `index` - The target index name
    /// * `documents` - The documents to write, in request order
    ///
    /// # Returns
    ///
    /// * `Ok(BulkIndexResponse)` - Per-item acknowledgements, including rejected documents
    /// * `Err(SearchIndexError)` - If the request could not be sent or parsed
    async fn bulk_index(
        &self,
        index: &str,
        documents: &[SearchDocument],
    ) -> Result<BulkIndexResponse, SearchIndexError>;

    /// Create an index with the shared settings and mappings.
    ///
    /// # Returns
    ///
    /// * `Ok(IndexOperationResult)` - Acknowledged, or the backend's failure reason
    /// * `Err(SearchIndexError)` - If the request could not be sent
    async fn create_index(&self, index: &str) -> Result<IndexOperationResult, SearchIndexError>;

    /// Check whether an index exists.
    async fn index_exists(&self, index: &str) -> Result<bool, SearchIndexError>;

    /// Delete an index.
    ///
    /// # Returns
    ///
    /// * `Ok(IndexOperationResult)` - Acknowledged, or the backend's failure reason
    /// * `Err(SearchIndexError)` - If the request could not be sent
    async fn delete_index(&self, index: &str) -> Result<IndexOperationResult, SearchIndexError>;

    /// Resolve which indices the given aliases currently point at.
    ///
    /// Aliases that do not exist are left out of the result.
    async fn get_aliases(&self, aliases: &[String]) -> Result<Vec<AliasBinding>, SearchIndexError>;

    /// Point aliases at new indices in one atomic request.
    ///
    /// # Arguments
    ///
    /// * `bindings` - The aliases to add, each with its target index
    /// * `detach_existing` - Remove each alias from every index it points at first
    ///
    /// # Returns
    ///
    /// * `Ok(IndexOperationResult)` - Acknowledged, or the backend's failure reason
    /// * `Err(SearchIndexError)` - If the request could not be sent
    async fn update_aliases(
        &self,
        bindings: &[AliasBinding],
        detach_existing: bool,
    ) -> Result<IndexOperationResult, SearchIndexError>;

    /// Run a full-text query against several indices in one multi-search.
    ///
    /// A target whose search fails is logged and contributes no hits.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<IndexSearchHit>)` - Hits of every target, in target order
    /// * `Err(SearchIndexError)` - If the request could not be sent or parsed
    async fn search(
        &self,
        request: &IndexSearchRequest,
    ) -> Result<Vec<IndexSearchHit>, SearchIndexError>;

    /// Check if the search engine is healthy and reachable.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If the cluster status is green or yellow
    /// * `Ok(false)` - If the cluster is reachable but unhealthy
    /// * `Err(SearchIndexError)` - If the health check fails to execute
    async fn health_check(&self) -> Result<bool, SearchIndexError>;
}
