//! OpenSearch client implementation.
//!
//! This module provides the concrete implementation of `SearchIndexProvider`
//! using the OpenSearch Rust client.

use async_trait::async_trait;
use opensearch::{
    cluster::ClusterHealthParts,
    http::request::JsonBody,
    http::response::Response,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::{IndicesCreateParts, IndicesDeleteParts, IndicesExistsParts, IndicesGetAliasParts},
    params::Refresh,
    BulkParts, MsearchParts, OpenSearch,
};
use serde_json::{json, Value};
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::opensearch::index_config::get_index_settings;
use crate::opensearch::queries::build_multi_search_body;
use crate::types::{
    AliasBinding, BulkIndexResponse, IndexOperationResult, IndexSearchHit, IndexSearchRequest,
    SearchTarget,
};
use collab_search_shared::{ErroredDocument, SearchDocument, SpaceLevel};
use uuid::Uuid;

/// OpenSearch client implementation.
///
/// # Example
///
/// ```ignore
/// let client = OpenSearchClient::new("http://localhost:9200").await?;
/// let response = client.bulk_index("collab-data-users", &documents).await?;
/// println!("{} documents indexed", response.indexed());
/// ```
pub struct OpenSearchClient {
    client: OpenSearch,
}

impl OpenSearchClient {
    /// Create a new OpenSearch client connected to the specified URL.
    ///
    /// # Arguments
    ///
    /// * `url` - The OpenSearch server URL (e.g., "http://localhost:9200")
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchClient)` - A new client instance
    /// * `Err(SearchIndexError)` - If connection setup fails
    pub async fn new(url: &str) -> Result<Self, SearchIndexError> {
        let parsed_url =
            Url::parse(url).map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(url = %url, "Created OpenSearch client");

        Ok(Self { client })
    }

    /// Build the bulk body: one `index` action line followed by its document.
    fn bulk_body(
        index: &str,
        documents: &[SearchDocument],
    ) -> Result<(Vec<Value>, Vec<Value>), SearchIndexError> {
        let mut operations = Vec::with_capacity(documents.len());
        let mut sources = Vec::with_capacity(documents.len());

        for document in documents {
            operations.push(json!({ "index": { "_index": index, "_id": document.id() } }));
            sources.push(
                serde_json::to_value(document)
                    .map_err(|e| SearchIndexError::serialization(e.to_string()))?,
            );
        }

        Ok((operations, sources))
    }

    /// Interpret a bulk response body against the operations that produced it.
    ///
    /// Items come back in request order, so the item at position `i` belongs
    /// to `operations[i]` and `sources[i]`.
    fn parse_bulk_response(
        body: &Value,
        operations: &[Value],
        sources: &[Value],
    ) -> BulkIndexResponse {
        let errors = body.get("errors").and_then(Value::as_bool).unwrap_or(false);
        let items = body
            .get("items")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let errored = items
            .iter()
            .enumerate()
            .filter_map(|(position, item)| {
                let action = item.as_object()?.values().next()?;
                let error = action.get("error")?;
                Some(ErroredDocument {
                    status: action
                        .get("status")
                        .and_then(Value::as_u64)
                        .and_then(|status| u16::try_from(status).ok()),
                    error: Some(error.clone()),
                    operation: operations.get(position).cloned().unwrap_or(Value::Null),
                    document: sources.get(position).cloned().unwrap_or(Value::Null),
                })
            })
            .collect();

        BulkIndexResponse {
            errors,
            items: items.len(),
            errored,
        }
    }

    /// Read alias bindings out of a get-alias body shaped as
    /// `{ index: { "aliases": { alias: {} } } }`.
    fn parse_alias_response(body: &Value) -> Vec<AliasBinding> {
        let Some(indices) = body.as_object() else {
            return Vec::new();
        };

        indices
            .iter()
            .flat_map(|(index, entry)| {
                entry
                    .get("aliases")
                    .and_then(Value::as_object)
                    .into_iter()
                    .flat_map(|aliases| aliases.keys())
                    .map(move |alias| AliasBinding::new(alias.as_str(), index.as_str()))
            })
            .collect()
    }

    /// Build the atomic alias update actions.
    fn alias_actions(bindings: &[AliasBinding], detach_existing: bool) -> Vec<Value> {
        let mut actions = Vec::with_capacity(bindings.len() * 2);
        for binding in bindings {
            if detach_existing {
                actions.push(json!({ "remove": { "index": "*", "alias": binding.alias } }));
            }
            actions.push(json!({ "add": { "index": binding.index, "alias": binding.alias } }));
        }
        actions
    }

    /// Interpret a multi-search body. Responses come back in target order.
    ///
    /// Failed responses and hits without a usable entity id are logged and
    /// skipped.
    fn parse_multi_search_response(body: &Value, targets: &[SearchTarget]) -> Vec<IndexSearchHit> {
        let responses = body
            .get("responses")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let mut hits = Vec::new();
        for (target, response) in targets.iter().zip(responses) {
            if let Some(error) = response.get("error") {
                error!(
                    index = %target.index,
                    error = %error,
                    "Error response for multi search request"
                );
                continue;
            }

            let found = response
                .get("hits")
                .and_then(|hits| hits.get("hits"))
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or_default();

            for hit in found {
                let source = hit.get("_source").unwrap_or(&Value::Null);
                let entity_id = source
                    .get("id")
                    .and_then(Value::as_str)
                    .and_then(|id| Uuid::parse_str(id).ok());
                let Some(entity_id) = entity_id else {
                    error!(index = %target.index, hit = %hit, "Search result with no entity id");
                    continue;
                };

                hits.push(IndexSearchHit {
                    index: target.index.clone(),
                    entity_id,
                    document_type: source
                        .get("type")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                    level: source
                        .get("level")
                        .and_then(|level| serde_json::from_value::<SpaceLevel>(level.clone()).ok()),
                    score: hit.get("_score").and_then(Value::as_f64).unwrap_or_default(),
                });
            }
        }

        hits
    }

    /// Turn an index lifecycle response into an operation result.
    ///
    /// Successful responses report the backend's `acknowledged` flag; failed
    /// ones carry `error.reason` as the message.
    async fn lifecycle_result(
        response: Response,
    ) -> Result<IndexOperationResult, SearchIndexError> {
        let status = response.status_code();
        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))?;

        if status.is_success() {
            let acknowledged = body
                .get("acknowledged")
                .and_then(Value::as_bool)
                .unwrap_or(false);
            return Ok(IndexOperationResult {
                acknowledged,
                message: None,
            });
        }

        let reason = body
            .get("error")
            .and_then(|error| error.get("reason"))
            .and_then(Value::as_str)
            .map(String::from)
            .unwrap_or_else(|| format!("request failed with status {}", status));

        Ok(IndexOperationResult::failed(reason))
    }
}

#[async_trait]
impl SearchIndexProvider for OpenSearchClient {
    #[instrument(skip(self, documents), fields(count = documents.len()))]
    async fn bulk_index(
        &self,
        index: &str,
        documents: &[SearchDocument],
    ) -> Result<BulkIndexResponse, SearchIndexError> {
        let (operations, sources) = Self::bulk_body(index, documents)?;

        let body: Vec<JsonBody<Value>> = operations
            .iter()
            .zip(sources.iter())
            .flat_map(|(operation, source)| {
                [
                    JsonBody::from(operation.clone()),
                    JsonBody::from(source.clone()),
                ]
            })
            .collect();

        let response = self
            .client
            .bulk(BulkParts::Index(index))
            .refresh(Refresh::True)
            .body(body)
            .send()
            .await
            .map_err(|e| SearchIndexError::bulk_operation(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Bulk request failed");
            return Err(SearchIndexError::bulk_operation(format!(
                "Bulk request failed with status {}: {}",
                status, error_body
            )));
        }

        let response_body: Value = response
            .json()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))?;

        let parsed = Self::parse_bulk_response(&response_body, &operations, &sources);
        debug!(
            items = parsed.items,
            errored = parsed.errored.len(),
            "Bulk request completed"
        );
        Ok(parsed)
    }

    #[instrument(skip(self))]
    async fn create_index(&self, index: &str) -> Result<IndexOperationResult, SearchIndexError> {
        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(index))
            .body(get_index_settings())
            .send()
            .await
            .map_err(|e| SearchIndexError::index_lifecycle(e.to_string()))?;

        let result = Self::lifecycle_result(response).await?;
        if result.acknowledged {
            info!(index = %index, "Created index");
        } else {
            warn!(index = %index, reason = ?result.message, "Index creation not acknowledged");
        }
        Ok(result)
    }

    async fn index_exists(&self, index: &str) -> Result<bool, SearchIndexError> {
        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchIndexError::index_lifecycle(e.to_string()))?;

        match response.status_code().as_u16() {
            200 => Ok(true),
            404 => Ok(false),
            status => Err(SearchIndexError::index_lifecycle(format!(
                "Unexpected status {} checking index {}",
                status, index
            ))),
        }
    }

    #[instrument(skip(self))]
    async fn delete_index(&self, index: &str) -> Result<IndexOperationResult, SearchIndexError> {
        let response = self
            .client
            .indices()
            .delete(IndicesDeleteParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchIndexError::index_lifecycle(e.to_string()))?;

        let result = Self::lifecycle_result(response).await?;
        if result.acknowledged {
            info!(index = %index, "Deleted index");
        } else {
            warn!(index = %index, reason = ?result.message, "Index deletion not acknowledged");
        }
        Ok(result)
    }

    #[instrument(skip(self))]
    async fn get_aliases(&self, aliases: &[String]) -> Result<Vec<AliasBinding>, SearchIndexError> {
        let names: Vec<&str> = aliases.iter().map(String::as_str).collect();
        let response = self
            .client
            .indices()
            .get_alias(IndicesGetAliasParts::Name(&names))
            .send()
            .await
            .map_err(|e| SearchIndexError::alias(e.to_string()))?;

        let status = response.status_code();
        if status.as_u16() == 404 {
            debug!("No active aliases");
            return Ok(Vec::new());
        }
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(SearchIndexError::alias(format!(
                "Get alias failed with status {}: {}",
                status, error_body
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))?;
        Ok(Self::parse_alias_response(&body))
    }

    #[instrument(skip(self, bindings), fields(count = bindings.len()))]
    async fn update_aliases(
        &self,
        bindings: &[AliasBinding],
        detach_existing: bool,
    ) -> Result<IndexOperationResult, SearchIndexError> {
        for binding in bindings {
            info!(alias = %binding.alias, index = %binding.index, "Assigning alias");
        }

        let response = self
            .client
            .indices()
            .update_aliases()
            .body(json!({ "actions": Self::alias_actions(bindings, detach_existing) }))
            .send()
            .await
            .map_err(|e| SearchIndexError::alias(e.to_string()))?;

        Self::lifecycle_result(response).await
    }

    #[instrument(skip(self, request), fields(targets = request.targets.len()))]
    async fn search(
        &self,
        request: &IndexSearchRequest,
    ) -> Result<Vec<IndexSearchHit>, SearchIndexError> {
        if request.targets.is_empty() {
            return Ok(Vec::new());
        }

        let body: Vec<JsonBody<Value>> = build_multi_search_body(request)
            .into_iter()
            .map(JsonBody::from)
            .collect();

        let response = self
            .client
            .msearch(MsearchParts::None)
            .body(body)
            .send()
            .await
            .map_err(|e| SearchIndexError::search(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Multi search request failed");
            return Err(SearchIndexError::search(format!(
                "Multi search failed with status {}: {}",
                status, error_body
            )));
        }

        let response_body: Value = response
            .json()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))?;

        let hits = Self::parse_multi_search_response(&response_body, &request.targets);
        debug!(hits = hits.len(), "Multi search completed");
        Ok(hits)
    }

    async fn health_check(&self) -> Result<bool, SearchIndexError> {
        let response = self
            .client
            .cluster()
            .health(ClusterHealthParts::None)
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let health: Value = response
            .json()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))?;
        let status = health
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or("unknown");

        debug!(status = %status, "OpenSearch cluster status");
        Ok(status == "green" || status == "yellow")
    }
}
