//! Response types for search index operations.

use serde::Serialize;
use uuid::Uuid;

use collab_search_shared::{ErroredDocument, SpaceLevel};

/// Outcome of one bulk request as reported by the backend.
///
/// A bulk request can be accepted as a whole while individual documents are
/// rejected; `errored` lists those documents together with the operation
/// that was attempted for each.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkIndexResponse {
    /// Whether the backend flagged any item as failed.
    pub errors: bool,
    /// Number of items the backend acknowledged, failed or not.
    pub items: usize,
    /// Items that carried an error.
    pub errored: Vec<ErroredDocument>,
}

impl BulkIndexResponse {
    /// Number of items written without error.
    pub fn indexed(&self) -> usize {
        self.items.saturating_sub(self.errored.len())
    }
}

/// Outcome of an index lifecycle operation.
///
/// `message` carries the backend's failure reason when `acknowledged` is
/// false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexOperationResult {
    pub acknowledged: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl IndexOperationResult {
    pub fn acknowledged() -> Self {
        Self {
            acknowledged: true,
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            acknowledged: false,
            message: Some(message.into()),
        }
    }

    /// Fold another result into this aggregate. Keeps the last failure reason.
    pub fn merge(&mut self, other: IndexOperationResult) {
        if !other.acknowledged {
            self.acknowledged = false;
            self.message = other.message;
        }
    }
}

/// An alias and the concrete index it resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AliasBinding {
    pub alias: String,
    pub index: String,
}

impl AliasBinding {
    pub fn new(alias: impl Into<String>, index: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            index: index.into(),
        }
    }
}

/// One index to query and the number of hits to take from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTarget {
    pub index: String,
    pub size: usize,
}

/// Full-text query run against several indices at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSearchRequest {
    /// Query text; every term joined with spaces.
    pub text: String,
    /// Restrict hits to documents of this root space.
    pub space_id: Option<Uuid>,
    pub targets: Vec<SearchTarget>,
}

/// A document returned by an index search.
///
/// Only the identifying fields are read back; the entity itself is
/// re-fetched from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexSearchHit {
    pub index: String,
    pub entity_id: Uuid,
    /// The document `type` tag, e.g. `subspace`.
    pub document_type: String,
    /// Set for space documents only.
    pub level: Option<SpaceLevel>,
    pub score: f64,
}
