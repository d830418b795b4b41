//! Relational store error types.

use thiserror::Error;

/// Errors raised by store reads.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The requested entity does not exist.
    #[error("Entity not found: {0}")]
    NotFound(String),

    /// A required parent or owner relation is missing.
    #[error("Relationship not found: {0}")]
    RelationshipNotFound(String),

    /// The store could not serve the request.
    #[error("Store backend error: {0}")]
    Backend(String),

    /// A snapshot file could not be read or parsed.
    #[error("Snapshot error: {0}")]
    Snapshot(String),
}

impl StoreError {
    /// Create a not found error for an entity kind and id.
    pub fn not_found(kind: &str, id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("{} {}", kind, id))
    }

    /// Create a relationship not found error.
    pub fn relationship_not_found(msg: impl Into<String>) -> Self {
        Self::RelationshipNotFound(msg.into())
    }

    /// Create a backend error.
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    /// Create a snapshot error.
    pub fn snapshot(msg: impl Into<String>) -> Self {
        Self::Snapshot(msg.into())
    }
}
