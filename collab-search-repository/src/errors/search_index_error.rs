//! Search index error types.
//!
//! This module defines the error types that can occur while talking to the
//! search backend.

use thiserror::Error;

/// Errors that can occur during search index operations.
#[derive(Debug, Clone, Error)]
pub enum SearchIndexError {
    /// Failed to establish connection to the search engine.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The bulk request could not be sent or its response was unusable.
    #[error("Bulk operation error: {0}")]
    BulkOperationError(String),

    /// Creating, probing or deleting an index failed at the transport level.
    #[error("Index lifecycle error: {0}")]
    IndexLifecycleError(String),

    /// Reading or moving aliases failed at the transport level.
    #[error("Alias error: {0}")]
    AliasError(String),

    /// A search request could not be sent or its response was unusable.
    #[error("Search error: {0}")]
    SearchError(String),

    /// A document could not be serialized for the search engine.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Failed to parse a response from the search engine.
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl SearchIndexError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a bulk operation error.
    pub fn bulk_operation(msg: impl Into<String>) -> Self {
        Self::BulkOperationError(msg.into())
    }

    /// Create an index lifecycle error.
    pub fn index_lifecycle(msg: impl Into<String>) -> Self {
        Self::IndexLifecycleError(msg.into())
    }

    /// Create an alias error.
    pub fn alias(msg: impl Into<String>) -> Self {
        Self::AliasError(msg.into())
    }

    /// Create a search error.
    pub fn search(msg: impl Into<String>) -> Self {
        Self::SearchError(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::SerializationError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }
}
