//! # Collaboration Search
//!
//! Configuration and wiring for the collaboration search subsystem: index
//! lifecycle, batch ingestion and term search behind one set of
//! dependencies.

pub mod config;

pub use config::{Dependencies, LogFormat, Settings};

use thiserror::Error;

/// Errors that can occur during initialization or a command run.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Store error.
    #[error("Store error: {0}")]
    StoreError(#[from] collab_search_platform::StoreError),

    /// Query error.
    #[error("Query error: {0}")]
    QueryError(#[from] collab_search_query::QueryError),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
