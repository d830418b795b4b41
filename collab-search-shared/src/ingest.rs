//! Results reported by the bulk ingestion engine.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::EMPTY_VALUE;

/// A document the backend refused, with the attempted operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErroredDocument {
    pub status: Option<u16>,
    pub error: Option<Value>,
    pub operation: Value,
    pub document: Value,
}

/// Outcome of a single bulk request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestBatchResult {
    pub success: bool,
    pub message: String,
    pub total: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errored_documents: Vec<ErroredDocument>,
}

impl IngestBatchResult {
    pub fn succeeded(message: impl Into<String>, total: usize) -> Self {
        Self {
            success: true,
            message: message.into(),
            total,
            errored_documents: Vec::new(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            total: 0,
            errored_documents: Vec::new(),
        }
    }

    pub fn with_errored_documents(mut self, documents: Vec<ErroredDocument>) -> Self {
        self.errored_documents = documents;
        self
    }
}

/// All batches written to one index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngestBulkResult {
    pub total: usize,
    pub batches: Vec<IngestBatchResult>,
}

impl IngestBulkResult {
    pub fn record(&mut self, batch: IngestBatchResult) {
        self.total += batch.total;
        self.batches.push(batch);
    }
}

/// Index name to the batches written into it during one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IngestReport(BTreeMap<String, IngestBulkResult>);

impl IngestReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report returned when no search backend is available.
    pub fn degraded(message: impl Into<String>) -> Self {
        let mut report = Self::new();
        report.record(EMPTY_VALUE, IngestBatchResult::failed(message));
        report
    }

    /// Append a batch to the index entry. Totals of repeated sources sum.
    pub fn record(&mut self, index: &str, batch: IngestBatchResult) {
        self.0.entry(index.to_string()).or_default().record(batch);
    }

    pub fn get(&self, index: &str) -> Option<&IngestBulkResult> {
        self.0.get(index)
    }

    pub fn indices(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn total(&self) -> usize {
        self.0.values().map(|result| result.total).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
