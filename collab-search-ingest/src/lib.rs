//! # Collaboration Search Ingest
//!
//! Batch ingestion of platform entities into the search indices.
//!
//! ## Architecture
//!
//! The ingest follows the Fetcher-Processor-Loader pattern:
//!
//! 1. **Fetcher**: Reads one page of projections from the store
//! 2. **Processor**: Transforms projections into search documents
//! 3. **Loader**: Bulk-indexes a page of documents into the search backend
//! 4. **Orchestrator**: Owns the index lifecycle and runs every source in order

pub mod errors;
pub mod fetcher;
pub mod loader;
pub mod orchestrator;
pub mod processor;

pub use errors::IngestError;
pub use fetcher::{default_sources, EntityFetcher, IngestSourceConfig};
pub use loader::BulkLoader;
pub use orchestrator::{IngestConfig, SearchIngestService, BACKEND_UNAVAILABLE};
pub use processor::DocumentProcessor;
