//! Interface definitions for the collaborators of the search subsystem.
//!
//! Each trait is injected as `Arc<dyn Trait>` so the ingestion pipeline and
//! the query engine can run against the in-memory snapshot store in tests
//! and against a real platform deployment in production.

mod authorization_evaluator;
mod entity_lookup;
mod ingest_source;
mod search_source;
mod task_reporter;

pub use authorization_evaluator::AuthorizationEvaluator;
pub use entity_lookup::EntityLookup;
pub use ingest_source::IngestSource;
pub use search_source::SearchSource;
pub use task_reporter::TaskReporter;
