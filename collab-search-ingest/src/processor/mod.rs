//! Processor module for the collaboration search ingest.
//!
//! Transforms store projections into search documents.

mod document_processor;
mod whiteboard;

pub use document_processor::DocumentProcessor;
pub use whiteboard::extract_whiteboard_text;
