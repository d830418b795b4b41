//! # Collaboration Search Platform
//!
//! Interfaces to the platform services the search subsystem depends on: the
//! relational store, the authorization engine and the task-progress sink.
//! Ships an in-memory snapshot store, a credential-based authorization
//! evaluator and an in-memory task service.

pub mod authorization;
pub mod errors;
pub mod interfaces;
pub mod snapshot;
pub mod task;

pub use authorization::CredentialAuthorizationEvaluator;
pub use errors::StoreError;
pub use interfaces::{
    AuthorizationEvaluator, EntityLookup, IngestSource, SearchSource, TaskReporter,
};
pub use snapshot::{Snapshot, SnapshotStore};
pub use task::{Task, TaskService, TaskStatus};
