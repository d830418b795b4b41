//! Error types for the platform interfaces.

mod store_error;

pub use store_error::StoreError;
