//! Task progress sink trait definition.

use async_trait::async_trait;
use uuid::Uuid;

/// Receives progress messages for a long-running task.
///
/// Reporting is best effort: implementations swallow their own failures so
/// a broken sink never interrupts the work being reported on.
#[async_trait]
pub trait TaskReporter: Send + Sync {
    /// Record a successful step of the task.
    async fn update_task_results(&self, task_id: Uuid, message: &str);

    /// Record a failed step of the task.
    async fn update_task_errors(&self, task_id: Uuid, message: &str);

    /// Close the task as successful.
    async fn complete(&self, task_id: Uuid);

    /// Close the task as failed, recording the final error.
    async fn complete_with_error(&self, task_id: Uuid, error: &str);
}
