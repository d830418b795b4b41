//! In-memory task progress sink.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::interfaces::TaskReporter;

/// Lifecycle state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    InProgress,
    Completed,
    Errored,
}

/// Progress recorded for one task.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub created: DateTime<Utc>,
    pub status: TaskStatus,
    pub end: Option<DateTime<Utc>>,
    pub results: Vec<String>,
    pub errors: Vec<String>,
}

impl Task {
    fn new(id: Uuid) -> Self {
        Self {
            id,
            created: Utc::now(),
            status: TaskStatus::InProgress,
            end: None,
            results: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn close(&mut self, status: TaskStatus) {
        self.status = status;
        self.end = Some(Utc::now());
    }
}

/// Keeps task progress in memory. Clones share the same task table.
#[derive(Debug, Clone, Default)]
pub struct TaskService {
    tasks: Arc<Mutex<HashMap<Uuid, Task>>>,
}

impl TaskService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new task and return its id.
    pub async fn create_task(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.tasks.lock().await.insert(id, Task::new(id));
        id
    }

    pub async fn get(&self, id: Uuid) -> Option<Task> {
        self.tasks.lock().await.get(&id).cloned()
    }
}

#[async_trait]
impl TaskReporter for TaskService {
    async fn update_task_results(&self, task_id: Uuid, message: &str) {
        let mut tasks = self.tasks.lock().await;
        match tasks.get_mut(&task_id) {
            Some(task) => {
                debug!(task_id = %task_id, message, "Task result recorded");
                task.results.push(message.to_string());
            }
            None => warn!(task_id = %task_id, "Result reported for unknown task"),
        }
    }

    async fn update_task_errors(&self, task_id: Uuid, message: &str) {
        let mut tasks = self.tasks.lock().await;
        match tasks.get_mut(&task_id) {
            Some(task) => {
                debug!(task_id = %task_id, message, "Task error recorded");
                task.errors.push(message.to_string());
            }
            None => warn!(task_id = %task_id, "Error reported for unknown task"),
        }
    }

    async fn complete(&self, task_id: Uuid) {
        let mut tasks = self.tasks.lock().await;
        match tasks.get_mut(&task_id) {
            Some(task) => {
                debug!(task_id = %task_id, "Task completed");
                task.close(TaskStatus::Completed);
            }
            None => warn!(task_id = %task_id, "Completion reported for unknown task"),
        }
    }

    async fn complete_with_error(&self, task_id: Uuid, error: &str) {
        let mut tasks = self.tasks.lock().await;
        match tasks.get_mut(&task_id) {
            Some(task) => {
                debug!(task_id = %task_id, error, "Task completed with error");
                task.errors.push(error.to_string());
                task.close(TaskStatus::Errored);
            }
            None => warn!(task_id = %task_id, "Completion reported for unknown task"),
        }
    }
}
