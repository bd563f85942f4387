//! Task domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use taskhub_core::{TaskId, TaskPriority, TaskStatus, TenantId, UserId};

/// A task belonging to exactly one tenant and one owning user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub tenant_id: TenantId,
    pub user_id: UserId,
    /// 1-100 characters.
    pub title: String,
    /// Up to 500 characters.
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    /// Ordered free-text tags.
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for creating a task. Optional fields fall back to the
/// documented defaults (status PENDING, priority MEDIUM, no tags).
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub tags: Option<Vec<String>>,
}

/// Validated partial update for a task. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub tags: Option<Vec<String>>,
}

/// The owner fields a task is annotated with in listings.
#[derive(Debug, Clone, Serialize)]
pub struct TaskOwner {
    pub name: String,
    pub email: String,
}

/// A task annotated with its owning user's name and email.
#[derive(Debug, Clone, Serialize)]
pub struct TaskWithOwner {
    #[serde(flatten)]
    pub task: Task,
    pub user: TaskOwner,
}
