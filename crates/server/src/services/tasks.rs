//! Task service.
//!
//! A thin layer over the task repository; the repository is already scoped
//! to one tenant, so cross-tenant ids surface as `NotFound` here.

use sqlx::SqlitePool;

use taskhub_core::{TaskId, TaskStatus, TenantId, UserId};

use crate::db::RepositoryError;
use crate::db::tasks::TaskRepository;
use crate::models::task::{NewTask, Task, TaskPatch, TaskWithOwner};

/// Task service scoped to one tenant.
pub struct TaskService<'a> {
    tasks: TaskRepository<'a>,
}

impl<'a> TaskService<'a> {
    /// Create a task service scoped to `tenant_id`.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool, tenant_id: TenantId) -> Self {
        Self {
            tasks: TaskRepository::new(pool, tenant_id),
        }
    }

    /// List the tenant's tasks with owner info, newest first, optionally
    /// filtered by status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` on database failure.
    pub async fn list(
        &self,
        status: Option<TaskStatus>,
    ) -> Result<Vec<TaskWithOwner>, RepositoryError> {
        self.tasks.list(status).await
    }

    /// Get one of the tenant's tasks.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` on database failure.
    pub async fn get(&self, id: TaskId) -> Result<Option<Task>, RepositoryError> {
        self.tasks.get(id).await
    }

    /// Create a task owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` on database failure.
    pub async fn create(&self, user_id: UserId, data: &NewTask) -> Result<Task, RepositoryError> {
        self.tasks.create(user_id, data).await
    }

    /// Update one of the tenant's tasks, merging only the provided fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the task doesn't exist within
    /// the tenant.
    pub async fn update(&self, id: TaskId, patch: &TaskPatch) -> Result<Task, RepositoryError> {
        self.tasks.update(id, patch).await
    }

    /// Set only the status of one of the tenant's tasks.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the task doesn't exist within
    /// the tenant.
    pub async fn update_status(
        &self,
        id: TaskId,
        status: TaskStatus,
    ) -> Result<Task, RepositoryError> {
        self.tasks.update_status(id, status).await
    }

    /// Delete one of the tenant's tasks.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the task doesn't exist within
    /// the tenant.
    pub async fn delete(&self, id: TaskId) -> Result<(), RepositoryError> {
        self.tasks.delete(id).await
    }
}
