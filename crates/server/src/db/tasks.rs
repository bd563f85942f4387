//! Task repository.
//!
//! Every query here is scoped by `tenant_id`; a task id from another tenant
//! behaves exactly like a missing task.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use taskhub_core::{TaskId, TaskPriority, TaskStatus, TenantId, UserId};

use super::RepositoryError;
use crate::models::task::{NewTask, Task, TaskOwner, TaskPatch, TaskWithOwner};

const TASK_COLUMNS: &str = "k.id, k.tenant_id, k.user_id, k.title, k.description, \
     k.due_date, k.status, k.priority, k.tags, k.created_at, k.updated_at";

#[derive(sqlx::FromRow)]
struct TaskRow {
    id: i64,
    tenant_id: i64,
    user_id: i64,
    title: String,
    description: Option<String>,
    due_date: Option<DateTime<Utc>>,
    status: String,
    priority: String,
    tags: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TaskRow {
    fn into_task(self) -> Result<Task, RepositoryError> {
        let status = self.status.parse::<TaskStatus>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid task status in database: {e}"))
        })?;
        let priority = self.priority.parse::<TaskPriority>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid task priority in database: {e}"))
        })?;
        let tags: Vec<String> = serde_json::from_str(&self.tags).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid task tags in database: {e}"))
        })?;

        Ok(Task {
            id: TaskId::new(self.id),
            tenant_id: TenantId::new(self.tenant_id),
            user_id: UserId::new(self.user_id),
            title: self.title,
            description: self.description,
            due_date: self.due_date,
            status,
            priority,
            tags,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct TaskWithOwnerRow {
    #[sqlx(flatten)]
    task: TaskRow,
    owner_name: String,
    owner_email: String,
}

impl TaskWithOwnerRow {
    fn into_task_with_owner(self) -> Result<TaskWithOwner, RepositoryError> {
        Ok(TaskWithOwner {
            task: self.task.into_task()?,
            user: TaskOwner {
                name: self.owner_name,
                email: self.owner_email,
            },
        })
    }
}

fn tags_json(tags: Option<&Vec<String>>) -> Result<String, RepositoryError> {
    let tags = tags.map_or(&[] as &[String], Vec::as_slice);
    serde_json::to_string(tags)
        .map_err(|e| RepositoryError::DataCorruption(format!("unencodable task tags: {e}")))
}

/// Repository for task database operations, always scoped to one tenant.
pub struct TaskRepository<'a> {
    pool: &'a SqlitePool,
    tenant_id: TenantId,
}

impl<'a> TaskRepository<'a> {
    /// Create a task repository scoped to `tenant_id`.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool, tenant_id: TenantId) -> Self {
        Self { pool, tenant_id }
    }

    /// List the tenant's tasks with owner info, newest first, optionally
    /// filtered by status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails or a row is invalid.
    pub async fn list(
        &self,
        status: Option<TaskStatus>,
    ) -> Result<Vec<TaskWithOwner>, RepositoryError> {
        let rows = match status {
            Some(status) => {
                sqlx::query_as::<_, TaskWithOwnerRow>(&format!(
                    "SELECT {TASK_COLUMNS}, u.name AS owner_name, u.email AS owner_email
                     FROM tasks k
                     JOIN users u ON u.id = k.user_id
                     WHERE k.tenant_id = ?1 AND k.status = ?2
                     ORDER BY k.created_at DESC, k.id DESC"
                ))
                .bind(self.tenant_id.as_i64())
                .bind(status.as_str())
                .fetch_all(self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, TaskWithOwnerRow>(&format!(
                    "SELECT {TASK_COLUMNS}, u.name AS owner_name, u.email AS owner_email
                     FROM tasks k
                     JOIN users u ON u.id = k.user_id
                     WHERE k.tenant_id = ?1
                     ORDER BY k.created_at DESC, k.id DESC"
                ))
                .bind(self.tenant_id.as_i64())
                .fetch_all(self.pool)
                .await?
            }
        };

        let mut tasks = Vec::with_capacity(rows.len());
        for row in rows {
            tasks.push(row.into_task_with_owner()?);
        }
        Ok(tasks)
    }

    /// Get one of the tenant's tasks by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails or the row is invalid.
    pub async fn get(&self, id: TaskId) -> Result<Option<Task>, RepositoryError> {
        let row = sqlx::query_as::<_, TaskRow>(&format!(
            "SELECT {TASK_COLUMNS}
             FROM tasks k
             WHERE k.id = ?1 AND k.tenant_id = ?2"
        ))
        .bind(id.as_i64())
        .bind(self.tenant_id.as_i64())
        .fetch_optional(self.pool)
        .await?;

        row.map(TaskRow::into_task).transpose()
    }

    /// Count the tasks owned by one user of the tenant.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_for_user(&self, user_id: UserId) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar(
            "SELECT COUNT(*) FROM tasks WHERE tenant_id = ?1 AND user_id = ?2",
        )
        .bind(self.tenant_id.as_i64())
        .bind(user_id.as_i64())
        .fetch_one(self.pool)
        .await?;
        Ok(count)
    }

    /// Create a task owned by `user_id` within the tenant.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the insert fails.
    pub async fn create(&self, user_id: UserId, data: &NewTask) -> Result<Task, RepositoryError> {
        let tags = tags_json(data.tags.as_ref())?;

        let row = sqlx::query_as::<_, TaskRow>(
            "INSERT INTO tasks
                 (tenant_id, user_id, title, description, due_date, status, priority, tags)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             RETURNING id, tenant_id, user_id, title, description, due_date,
                       status, priority, tags, created_at, updated_at",
        )
        .bind(self.tenant_id.as_i64())
        .bind(user_id.as_i64())
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.due_date)
        .bind(data.status.unwrap_or_default().as_str())
        .bind(data.priority.unwrap_or_default().as_str())
        .bind(&tags)
        .fetch_one(self.pool)
        .await?;

        row.into_task()
    }

    /// Update one of the tenant's tasks, merging only the provided fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the task doesn't exist within
    /// the tenant.
    pub async fn update(&self, id: TaskId, patch: &TaskPatch) -> Result<Task, RepositoryError> {
        let current = self.get(id).await?.ok_or(RepositoryError::NotFound)?;

        let title = patch.title.clone().unwrap_or(current.title);
        let description = patch.description.clone().or(current.description);
        let due_date = patch.due_date.or(current.due_date);
        let status = patch.status.unwrap_or(current.status);
        let priority = patch.priority.unwrap_or(current.priority);
        let tags = tags_json(Some(patch.tags.as_ref().unwrap_or(&current.tags)))?;
        let updated_at = Utc::now();

        sqlx::query(
            "UPDATE tasks
             SET title = ?1, description = ?2, due_date = ?3, status = ?4,
                 priority = ?5, tags = ?6, updated_at = ?7
             WHERE id = ?8 AND tenant_id = ?9",
        )
        .bind(&title)
        .bind(&description)
        .bind(due_date)
        .bind(status.as_str())
        .bind(priority.as_str())
        .bind(&tags)
        .bind(updated_at)
        .bind(id.as_i64())
        .bind(self.tenant_id.as_i64())
        .execute(self.pool)
        .await?;

        self.get(id).await?.ok_or(RepositoryError::NotFound)
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
        let result = sqlx::query(
            "UPDATE tasks SET status = ?1, updated_at = ?2
             WHERE id = ?3 AND tenant_id = ?4",
        )
        .bind(status.as_str())
        .bind(Utc::now())
        .bind(id.as_i64())
        .bind(self.tenant_id.as_i64())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        self.get(id).await?.ok_or(RepositoryError::NotFound)
    }

    /// Delete one of the tenant's tasks.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the task doesn't exist within
    /// the tenant.
    pub async fn delete(&self, id: TaskId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?1 AND tenant_id = ?2")
            .bind(id.as_i64())
            .bind(self.tenant_id.as_i64())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
