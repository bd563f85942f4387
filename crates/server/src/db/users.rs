//! User repository.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use taskhub_core::{Email, TenantId, UserId, UserRole};

use super::{RepositoryError, map_unique_violation};
use crate::models::user::{User, UserWithTaskCount};

const USER_COLUMNS: &str =
    "id, tenant_id, name, email, role, is_active, created_at";

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    tenant_id: i64,
    name: String,
    email: String,
    role: String,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> Result<User, RepositoryError> {
        let role = self.role.parse::<UserRole>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid user role in database: {e}"))
        })?;

        Ok(User {
            id: UserId::new(self.id),
            tenant_id: TenantId::new(self.tenant_id),
            name: self.name,
            email: self.email,
            role,
            is_active: self.is_active,
            created_at: self.created_at,
        })
    }
}

/// Validated input for creating a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub tenant_id: TenantId,
    pub name: String,
    pub email: Email,
    /// Argon2 PHC string; hashing happens in the service layer.
    pub password_hash: String,
    pub role: UserRole,
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// The oldest active user of a tenant (the acting user for task pages
    /// while there is no session login).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails or the row is invalid.
    pub async fn first_active_for_tenant(
        &self,
        tenant_id: TenantId,
    ) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users
             WHERE tenant_id = ?1 AND is_active = TRUE
             ORDER BY id ASC LIMIT 1"
        ))
        .bind(tenant_id.as_i64())
        .fetch_optional(self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    /// The oldest active user across all tenants (the acting user for the
    /// admin console while there is no session login).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails or the row is invalid.
    pub async fn first_active(&self) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users
             WHERE is_active = TRUE
             ORDER BY id ASC LIMIT 1"
        ))
        .fetch_optional(self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    /// List a tenant's users with their task counts, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails or a row is invalid.
    pub async fn list_with_task_counts(
        &self,
        tenant_id: TenantId,
    ) -> Result<Vec<UserWithTaskCount>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct Row {
            #[sqlx(flatten)]
            user: UserRow,
            task_count: i64,
        }

        let rows = sqlx::query_as::<_, Row>(&format!(
            "SELECT {USER_COLUMNS},
                    (SELECT COUNT(*) FROM tasks k WHERE k.user_id = users.id) AS task_count
             FROM users
             WHERE tenant_id = ?1
             ORDER BY id ASC"
        ))
        .bind(tenant_id.as_i64())
        .fetch_all(self.pool)
        .await?;

        let mut users = Vec::with_capacity(rows.len());
        for row in rows {
            users.push(UserWithTaskCount {
                user: row.user.into_user()?,
                task_count: row.task_count,
            });
        }
        Ok(users)
    }

    /// Create a user within a tenant.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already taken
    /// within the tenant. Returns `RepositoryError::Database` for other
    /// database errors.
    pub async fn create(&self, data: &NewUser) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (tenant_id, name, email, password_hash, role)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(data.tenant_id.as_i64())
        .bind(&data.name)
        .bind(data.email.as_str())
        .bind(&data.password_hash)
        .bind(data.role.as_str())
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "user email"))?;

        row.into_user()
    }
}
