//! Tenant service.
//!
//! Provisioning, updates, aggregate statistics, and the default admin user
//! created alongside a new tenant.

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use sqlx::SqlitePool;
use thiserror::Error;

use taskhub_core::{Email, TaskStatus, TenantId, UserRole};

use crate::db::RepositoryError;
use crate::db::tenants::TenantRepository;
use crate::db::users::{NewUser, UserRepository};
use crate::models::tenant::{
    NewTenant, Tenant, TenantDetail, TenantPatch, TenantStats, TenantWithCounts,
};
use crate::models::user::User;

/// Name of the admin user provisioned with a new tenant.
const DEFAULT_USER_NAME: &str = "Administrator";
/// Email of the admin user provisioned with a new tenant.
const DEFAULT_USER_EMAIL: &str = "admin@example.com";
/// Initial password of the provisioned admin user; stored argon2-hashed.
const DEFAULT_USER_PASSWORD: &str = "admin123";

/// Errors from tenant service operations.
#[derive(Debug, Error)]
pub enum TenantServiceError {
    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] taskhub_core::EmailError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}

/// Tenant service.
pub struct TenantService<'a> {
    tenants: TenantRepository<'a>,
    users: UserRepository<'a>,
}

impl<'a> TenantService<'a> {
    /// Create a new tenant service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            tenants: TenantRepository::new(pool),
            users: UserRepository::new(pool),
        }
    }

    /// List all tenants with their user/task counts, newest first.
    ///
    /// # Errors
    ///
    /// Returns `TenantServiceError::Repository` on database failure.
    pub async fn list(&self) -> Result<Vec<TenantWithCounts>, TenantServiceError> {
        Ok(self.tenants.list_with_counts().await?)
    }

    /// Get a tenant with its users and per-user task counts.
    ///
    /// # Errors
    ///
    /// Returns `TenantServiceError::Repository` on database failure.
    pub async fn get(&self, id: TenantId) -> Result<Option<TenantDetail>, TenantServiceError> {
        let Some(tenant) = self.tenants.get(id).await? else {
            return Ok(None);
        };

        let users = self.users.list_with_task_counts(id).await?;
        let task_count = self.tenants.count_tasks(id, None).await?;
        let user_count = i64::try_from(users.len()).unwrap_or(i64::MAX);

        Ok(Some(TenantDetail {
            tenant,
            users,
            user_count,
            task_count,
        }))
    }

    /// Get a tenant by slug, active or not.
    ///
    /// # Errors
    ///
    /// Returns `TenantServiceError::Repository` on database failure.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Tenant>, TenantServiceError> {
        Ok(self.tenants.get_by_slug(slug).await?)
    }

    /// Create a tenant and its config atomically.
    ///
    /// # Errors
    ///
    /// Returns `TenantServiceError::Repository` with a `Conflict` inside if
    /// the slug or domain is taken.
    pub async fn create(&self, data: &NewTenant) -> Result<Tenant, TenantServiceError> {
        Ok(self.tenants.create(data).await?)
    }

    /// Provision the default admin user for a freshly created tenant.
    ///
    /// # Errors
    ///
    /// Returns `TenantServiceError::PasswordHash` if hashing fails, or
    /// `TenantServiceError::Repository` on database failure.
    pub async fn create_default_user(
        &self,
        tenant_id: TenantId,
    ) -> Result<User, TenantServiceError> {
        let email = Email::parse(DEFAULT_USER_EMAIL)?;
        let password_hash = hash_password(DEFAULT_USER_PASSWORD)?;

        let user = self
            .users
            .create(&NewUser {
                tenant_id,
                name: DEFAULT_USER_NAME.to_owned(),
                email,
                password_hash,
                role: UserRole::Admin,
            })
            .await?;

        Ok(user)
    }

    /// Update a tenant, merging only the provided fields.
    ///
    /// # Errors
    ///
    /// Returns `TenantServiceError::Repository` with `NotFound` inside if
    /// the tenant doesn't exist, or `Conflict` if the new slug/domain is
    /// taken.
    pub async fn update(
        &self,
        id: TenantId,
        patch: &TenantPatch,
    ) -> Result<Tenant, TenantServiceError> {
        Ok(self.tenants.update(id, patch).await?)
    }

    /// Delete a tenant; users, tasks, and config cascade.
    ///
    /// # Errors
    ///
    /// Returns `TenantServiceError::Repository` with `NotFound` inside if
    /// the tenant doesn't exist.
    pub async fn delete(&self, id: TenantId) -> Result<(), TenantServiceError> {
        Ok(self.tenants.delete(id).await?)
    }

    /// Aggregate statistics for one tenant.
    ///
    /// # Errors
    ///
    /// Returns `TenantServiceError::Repository` on database failure.
    pub async fn stats(&self, id: TenantId) -> Result<TenantStats, TenantServiceError> {
        let (users, tasks, completed_tasks, pending_tasks) = tokio::try_join!(
            self.tenants.count_users(id),
            self.tenants.count_tasks(id, None),
            self.tenants.count_tasks(id, Some(TaskStatus::Completed)),
            self.tenants.count_tasks(id, Some(TaskStatus::Pending)),
        )?;

        #[allow(clippy::cast_precision_loss)]
        let completion_rate = if tasks > 0 {
            (completed_tasks as f64 / tasks as f64) * 100.0
        } else {
            0.0
        };

        Ok(TenantStats {
            users,
            tasks,
            completed_tasks,
            pending_tasks,
            completion_rate,
        })
    }
}

/// Hash a password with argon2 and a fresh salt.
///
/// # Errors
///
/// Returns `TenantServiceError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, TenantServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| TenantServiceError::PasswordHash)
}
