//! Database access for the server.
//!
//! # Storage
//!
//! A single SQLite database holds all tenants:
//!
//! - `tenants` - Organizations sharing the deployment
//! - `tenant_configs` - Branding/policy settings, 1:1 with tenants
//! - `users` - Tenant members (argon2 password hashes)
//! - `tasks` - Tenant- and user-owned tasks
//!
//! Tenant isolation is a query convention, not a runtime lock: every user
//! and task query in this module filters by `tenant_id`. Cascading deletes
//! are declared in the schema and enforced via `foreign_keys(true)`.
//!
//! # Migrations
//!
//! SQL migrations live in `crates/server/migrations/` and are embedded via
//! `sqlx::migrate!`; [`run_migrations`] applies them at startup.

pub mod tasks;
pub mod tenants;
pub mod users;

use std::str::FromStr;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

/// Errors from the repository layer.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Underlying database operation failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A unique constraint was violated (duplicate slug, domain, email).
    #[error("conflict: {0}")]
    Conflict(String),

    /// The referenced row does not exist (or belongs to another tenant).
    #[error("not found")]
    NotFound,

    /// A stored value failed to parse back into its domain type.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Create a SQLite connection pool with sensible defaults.
///
/// Foreign keys are switched on per connection so that tenant deletion
/// cascades to configs, users, and tasks.
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is invalid or the database cannot be
/// opened.
pub async fn create_pool(
    database_url: &secrecy::SecretString,
) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url.expose_secret())?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}

/// Apply all pending migrations.
///
/// # Errors
///
/// Returns `sqlx::migrate::MigrateError` if a migration fails.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Map a sqlx error to `Conflict` when it is a unique-constraint violation.
fn map_unique_violation(e: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(format!("{what} already exists"));
    }
    RepositoryError::Database(e)
}
