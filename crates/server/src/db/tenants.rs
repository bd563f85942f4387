//! Tenant repository: the tenant directory plus admin CRUD.
//!
//! Tenants and their configs are read through a single LEFT JOIN so a
//! missing config row (possible until the first config upsert) degrades to
//! the documented defaults instead of hiding the tenant.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use taskhub_core::{DomainName, Slug, TaskStatus, TenantId};

use super::{RepositoryError, map_unique_violation};
use crate::models::tenant::{
    NewTenant, Tenant, TenantConfig, TenantConfigPatch, TenantPatch, TenantWithCounts,
};

/// Default primary brand color.
pub const DEFAULT_PRIMARY_COLOR: &str = "#6366f1";
/// Default secondary brand color.
pub const DEFAULT_SECONDARY_COLOR: &str = "#8b5cf6";
/// Default per-user task cap.
pub const DEFAULT_MAX_TASKS_PER_USER: i64 = 100;

/// Path segment reserved for the admin console; never treated as a slug.
pub const ADMIN_PATH_SEGMENT: &str = "admin";

const TENANT_COLUMNS: &str = "t.id, t.name, t.slug, t.domain, t.is_active, \
     t.created_at, t.updated_at, \
     c.primary_color, c.secondary_color, c.logo_url, c.company_name, \
     c.company_email, c.company_phone, c.company_address, \
     c.allow_registration, c.max_tasks_per_user, c.allow_task_comments";

/// Joined tenant + config row. Config columns are nullable because of the
/// LEFT JOIN; absent values fall back to defaults.
#[derive(sqlx::FromRow)]
struct TenantRow {
    id: i64,
    name: String,
    slug: String,
    domain: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    primary_color: Option<String>,
    secondary_color: Option<String>,
    logo_url: Option<String>,
    company_name: Option<String>,
    company_email: Option<String>,
    company_phone: Option<String>,
    company_address: Option<String>,
    allow_registration: Option<bool>,
    max_tasks_per_user: Option<i64>,
    allow_task_comments: Option<bool>,
}

impl TenantRow {
    fn into_tenant(self) -> Result<Tenant, RepositoryError> {
        let slug = Slug::parse(&self.slug).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid slug in database: {e}"))
        })?;

        Ok(Tenant {
            id: TenantId::new(self.id),
            name: self.name,
            slug,
            domain: self.domain,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
            config: TenantConfig {
                primary_color: self
                    .primary_color
                    .unwrap_or_else(|| DEFAULT_PRIMARY_COLOR.to_owned()),
                secondary_color: self
                    .secondary_color
                    .unwrap_or_else(|| DEFAULT_SECONDARY_COLOR.to_owned()),
                logo_url: self.logo_url,
                company_name: self.company_name,
                company_email: self.company_email,
                company_phone: self.company_phone,
                company_address: self.company_address,
                allow_registration: self.allow_registration.unwrap_or(true),
                max_tasks_per_user: self
                    .max_tasks_per_user
                    .unwrap_or(DEFAULT_MAX_TASKS_PER_USER),
                allow_task_comments: self.allow_task_comments.unwrap_or(true),
            },
        })
    }
}

#[derive(sqlx::FromRow)]
struct TenantWithCountsRow {
    #[sqlx(flatten)]
    tenant: TenantRow,
    user_count: i64,
    task_count: i64,
}

#[derive(sqlx::FromRow)]
struct ConfigRow {
    primary_color: String,
    secondary_color: String,
    logo_url: Option<String>,
    company_name: Option<String>,
    company_email: Option<String>,
    company_phone: Option<String>,
    company_address: Option<String>,
    allow_registration: bool,
    max_tasks_per_user: i64,
    allow_task_comments: bool,
}

/// Resolve a [`TenantConfigPatch`] against the documented defaults.
fn config_with_defaults(patch: &TenantConfigPatch) -> TenantConfig {
    TenantConfig {
        primary_color: patch
            .primary_color
            .as_ref()
            .map_or_else(|| DEFAULT_PRIMARY_COLOR.to_owned(), |c| c.as_str().to_owned()),
        secondary_color: patch
            .secondary_color
            .as_ref()
            .map_or_else(|| DEFAULT_SECONDARY_COLOR.to_owned(), |c| c.as_str().to_owned()),
        logo_url: patch.logo_url.clone(),
        company_name: patch.company_name.clone(),
        company_email: patch.company_email.clone(),
        company_phone: patch.company_phone.clone(),
        company_address: patch.company_address.clone(),
        allow_registration: patch.allow_registration.unwrap_or(true),
        max_tasks_per_user: patch
            .max_tasks_per_user
            .unwrap_or(DEFAULT_MAX_TASKS_PER_USER),
        allow_task_comments: patch.allow_task_comments.unwrap_or(true),
    }
}

/// Repository for tenant database operations.
pub struct TenantRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> TenantRepository<'a> {
    /// Create a new tenant repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Resolve the tenant for an incoming request.
    ///
    /// Lookup chain, short-circuiting on the first hit:
    /// 1. active tenant whose `domain` equals `host` (port already stripped);
    /// 2. active tenant whose `slug` equals the first path segment, unless
    ///    that segment is the reserved word `admin`;
    /// 3. active tenant whose slug is `fallback_slug`, when one is
    ///    configured.
    ///
    /// Returns `Ok(None)` when nothing matches; the caller must treat that
    /// as fatal for the request.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if a lookup fails.
    pub async fn resolve(
        &self,
        host: &str,
        first_path_segment: Option<&str>,
        fallback_slug: Option<&str>,
    ) -> Result<Option<Tenant>, RepositoryError> {
        if !host.is_empty()
            && let Some(tenant) = self.find_active_by_domain(host).await?
        {
            return Ok(Some(tenant));
        }

        if let Some(segment) = first_path_segment
            && segment != ADMIN_PATH_SEGMENT
            && let Some(tenant) = self.find_active_by_slug(segment).await?
        {
            return Ok(Some(tenant));
        }

        if let Some(slug) = fallback_slug {
            return self.find_active_by_slug(slug).await;
        }

        Ok(None)
    }

    /// Find an active tenant by exact domain match.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails or the row is invalid.
    pub async fn find_active_by_domain(
        &self,
        domain: &str,
    ) -> Result<Option<Tenant>, RepositoryError> {
        let row = sqlx::query_as::<_, TenantRow>(&format!(
            "SELECT {TENANT_COLUMNS}
             FROM tenants t
             LEFT JOIN tenant_configs c ON c.tenant_id = t.id
             WHERE t.domain = ?1 AND t.is_active = TRUE"
        ))
        .bind(domain)
        .fetch_optional(self.pool)
        .await?;

        row.map(TenantRow::into_tenant).transpose()
    }

    /// Find an active tenant by slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails or the row is invalid.
    pub async fn find_active_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<Tenant>, RepositoryError> {
        let row = sqlx::query_as::<_, TenantRow>(&format!(
            "SELECT {TENANT_COLUMNS}
             FROM tenants t
             LEFT JOIN tenant_configs c ON c.tenant_id = t.id
             WHERE t.slug = ?1 AND t.is_active = TRUE"
        ))
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        row.map(TenantRow::into_tenant).transpose()
    }

    /// Get a tenant by id, active or not.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails or the row is invalid.
    pub async fn get(&self, id: TenantId) -> Result<Option<Tenant>, RepositoryError> {
        let row = sqlx::query_as::<_, TenantRow>(&format!(
            "SELECT {TENANT_COLUMNS}
             FROM tenants t
             LEFT JOIN tenant_configs c ON c.tenant_id = t.id
             WHERE t.id = ?1"
        ))
        .bind(id.as_i64())
        .fetch_optional(self.pool)
        .await?;

        row.map(TenantRow::into_tenant).transpose()
    }

    /// Get a tenant by slug, active or not.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails or the row is invalid.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Tenant>, RepositoryError> {
        let row = sqlx::query_as::<_, TenantRow>(&format!(
            "SELECT {TENANT_COLUMNS}
             FROM tenants t
             LEFT JOIN tenant_configs c ON c.tenant_id = t.id
             WHERE t.slug = ?1"
        ))
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        row.map(TenantRow::into_tenant).transpose()
    }

    /// List all tenants with their user/task counts, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails or a row is invalid.
    pub async fn list_with_counts(&self) -> Result<Vec<TenantWithCounts>, RepositoryError> {
        let rows = sqlx::query_as::<_, TenantWithCountsRow>(&format!(
            "SELECT {TENANT_COLUMNS},
                    (SELECT COUNT(*) FROM users u WHERE u.tenant_id = t.id) AS user_count,
                    (SELECT COUNT(*) FROM tasks k WHERE k.tenant_id = t.id) AS task_count
             FROM tenants t
             LEFT JOIN tenant_configs c ON c.tenant_id = t.id
             ORDER BY t.created_at DESC, t.id DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        let mut tenants = Vec::with_capacity(rows.len());
        for row in rows {
            tenants.push(TenantWithCounts {
                tenant: row.tenant.into_tenant()?,
                user_count: row.user_count,
                task_count: row.task_count,
            });
        }
        Ok(tenants)
    }

    /// Create a tenant and its config in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug or domain is taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, data: &NewTenant) -> Result<Tenant, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let (id, created_at, updated_at) = {
            let row: (i64, DateTime<Utc>, DateTime<Utc>) = sqlx::query_as(
                "INSERT INTO tenants (name, slug, domain)
                 VALUES (?1, ?2, ?3)
                 RETURNING id, created_at, updated_at",
            )
            .bind(&data.name)
            .bind(data.slug.as_str())
            .bind(data.domain.as_ref().map(DomainName::as_str))
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| map_unique_violation(e, "tenant slug or domain"))?;
            row
        };

        let config = config_with_defaults(&data.config);

        sqlx::query(
            "INSERT INTO tenant_configs
                 (tenant_id, primary_color, secondary_color, logo_url,
                  company_name, company_email, company_phone, company_address,
                  allow_registration, max_tasks_per_user, allow_task_comments)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        )
        .bind(id)
        .bind(&config.primary_color)
        .bind(&config.secondary_color)
        .bind(&config.logo_url)
        .bind(&config.company_name)
        .bind(&config.company_email)
        .bind(&config.company_phone)
        .bind(&config.company_address)
        .bind(config.allow_registration)
        .bind(config.max_tasks_per_user)
        .bind(config.allow_task_comments)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Tenant {
            id: TenantId::new(id),
            name: data.name.clone(),
            slug: data.slug.clone(),
            domain: data.domain.as_ref().map(|d| d.as_str().to_owned()),
            is_active: true,
            created_at,
            updated_at,
            config,
        })
    }

    /// Update a tenant, merging only the provided fields. The config update
    /// is an upsert: created with defaults if absent, otherwise merged.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the tenant doesn't exist.
    /// Returns `RepositoryError::Conflict` if the new slug/domain is taken.
    pub async fn update(
        &self,
        id: TenantId,
        patch: &TenantPatch,
    ) -> Result<Tenant, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let current: Option<(String, String, Option<String>, bool)> = sqlx::query_as(
            "SELECT name, slug, domain, is_active FROM tenants WHERE id = ?1",
        )
        .bind(id.as_i64())
        .fetch_optional(&mut *tx)
        .await?;
        let (cur_name, cur_slug, cur_domain, cur_active) =
            current.ok_or(RepositoryError::NotFound)?;

        let name = patch.name.clone().unwrap_or(cur_name);
        let slug = patch
            .slug
            .as_ref()
            .map_or(cur_slug, |s| s.as_str().to_owned());
        let domain = patch
            .domain
            .as_ref()
            .map(|d| d.as_str().to_owned())
            .or(cur_domain);
        let is_active = patch.is_active.unwrap_or(cur_active);

        sqlx::query(
            "UPDATE tenants
             SET name = ?1, slug = ?2, domain = ?3, is_active = ?4, updated_at = ?5
             WHERE id = ?6",
        )
        .bind(&name)
        .bind(&slug)
        .bind(&domain)
        .bind(is_active)
        .bind(Utc::now())
        .bind(id.as_i64())
        .execute(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, "tenant slug or domain"))?;

        if let Some(cfg) = &patch.config {
            upsert_config(&mut tx, id, cfg).await?;
        }

        tx.commit().await?;

        self.get(id).await?.ok_or(RepositoryError::NotFound)
    }

    /// Delete a tenant; the schema cascades to config, users, and tasks.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the tenant doesn't exist.
    pub async fn delete(&self, id: TenantId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM tenants WHERE id = ?1")
            .bind(id.as_i64())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Count the users of a tenant.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_users(&self, id: TenantId) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE tenant_id = ?1")
            .bind(id.as_i64())
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Count the tasks of a tenant, optionally restricted to one status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_tasks(
        &self,
        id: TenantId,
        status: Option<TaskStatus>,
    ) -> Result<i64, RepositoryError> {
        let count = match status {
            Some(status) => {
                sqlx::query_scalar(
                    "SELECT COUNT(*) FROM tasks WHERE tenant_id = ?1 AND status = ?2",
                )
                .bind(id.as_i64())
                .bind(status.as_str())
                .fetch_one(self.pool)
                .await?
            }
            None => {
                sqlx::query_scalar("SELECT COUNT(*) FROM tasks WHERE tenant_id = ?1")
                    .bind(id.as_i64())
                    .fetch_one(self.pool)
                    .await?
            }
        };
        Ok(count)
    }
}

/// Insert-or-merge the config row for a tenant inside a transaction.
async fn upsert_config(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    id: TenantId,
    patch: &TenantConfigPatch,
) -> Result<(), RepositoryError> {
    let existing = sqlx::query_as::<_, ConfigRow>(
        "SELECT primary_color, secondary_color, logo_url, company_name,
                company_email, company_phone, company_address,
                allow_registration, max_tasks_per_user, allow_task_comments
         FROM tenant_configs WHERE tenant_id = ?1",
    )
    .bind(id.as_i64())
    .fetch_optional(&mut **tx)
    .await?;

    let merged = match existing {
        Some(row) => TenantConfig {
            primary_color: patch
                .primary_color
                .as_ref()
                .map_or(row.primary_color, |c| c.as_str().to_owned()),
            secondary_color: patch
                .secondary_color
                .as_ref()
                .map_or(row.secondary_color, |c| c.as_str().to_owned()),
            logo_url: patch.logo_url.clone().or(row.logo_url),
            company_name: patch.company_name.clone().or(row.company_name),
            company_email: patch.company_email.clone().or(row.company_email),
            company_phone: patch.company_phone.clone().or(row.company_phone),
            company_address: patch.company_address.clone().or(row.company_address),
            allow_registration: patch.allow_registration.unwrap_or(row.allow_registration),
            max_tasks_per_user: patch.max_tasks_per_user.unwrap_or(row.max_tasks_per_user),
            allow_task_comments: patch
                .allow_task_comments
                .unwrap_or(row.allow_task_comments),
        },
        None => config_with_defaults(patch),
    };

    sqlx::query(
        "INSERT INTO tenant_configs
             (tenant_id, primary_color, secondary_color, logo_url,
              company_name, company_email, company_phone, company_address,
              allow_registration, max_tasks_per_user, allow_task_comments)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
         ON CONFLICT (tenant_id) DO UPDATE SET
             primary_color = excluded.primary_color,
             secondary_color = excluded.secondary_color,
             logo_url = excluded.logo_url,
             company_name = excluded.company_name,
             company_email = excluded.company_email,
             company_phone = excluded.company_phone,
             company_address = excluded.company_address,
             allow_registration = excluded.allow_registration,
             max_tasks_per_user = excluded.max_tasks_per_user,
             allow_task_comments = excluded.allow_task_comments",
    )
    .bind(id.as_i64())
    .bind(&merged.primary_color)
    .bind(&merged.secondary_color)
    .bind(&merged.logo_url)
    .bind(&merged.company_name)
    .bind(&merged.company_email)
    .bind(&merged.company_phone)
    .bind(&merged.company_address)
    .bind(merged.allow_registration)
    .bind(merged.max_tasks_per_user)
    .bind(merged.allow_task_comments)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
