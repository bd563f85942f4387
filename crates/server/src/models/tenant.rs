//! Tenant domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use taskhub_core::{DomainName, HexColor, Slug, TenantId};

use super::user::UserWithTaskCount;

/// An isolated organization owning its own users, tasks, and branding config.
///
/// The config is created in the same transaction as the tenant, so a tenant
/// always carries one.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: TenantId,
    /// Display name of the organization.
    pub name: String,
    /// Unique, URL-safe identifier.
    pub slug: Slug,
    /// Optional unique custom domain, e.g. `tasks.example.com`.
    pub domain: Option<String>,
    /// Inactive tenants are invisible to tenant resolution.
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Branding, contact, and policy settings.
    pub config: TenantConfig,
}

/// Per-tenant branding, contact, and policy settings (1:1 with a tenant).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantConfig {
    /// Primary brand color as a 6-digit hex string.
    pub primary_color: String,
    /// Secondary brand color as a 6-digit hex string.
    pub secondary_color: String,
    pub logo_url: Option<String>,
    pub company_name: Option<String>,
    pub company_email: Option<String>,
    pub company_phone: Option<String>,
    pub company_address: Option<String>,
    /// Whether new users may self-register.
    pub allow_registration: bool,
    /// Per-user task cap, within [1, 1000].
    pub max_tasks_per_user: i64,
    pub allow_task_comments: bool,
}

/// A tenant annotated with its user and task counts (admin listings).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantWithCounts {
    #[serde(flatten)]
    pub tenant: Tenant,
    pub user_count: i64,
    pub task_count: i64,
}

/// A tenant with its users and per-user task counts (admin detail page).
#[derive(Debug, Clone)]
pub struct TenantDetail {
    pub tenant: Tenant,
    pub users: Vec<UserWithTaskCount>,
    pub user_count: i64,
    pub task_count: i64,
}

/// Validated input for creating a tenant.
#[derive(Debug, Clone)]
pub struct NewTenant {
    pub name: String,
    pub slug: Slug,
    pub domain: Option<DomainName>,
    pub config: TenantConfigPatch,
}

/// Validated partial update for a tenant. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct TenantPatch {
    pub name: Option<String>,
    pub slug: Option<Slug>,
    pub domain: Option<DomainName>,
    pub is_active: Option<bool>,
    pub config: Option<TenantConfigPatch>,
}

/// Validated partial config. On create, `None` fields take the documented
/// defaults; on update, `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct TenantConfigPatch {
    pub primary_color: Option<HexColor>,
    pub secondary_color: Option<HexColor>,
    pub logo_url: Option<String>,
    pub company_name: Option<String>,
    pub company_email: Option<String>,
    pub company_phone: Option<String>,
    pub company_address: Option<String>,
    pub allow_registration: Option<bool>,
    pub max_tasks_per_user: Option<i64>,
    pub allow_task_comments: Option<bool>,
}

/// Aggregate statistics for one tenant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantStats {
    pub users: i64,
    pub tasks: i64,
    pub completed_tasks: i64,
    pub pending_tasks: i64,
    /// `completed_tasks / tasks * 100`, or 0 when there are no tasks.
    pub completion_rate: f64,
}
