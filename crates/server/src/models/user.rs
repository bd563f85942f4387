//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use taskhub_core::{TenantId, UserId, UserRole};

/// A user belonging to exactly one tenant.
///
/// The password hash never leaves the `db` layer; this type carries
/// everything else.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub tenant_id: TenantId,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// A user annotated with the number of tasks they own.
#[derive(Debug, Clone)]
pub struct UserWithTaskCount {
    pub user: User,
    pub task_count: i64,
}
