//! Domain types for the server.
//!
//! These types represent validated domain objects separate from database row
//! types; the `db` module maps rows into them at the boundary.

pub mod task;
pub mod tenant;
pub mod user;

pub use task::{NewTask, Task, TaskOwner, TaskPatch, TaskWithOwner};
pub use tenant::{
    NewTenant, Tenant, TenantConfig, TenantConfigPatch, TenantDetail, TenantPatch, TenantStats,
    TenantWithCounts,
};
pub use user::{User, UserWithTaskCount};
