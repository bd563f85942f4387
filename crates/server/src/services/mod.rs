//! Business logic services.
//!
//! # Services
//!
//! - `tenants` - Tenant provisioning, stats, and the default admin user
//! - `tasks` - Tenant-scoped task operations

pub mod tasks;
pub mod tenants;

pub use tasks::TaskService;
pub use tenants::{TenantService, TenantServiceError};
