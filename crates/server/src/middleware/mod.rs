//! HTTP middleware stack for the server.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Tenant resolution (tenant-scoped route group only)
//! 4. Role gate (admin route group only)

pub mod auth;
pub mod tenant;

pub use auth::{RequireUser, require_admin};
pub use tenant::{CurrentTenant, resolve_tenant};
