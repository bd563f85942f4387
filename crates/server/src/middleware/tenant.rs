//! Tenant resolution middleware.
//!
//! Layered on the tenant-scoped route group only; the admin console operates
//! across tenants and never runs this.

use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Request, State},
    http::header::HOST,
    middleware::Next,
    response::Response,
};

use crate::db::tenants::TenantRepository;
use crate::error::AppError;
use crate::models::tenant::Tenant;
use crate::state::AppState;

/// The tenant resolved for the current request.
///
/// Inserted into request extensions by [`resolve_tenant`]; handlers get it
/// with `Extension<CurrentTenant>`.
#[derive(Clone)]
pub struct CurrentTenant(pub Arc<Tenant>);

/// Resolve the tenant for the request, or fail with the 404 error page.
///
/// The lookup chain is exact domain (Host header, port stripped), then slug
/// as the first path segment of the original URI, then the configured
/// fallback slug.
///
/// # Errors
///
/// Returns `AppError::TenantNotFound` when no tenant matches, or
/// `AppError::Database` on lookup failure.
pub async fn resolve_tenant(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let host = request
        .headers()
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.split(':').next())
        .unwrap_or_default()
        .to_owned();

    // The router may have nested us; resolve against the path the client sent.
    let path = request
        .extensions()
        .get::<OriginalUri>()
        .map_or_else(|| request.uri().path().to_owned(), |u| u.path().to_owned());
    let first_segment = path
        .trim_start_matches('/')
        .split('/')
        .next()
        .filter(|s| !s.is_empty())
        .map(str::to_owned);

    let tenant = TenantRepository::new(state.pool())
        .resolve(
            &host,
            first_segment.as_deref(),
            state.config().tenant_fallback_slug.as_deref(),
        )
        .await?
        .ok_or(AppError::TenantNotFound)?;

    tracing::debug!(tenant_id = %tenant.id, slug = %tenant.slug, "resolved tenant");

    request
        .extensions_mut()
        .insert(CurrentTenant(Arc::new(tenant)));

    Ok(next.run(request).await)
}
