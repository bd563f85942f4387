//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /                          - Redirect to /tasks
//! GET    /health                    - Liveness check
//! GET    /health/ready              - Readiness check (DB ping)
//!
//! # Tasks (tenant resolution + stand-in user)
//! GET    /tasks                     - Task listing (?status= filter)
//! GET    /tasks/create              - New task form
//! POST   /tasks                     - Create task
//! GET    /tasks/{id}/edit           - Edit task form
//! PUT    /tasks/{id}                - Update task
//! DELETE /tasks/{id}                - Delete task
//! PATCH  /tasks/{id}/status         - Toggle status (JSON)
//!
//! # Admin console (role gate, no tenant resolution)
//! GET    /admin                     - Dashboard
//! GET    /admin/tenants             - Tenant listing
//! GET    /admin/tenants/create      - New tenant form
//! POST   /admin/tenants             - Create tenant
//! GET    /admin/tenants/{id}        - Tenant detail + stats
//! GET    /admin/tenants/{id}/edit   - Edit tenant form
//! PUT    /admin/tenants/{id}        - Update tenant
//! DELETE /admin/tenants/{id}        - Delete tenant
//! ```

pub mod admin;
pub mod tasks;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    middleware::from_fn_with_state,
    response::Redirect,
    routing::get,
};

use crate::error::AppError;
use crate::middleware::{require_admin, resolve_tenant};
use crate::state::AppState;

/// Create the tenant-scoped task routes router.
pub fn task_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(tasks::index).post(tasks::store))
        .route("/create", get(tasks::create_page))
        .route("/{id}", axum::routing::put(tasks::update).delete(tasks::destroy))
        .route("/{id}/edit", get(tasks::edit_page))
        .route("/{id}/status", axum::routing::patch(tasks::update_status))
        .layer(from_fn_with_state(state.clone(), resolve_tenant))
}

/// Create the admin console router.
pub fn admin_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(admin::dashboard))
        .route("/tenants", get(admin::index).post(admin::store))
        .route("/tenants/create", get(admin::create_page))
        .route(
            "/tenants/{id}",
            get(admin::show).put(admin::update).delete(admin::destroy),
        )
        .route("/tenants/{id}/edit", get(admin::edit_page))
        .layer(from_fn_with_state(state.clone(), require_admin))
}

/// Create the full application router.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { Redirect::to("/tasks") }))
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/tasks", task_routes(&state))
        .nest("/admin", admin_routes(&state))
        .fallback(not_found)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies database connectivity before returning OK.
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Fallback handler rendering the 404 error page.
async fn not_found() -> AppError {
    AppError::NotFound("Page not found".to_string())
}
