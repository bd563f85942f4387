//! Stand-in authentication middleware and extractors.
//!
//! There is no session login yet: the acting user is the oldest active user
//! in scope. The role gate is real; only the identity lookup is a stand-in.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use taskhub_core::UserRole;

use crate::db::users::UserRepository;
use crate::error::AppError;
use crate::middleware::tenant::CurrentTenant;
use crate::models::user::User;
use crate::state::AppState;

/// Extractor providing the acting user for tenant-scoped handlers.
///
/// Loads the oldest active user of the resolved tenant; redirects to the
/// login page when the tenant has none.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(RequireUser(user): RequireUser) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
pub struct RequireUser(pub User);

/// Rejection for [`RequireUser`].
pub enum UserRejection {
    /// No active user in the tenant; send the client to the login page.
    RedirectToLogin,
    /// Lookup failed.
    Error(AppError),
}

impl IntoResponse for UserRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/auth/login").into_response(),
            Self::Error(e) => e.into_response(),
        }
    }
}

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = UserRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let tenant = parts
            .extensions
            .get::<CurrentTenant>()
            .ok_or(UserRejection::Error(AppError::TenantNotFound))?;

        let user = UserRepository::new(state.pool())
            .first_active_for_tenant(tenant.0.id)
            .await
            .map_err(|e| UserRejection::Error(e.into()))?
            .ok_or(UserRejection::RedirectToLogin)?;

        Ok(Self(user))
    }
}

/// Gate the admin route group behind an admin-class role.
///
/// The admin console operates across tenants, so the acting user is the
/// oldest active user anywhere. No user redirects to login; a user whose
/// role is not ADMIN or `SUPER_ADMIN` gets the 403 error page.
///
/// # Errors
///
/// Returns `AppError::Forbidden` for non-admin roles, or
/// `AppError::Database` on lookup failure.
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(user) = UserRepository::new(state.pool()).first_active().await? else {
        return Ok(Redirect::to("/auth/login").into_response());
    };

    if !UserRole::ADMIN_ROLES.contains(&user.role) {
        return Err(AppError::Forbidden("Access denied".to_string()));
    }

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}
