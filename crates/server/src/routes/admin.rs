//! Admin console route handlers (cross-tenant).

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};

use taskhub_core::TenantId;

use crate::db::RepositoryError;
use crate::error::{AppError, Result};
use crate::filters;
use crate::forms::{FieldError, TenantForm};
use crate::models::tenant::{Tenant, TenantStats, TenantWithCounts};
use crate::services::{TenantService, TenantServiceError};
use crate::state::AppState;

/// Tenant row data for admin listings.
#[derive(Clone)]
pub struct TenantRowView {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub domain: Option<String>,
    pub is_active: bool,
    pub user_count: i64,
    pub task_count: i64,
    pub created_at: String,
}

impl TenantRowView {
    fn from_counts(t: &TenantWithCounts) -> Self {
        Self {
            id: t.tenant.id.as_i64(),
            name: t.tenant.name.clone(),
            slug: t.tenant.slug.as_str().to_owned(),
            domain: t.tenant.domain.clone(),
            is_active: t.tenant.is_active,
            user_count: t.user_count,
            task_count: t.task_count,
            created_at: t.tenant.created_at.format("%b %-d, %Y").to_string(),
        }
    }
}

/// Member row data for the tenant detail page.
#[derive(Clone)]
pub struct MemberView {
    pub name: String,
    pub email: String,
    pub role: String,
    pub is_active: bool,
    pub task_count: i64,
}

/// Form values echoed back into the tenant form on re-render.
#[derive(Clone)]
pub struct TenantFormView {
    pub name: String,
    pub slug: String,
    pub domain: String,
    pub is_active: bool,
    pub primary_color: String,
    pub secondary_color: String,
    pub logo_url: String,
    pub company_name: String,
    pub company_email: String,
    pub company_phone: String,
    pub company_address: String,
    pub allow_registration: bool,
    pub max_tasks_per_user: String,
    pub allow_task_comments: bool,
}

impl Default for TenantFormView {
    fn default() -> Self {
        Self {
            name: String::new(),
            slug: String::new(),
            domain: String::new(),
            is_active: true,
            primary_color: String::new(),
            secondary_color: String::new(),
            logo_url: String::new(),
            company_name: String::new(),
            company_email: String::new(),
            company_phone: String::new(),
            company_address: String::new(),
            allow_registration: true,
            max_tasks_per_user: String::new(),
            allow_task_comments: true,
        }
    }
}

impl TenantFormView {
    fn from_form(form: &TenantForm) -> Self {
        let checked = |v: &Option<String>| {
            v.as_deref()
                .is_some_and(|s| matches!(s, "true" | "on" | "1"))
        };
        Self {
            name: form.name.clone().unwrap_or_default(),
            slug: form.slug.clone().unwrap_or_default(),
            domain: form.domain.clone().unwrap_or_default(),
            is_active: form.is_active.is_none() || checked(&form.is_active),
            primary_color: form.primary_color.clone().unwrap_or_default(),
            secondary_color: form.secondary_color.clone().unwrap_or_default(),
            logo_url: form.logo_url.clone().unwrap_or_default(),
            company_name: form.company_name.clone().unwrap_or_default(),
            company_email: form.company_email.clone().unwrap_or_default(),
            company_phone: form.company_phone.clone().unwrap_or_default(),
            company_address: form.company_address.clone().unwrap_or_default(),
            allow_registration: checked(&form.allow_registration),
            max_tasks_per_user: form.max_tasks_per_user.clone().unwrap_or_default(),
            allow_task_comments: checked(&form.allow_task_comments),
        }
    }

    fn from_tenant(tenant: &Tenant) -> Self {
        Self {
            name: tenant.name.clone(),
            slug: tenant.slug.as_str().to_owned(),
            domain: tenant.domain.clone().unwrap_or_default(),
            is_active: tenant.is_active,
            primary_color: tenant.config.primary_color.clone(),
            secondary_color: tenant.config.secondary_color.clone(),
            logo_url: tenant.config.logo_url.clone().unwrap_or_default(),
            company_name: tenant.config.company_name.clone().unwrap_or_default(),
            company_email: tenant.config.company_email.clone().unwrap_or_default(),
            company_phone: tenant.config.company_phone.clone().unwrap_or_default(),
            company_address: tenant.config.company_address.clone().unwrap_or_default(),
            allow_registration: tenant.config.allow_registration,
            max_tasks_per_user: tenant.config.max_tasks_per_user.to_string(),
            allow_task_comments: tenant.config.allow_task_comments,
        }
    }
}

/// Dashboard template with aggregate stats.
#[derive(Template, WebTemplate)]
#[template(path = "admin/dashboard.html")]
pub struct DashboardTemplate {
    pub total_tenants: usize,
    pub active_tenants: usize,
    pub total_users: i64,
    pub total_tasks: i64,
    pub tenants: Vec<TenantRowView>,
}

/// Tenant listing template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/tenants/index.html")]
pub struct TenantsIndexTemplate {
    pub tenants: Vec<TenantRowView>,
}

/// New tenant form template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/tenants/create.html")]
pub struct TenantCreateTemplate {
    pub errors: Vec<FieldError>,
    pub old: TenantFormView,
}

/// Edit tenant form template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/tenants/edit.html")]
pub struct TenantEditTemplate {
    pub tenant_id: i64,
    pub errors: Vec<FieldError>,
    pub old: TenantFormView,
}

/// Tenant detail template with stats and members.
#[derive(Template, WebTemplate)]
#[template(path = "admin/tenants/show.html")]
pub struct TenantShowTemplate {
    pub tenant: TenantRowView,
    pub stats: TenantStats,
    pub completion_rate: String,
    pub members: Vec<MemberView>,
}

/// Display the admin dashboard with aggregate stats.
pub async fn dashboard(State(state): State<AppState>) -> Result<DashboardTemplate> {
    let tenants = TenantService::new(state.pool()).list().await?;

    let total_tenants = tenants.len();
    let active_tenants = tenants.iter().filter(|t| t.tenant.is_active).count();
    let total_users = tenants.iter().map(|t| t.user_count).sum();
    let total_tasks = tenants.iter().map(|t| t.task_count).sum();

    Ok(DashboardTemplate {
        total_tenants,
        active_tenants,
        total_users,
        total_tasks,
        tenants: tenants.iter().map(TenantRowView::from_counts).collect(),
    })
}

/// Display the tenant listing.
pub async fn index(State(state): State<AppState>) -> Result<TenantsIndexTemplate> {
    let tenants = TenantService::new(state.pool()).list().await?;

    Ok(TenantsIndexTemplate {
        tenants: tenants.iter().map(TenantRowView::from_counts).collect(),
    })
}

/// Display the new tenant form.
pub async fn create_page() -> TenantCreateTemplate {
    TenantCreateTemplate {
        errors: Vec::new(),
        old: TenantFormView::default(),
    }
}

/// Create a tenant (plus its default admin user), re-rendering the form on
/// validation failure or slug/domain conflict.
#[tracing::instrument(skip_all)]
pub async fn store(
    State(state): State<AppState>,
    axum::extract::Form(form): axum::extract::Form<TenantForm>,
) -> Result<Response> {
    let data = match form.validate_create() {
        Ok(data) => data,
        Err(errors) => {
            let page = TenantCreateTemplate {
                errors,
                old: TenantFormView::from_form(&form),
            };
            return Ok(page.into_response());
        }
    };

    let service = TenantService::new(state.pool());
    let tenant = match service.create(&data).await {
        Ok(tenant) => tenant,
        Err(TenantServiceError::Repository(RepositoryError::Conflict(message))) => {
            let page = TenantCreateTemplate {
                errors: vec![FieldError {
                    field: "slug",
                    message,
                }],
                old: TenantFormView::from_form(&form),
            };
            return Ok(page.into_response());
        }
        Err(e) => return Err(e.into()),
    };

    service.create_default_user(tenant.id).await?;

    tracing::info!(tenant_id = %tenant.id, slug = %tenant.slug, "tenant created");

    Ok(Redirect::to("/admin/tenants").into_response())
}

/// Display a tenant's detail page with stats and members.
pub async fn show(State(state): State<AppState>, Path(id): Path<i64>) -> Result<TenantShowTemplate> {
    let service = TenantService::new(state.pool());
    let id = TenantId::new(id);

    let detail = service
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Organization not found".to_string()))?;
    let stats = service.stats(id).await?;

    let tenant = TenantRowView {
        id: detail.tenant.id.as_i64(),
        name: detail.tenant.name.clone(),
        slug: detail.tenant.slug.as_str().to_owned(),
        domain: detail.tenant.domain.clone(),
        is_active: detail.tenant.is_active,
        user_count: detail.user_count,
        task_count: detail.task_count,
        created_at: detail.tenant.created_at.format("%b %-d, %Y").to_string(),
    };

    let members = detail
        .users
        .iter()
        .map(|u| MemberView {
            name: u.user.name.clone(),
            email: u.user.email.clone(),
            role: u.user.role.as_str().to_owned(),
            is_active: u.user.is_active,
            task_count: u.task_count,
        })
        .collect();

    Ok(TenantShowTemplate {
        tenant,
        completion_rate: format!("{:.1}%", stats.completion_rate),
        stats,
        members,
    })
}

/// Display the edit form for a tenant.
pub async fn edit_page(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<TenantEditTemplate> {
    let detail = TenantService::new(state.pool())
        .get(TenantId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("Organization not found".to_string()))?;

    Ok(TenantEditTemplate {
        tenant_id: id,
        errors: Vec::new(),
        old: TenantFormView::from_tenant(&detail.tenant),
    })
}

/// Update a tenant, re-rendering the form on validation failure or
/// slug/domain conflict.
#[tracing::instrument(skip_all, fields(tenant_id = %id))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    axum::extract::Form(form): axum::extract::Form<TenantForm>,
) -> Result<Response> {
    let patch = match form.validate_update() {
        Ok(patch) => patch,
        Err(errors) => {
            let page = TenantEditTemplate {
                tenant_id: id,
                errors,
                old: TenantFormView::from_form(&form),
            };
            return Ok(page.into_response());
        }
    };

    match TenantService::new(state.pool())
        .update(TenantId::new(id), &patch)
        .await
    {
        Ok(_) => Ok(Redirect::to("/admin/tenants").into_response()),
        Err(TenantServiceError::Repository(RepositoryError::NotFound)) => {
            Err(AppError::NotFound("Organization not found".to_string()))
        }
        Err(TenantServiceError::Repository(RepositoryError::Conflict(message))) => {
            let page = TenantEditTemplate {
                tenant_id: id,
                errors: vec![FieldError {
                    field: "slug",
                    message,
                }],
                old: TenantFormView::from_form(&form),
            };
            Ok(page.into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Delete a tenant; its config, users, and tasks cascade.
#[tracing::instrument(skip_all, fields(tenant_id = %id))]
pub async fn destroy(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Redirect> {
    TenantService::new(state.pool())
        .delete(TenantId::new(id))
        .await
        .map_err(|e| match e {
            TenantServiceError::Repository(RepositoryError::NotFound) => {
                AppError::NotFound("Organization not found".to_string())
            }
            other => other.into(),
        })?;

    Ok(Redirect::to("/admin/tenants"))
}
