//! Task route handlers (tenant-scoped).

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use serde_json::json;

use taskhub_core::{TaskId, TaskStatus};

use crate::db::RepositoryError;
use crate::error::{AppError, Result};
use crate::filters;
use crate::forms::{FieldError, TaskForm};
use crate::middleware::{CurrentTenant, RequireUser};
use crate::models::task::{Task, TaskWithOwner};
use crate::models::tenant::Tenant;
use crate::services::TaskService;
use crate::state::AppState;

/// Tenant branding data for templates.
#[derive(Clone)]
pub struct TenantView {
    pub name: String,
    pub slug: String,
    pub primary_color: String,
    pub secondary_color: String,
    pub company_name: Option<String>,
}

impl TenantView {
    fn from_tenant(tenant: &Tenant) -> Self {
        Self {
            name: tenant.name.clone(),
            slug: tenant.slug.as_str().to_owned(),
            primary_color: tenant.config.primary_color.clone(),
            secondary_color: tenant.config.secondary_color.clone(),
            company_name: tenant.config.company_name.clone(),
        }
    }
}

/// Task display data for templates.
#[derive(Clone)]
pub struct TaskView {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub status: String,
    pub priority: String,
    pub tags: Vec<String>,
    pub owner_name: String,
    pub owner_email: String,
    pub created_at: String,
}

impl TaskView {
    fn from_task(task: &TaskWithOwner) -> Self {
        Self {
            id: task.task.id.as_i64(),
            title: task.task.title.clone(),
            description: task.task.description.clone(),
            due_date: task.task.due_date.map(|d| d.format("%b %-d, %Y").to_string()),
            status: task.task.status.as_str().to_owned(),
            priority: task.task.priority.as_str().to_owned(),
            tags: task.task.tags.clone(),
            owner_name: task.user.name.clone(),
            owner_email: task.user.email.clone(),
            created_at: task.task.created_at.format("%b %-d, %Y").to_string(),
        }
    }
}

/// Form values echoed back into the task form on re-render.
#[derive(Clone, Default)]
pub struct TaskFormView {
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub status: String,
    pub priority: String,
    pub tags: String,
}

impl TaskFormView {
    fn from_form(form: &TaskForm) -> Self {
        Self {
            title: form.title.clone().unwrap_or_default(),
            description: form.description.clone().unwrap_or_default(),
            due_date: form.due_date.clone().unwrap_or_default(),
            status: form.status.clone().unwrap_or_default(),
            priority: form.priority.clone().unwrap_or_default(),
            tags: form.tags.clone().unwrap_or_default(),
        }
    }

    fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            due_date: task
                .due_date
                .map(|d| d.format("%Y-%m-%dT%H:%M").to_string())
                .unwrap_or_default(),
            status: task.status.as_str().to_owned(),
            priority: task.priority.as_str().to_owned(),
            tags: task.tags.join(", "),
        }
    }
}

/// Status filter query parameters.
#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub status: Option<String>,
}

/// A `<select>`/filter option with its selected state precomputed.
#[derive(Clone)]
pub struct SelectOption {
    pub value: String,
    pub selected: bool,
}

fn status_options(selected: &str) -> Vec<SelectOption> {
    TaskStatus::ALL
        .iter()
        .map(|s| SelectOption {
            value: s.as_str().to_owned(),
            selected: s.as_str() == selected,
        })
        .collect()
}

fn priority_options(selected: &str) -> Vec<SelectOption> {
    taskhub_core::TaskPriority::ALL
        .iter()
        .map(|p| SelectOption {
            value: p.as_str().to_owned(),
            selected: p.as_str() == selected,
        })
        .collect()
}

/// Task listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "tasks/index.html")]
pub struct TasksIndexTemplate {
    pub tenant: TenantView,
    pub tasks: Vec<TaskView>,
    pub current_status: String,
    pub statuses: Vec<SelectOption>,
}

/// New task form template.
#[derive(Template, WebTemplate)]
#[template(path = "tasks/create.html")]
pub struct TaskCreateTemplate {
    pub tenant: TenantView,
    pub errors: Vec<FieldError>,
    pub old: TaskFormView,
    pub statuses: Vec<SelectOption>,
    pub priorities: Vec<SelectOption>,
}

/// Edit task form template.
#[derive(Template, WebTemplate)]
#[template(path = "tasks/edit.html")]
pub struct TaskEditTemplate {
    pub tenant: TenantView,
    pub task_id: i64,
    pub errors: Vec<FieldError>,
    pub old: TaskFormView,
    pub statuses: Vec<SelectOption>,
    pub priorities: Vec<SelectOption>,
}

/// Display the task listing, optionally filtered by status.
pub async fn index(
    State(state): State<AppState>,
    Extension(tenant): Extension<CurrentTenant>,
    RequireUser(_user): RequireUser,
    Query(query): Query<StatusQuery>,
) -> Result<TasksIndexTemplate> {
    // An unknown status filter shows everything rather than erroring.
    let status = query
        .status
        .as_deref()
        .and_then(|s| s.parse::<TaskStatus>().ok());

    let tasks = TaskService::new(state.pool(), tenant.0.id)
        .list(status)
        .await?;

    let current_status = status.map(|s| s.as_str().to_owned()).unwrap_or_default();

    Ok(TasksIndexTemplate {
        tenant: TenantView::from_tenant(&tenant.0),
        tasks: tasks.iter().map(TaskView::from_task).collect(),
        statuses: status_options(&current_status),
        current_status,
    })
}

/// Display the new task form.
pub async fn create_page(
    Extension(tenant): Extension<CurrentTenant>,
    RequireUser(_user): RequireUser,
) -> TaskCreateTemplate {
    TaskCreateTemplate {
        tenant: TenantView::from_tenant(&tenant.0),
        errors: Vec::new(),
        old: TaskFormView::default(),
        statuses: status_options(""),
        priorities: priority_options(""),
    }
}

/// Create a task, re-rendering the form on validation failure.
#[tracing::instrument(skip_all, fields(tenant_id = %tenant.0.id))]
pub async fn store(
    State(state): State<AppState>,
    Extension(tenant): Extension<CurrentTenant>,
    RequireUser(user): RequireUser,
    axum::extract::Form(form): axum::extract::Form<TaskForm>,
) -> Result<Response> {
    let data = match form.validate_create() {
        Ok(data) => data,
        Err(errors) => {
            let old = TaskFormView::from_form(&form);
            let page = TaskCreateTemplate {
                tenant: TenantView::from_tenant(&tenant.0),
                errors,
                statuses: status_options(&old.status),
                priorities: priority_options(&old.priority),
                old,
            };
            return Ok(page.into_response());
        }
    };

    TaskService::new(state.pool(), tenant.0.id)
        .create(user.id, &data)
        .await?;

    Ok(Redirect::to("/tasks").into_response())
}

/// Display the edit form for a task.
pub async fn edit_page(
    State(state): State<AppState>,
    Extension(tenant): Extension<CurrentTenant>,
    RequireUser(_user): RequireUser,
    Path(id): Path<i64>,
) -> Result<TaskEditTemplate> {
    let task = TaskService::new(state.pool(), tenant.0.id)
        .get(TaskId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".to_string()))?;

    let old = TaskFormView::from_task(&task);

    Ok(TaskEditTemplate {
        tenant: TenantView::from_tenant(&tenant.0),
        task_id: id,
        errors: Vec::new(),
        statuses: status_options(&old.status),
        priorities: priority_options(&old.priority),
        old,
    })
}

/// Update a task, re-rendering the form on validation failure.
#[tracing::instrument(skip_all, fields(tenant_id = %tenant.0.id, task_id = %id))]
pub async fn update(
    State(state): State<AppState>,
    Extension(tenant): Extension<CurrentTenant>,
    RequireUser(_user): RequireUser,
    Path(id): Path<i64>,
    axum::extract::Form(form): axum::extract::Form<TaskForm>,
) -> Result<Response> {
    let patch = match form.validate_update() {
        Ok(patch) => patch,
        Err(errors) => {
            let old = TaskFormView::from_form(&form);
            let page = TaskEditTemplate {
                tenant: TenantView::from_tenant(&tenant.0),
                task_id: id,
                errors,
                statuses: status_options(&old.status),
                priorities: priority_options(&old.priority),
                old,
            };
            return Ok(page.into_response());
        }
    };

    TaskService::new(state.pool(), tenant.0.id)
        .update(TaskId::new(id), &patch)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("Task not found".to_string()),
            other => other.into(),
        })?;

    Ok(Redirect::to("/tasks").into_response())
}

/// Delete a task.
#[tracing::instrument(skip_all, fields(tenant_id = %tenant.0.id, task_id = %id))]
pub async fn destroy(
    State(state): State<AppState>,
    Extension(tenant): Extension<CurrentTenant>,
    RequireUser(_user): RequireUser,
    Path(id): Path<i64>,
) -> Result<Redirect> {
    TaskService::new(state.pool(), tenant.0.id)
        .delete(TaskId::new(id))
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("Task not found".to_string()),
            other => other.into(),
        })?;

    Ok(Redirect::to("/tasks"))
}

/// JSON body for the status toggle endpoint.
#[derive(Debug, Deserialize)]
pub struct StatusPayload {
    pub status: String,
}

/// Toggle a task's status. JSON in, JSON out.
#[tracing::instrument(skip_all, fields(tenant_id = %tenant.0.id, task_id = %id))]
pub async fn update_status(
    State(state): State<AppState>,
    Extension(tenant): Extension<CurrentTenant>,
    RequireUser(_user): RequireUser,
    Path(id): Path<i64>,
    Json(payload): Json<StatusPayload>,
) -> Response {
    let Ok(status) = payload.status.parse::<TaskStatus>() else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Invalid status" })),
        )
            .into_response();
    };

    match TaskService::new(state.pool(), tenant.0.id)
        .update_status(TaskId::new(id), status)
        .await
    {
        Ok(task) => Json(json!({ "success": true, "task": task })).into_response(),
        Err(RepositoryError::NotFound) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Task not found" })),
        )
            .into_response(),
        Err(e) => {
            let event_id = sentry::capture_error(&e);
            tracing::error!(error = %e, sentry_event_id = %event_id, "status toggle failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal server error" })),
            )
                .into_response()
        }
    }
}
