//! Task pages and the JSON status toggle, exercised through the full router.

#![allow(clippy::unwrap_used)]

mod common;

use axum::http::StatusCode;
use serde_json::json;

use taskhub_core::{TaskStatus, TenantId, UserRole};
use taskhub_server::db::tasks::TaskRepository;
use taskhub_server::models::user::User;
use taskhub_server::state::AppState;

/// A state resolving every request to one seeded tenant with one user.
async fn seeded_state() -> (AppState, TenantId, User) {
    let state = common::state(Some("acme")).await;
    let tenant = common::create_tenant(&state, "Acme Corp", "acme", None).await;
    let user = common::create_user(&state, tenant.id, "user@acme.test", UserRole::User).await;
    (state, tenant.id, user)
}

#[tokio::test]
async fn listing_shows_the_tenants_tasks() {
    let (state, tenant_id, user) = seeded_state().await;
    common::create_task(&state, tenant_id, &user, "Write the report", TaskStatus::Pending).await;
    common::create_task(&state, tenant_id, &user, "Review the budget", TaskStatus::Completed)
        .await;

    let response = common::send(&state, common::get("/tasks")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_string(response).await;
    assert!(body.contains("Write the report"));
    assert!(body.contains("Review the budget"));
}

#[tokio::test]
async fn listing_filters_by_status() {
    let (state, tenant_id, user) = seeded_state().await;
    common::create_task(&state, tenant_id, &user, "Write the report", TaskStatus::Pending).await;
    common::create_task(&state, tenant_id, &user, "Review the budget", TaskStatus::Completed)
        .await;

    let response = common::send(&state, common::get("/tasks?status=COMPLETED")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_string(response).await;
    assert!(body.contains("Review the budget"));
    assert!(!body.contains("Write the report"));
}

#[tokio::test]
async fn unknown_status_filter_shows_everything() {
    let (state, tenant_id, user) = seeded_state().await;
    common::create_task(&state, tenant_id, &user, "Write the report", TaskStatus::Pending).await;
    common::create_task(&state, tenant_id, &user, "Review the budget", TaskStatus::Completed)
        .await;

    let response = common::send(&state, common::get("/tasks?status=DONE")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_string(response).await;
    assert!(body.contains("Write the report"));
    assert!(body.contains("Review the budget"));
}

#[tokio::test]
async fn create_task_redirects_to_the_listing() {
    let (state, tenant_id, _user) = seeded_state().await;

    let response = common::send(
        &state,
        common::form(
            "POST",
            "/tasks",
            "title=Ship+the+release&priority=HIGH&tags=release,+ops",
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()["location"], "/tasks");

    let tasks = TaskRepository::new(state.pool(), tenant_id)
        .list(None)
        .await
        .unwrap();
    assert_eq!(tasks.len(), 1);
    let task = &tasks[0].task;
    assert_eq!(task.title, "Ship the release");
    assert_eq!(task.status, TaskStatus::Pending);
    assert_eq!(task.tags, vec!["release".to_string(), "ops".to_string()]);
}

#[tokio::test]
async fn create_task_with_only_a_title_uses_defaults() {
    let (state, tenant_id, _user) = seeded_state().await;

    let response =
        common::send(&state, common::form("POST", "/tasks", "title=Plain+task")).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let tasks = TaskRepository::new(state.pool(), tenant_id)
        .list(None)
        .await
        .unwrap();
    let task = &tasks[0].task;
    assert_eq!(task.status, TaskStatus::Pending);
    assert_eq!(task.priority, taskhub_core::TaskPriority::Medium);
    assert!(task.tags.is_empty());
    assert!(task.description.is_none());
    assert!(task.due_date.is_none());
}

#[tokio::test]
async fn create_task_with_missing_title_rerenders_the_form() {
    let (state, tenant_id, _user) = seeded_state().await;

    let response =
        common::send(&state, common::form("POST", "/tasks", "title=&priority=HIGH")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_string(response).await;
    assert!(body.contains("Title must be between 1 and 100 characters"));

    let tasks = TaskRepository::new(state.pool(), tenant_id)
        .list(None)
        .await
        .unwrap();
    assert!(tasks.is_empty());
}

#[tokio::test]
async fn update_task_merges_only_the_sent_fields() {
    let (state, tenant_id, user) = seeded_state().await;
    let task =
        common::create_task(&state, tenant_id, &user, "Write the report", TaskStatus::Pending)
            .await;

    let response = common::send(
        &state,
        common::form(
            "PUT",
            &format!("/tasks/{}", task.id.as_i64()),
            "title=Write+the+final+report",
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let updated = TaskRepository::new(state.pool(), tenant_id)
        .get(task.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.title, "Write the final report");
    assert_eq!(updated.status, TaskStatus::Pending);
}

#[tokio::test]
async fn update_task_with_an_empty_tags_field_clears_them() {
    let (state, tenant_id, _user) = seeded_state().await;

    let response = common::send(
        &state,
        common::form("POST", "/tasks", "title=Ship+the+release&tags=release,+ops"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let repo = TaskRepository::new(state.pool(), tenant_id);
    let task_id = repo.list(None).await.unwrap()[0].task.id;

    let response = common::send(
        &state,
        common::form("PUT", &format!("/tasks/{}", task_id.as_i64()), "tags="),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let updated = repo.get(task_id).await.unwrap().unwrap();
    assert_eq!(updated.title, "Ship the release");
    assert!(updated.tags.is_empty());
}

#[tokio::test]
async fn delete_task_removes_it() {
    let (state, tenant_id, user) = seeded_state().await;
    let task =
        common::create_task(&state, tenant_id, &user, "Write the report", TaskStatus::Pending)
            .await;

    let response = common::send(
        &state,
        common::form("DELETE", &format!("/tasks/{}", task.id.as_i64()), ""),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let gone = TaskRepository::new(state.pool(), tenant_id)
        .get(task.id)
        .await
        .unwrap();
    assert!(gone.is_none());
}

#[tokio::test]
async fn status_toggle_returns_the_updated_task() {
    let (state, tenant_id, user) = seeded_state().await;
    let task =
        common::create_task(&state, tenant_id, &user, "Write the report", TaskStatus::Pending)
            .await;

    let response = common::send(
        &state,
        common::json(
            "PATCH",
            &format!("/tasks/{}/status", task.id.as_i64()),
            json!({ "status": "COMPLETED" }),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value =
        serde_json::from_str(&common::body_string(response).await).unwrap();
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["task"]["status"], json!("COMPLETED"));
}

#[tokio::test]
async fn status_toggle_rejects_an_unknown_status() {
    let (state, tenant_id, user) = seeded_state().await;
    let task =
        common::create_task(&state, tenant_id, &user, "Write the report", TaskStatus::Pending)
            .await;

    let response = common::send(
        &state,
        common::json(
            "PATCH",
            &format!("/tasks/{}/status", task.id.as_i64()),
            json!({ "status": "DONE" }),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value =
        serde_json::from_str(&common::body_string(response).await).unwrap();
    assert_eq!(body["error"], json!("Invalid status"));
}

#[tokio::test]
async fn status_toggle_on_a_missing_task_is_404() {
    let (state, _tenant_id, _user) = seeded_state().await;

    let response = common::send(
        &state,
        common::json("PATCH", "/tasks/999/status", json!({ "status": "COMPLETED" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value =
        serde_json::from_str(&common::body_string(response).await).unwrap();
    assert_eq!(body["error"], json!("Task not found"));
}

#[tokio::test]
async fn tasks_never_leak_across_tenants() {
    let (state, _acme_id, _acme_user) = seeded_state().await;
    let other = common::create_tenant(&state, "Other Co", "other", Some("other.localhost")).await;
    let other_user =
        common::create_user(&state, other.id, "user@other.test", UserRole::User).await;
    let secret = common::create_task(
        &state,
        other.id,
        &other_user,
        "Confidential roadmap",
        TaskStatus::Pending,
    )
    .await;

    // The request resolves to the fallback tenant (acme); the other tenant's
    // task id must behave like a missing task.
    let edit = common::send(
        &state,
        common::get(&format!("/tasks/{}/edit", secret.id.as_i64())),
    )
    .await;
    assert_eq!(edit.status(), StatusCode::NOT_FOUND);

    let toggle = common::send(
        &state,
        common::json(
            "PATCH",
            &format!("/tasks/{}/status", secret.id.as_i64()),
            json!({ "status": "COMPLETED" }),
        ),
    )
    .await;
    assert_eq!(toggle.status(), StatusCode::NOT_FOUND);

    let listing = common::send(&state, common::get("/tasks")).await;
    let body = common::body_string(listing).await;
    assert!(!body.contains("Confidential roadmap"));
}

#[tokio::test]
async fn tenant_without_users_redirects_to_login() {
    let state = common::state(Some("acme")).await;
    common::create_tenant(&state, "Acme Corp", "acme", None).await;

    let response = common::send(&state, common::get("/tasks")).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()["location"], "/auth/login");
}
