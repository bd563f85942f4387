//! Shared fixtures for router tests.
//!
//! Each test gets its own in-memory SQLite database with the migrations
//! applied, wrapped in an [`AppState`] the real router runs against.

#![allow(clippy::unwrap_used, dead_code)]

use std::str::FromStr;

use axum::body::Body;
use axum::http::{Request, header};
use axum::response::Response;
use http_body_util::BodyExt;
use secrecy::SecretString;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tower::ServiceExt;

use taskhub_core::{DomainName, Email, Slug, TaskStatus, TenantId, UserRole};
use taskhub_server::config::ServerConfig;
use taskhub_server::db::tasks::TaskRepository;
use taskhub_server::db::tenants::TenantRepository;
use taskhub_server::db::users::{NewUser, UserRepository};
use taskhub_server::models::task::{NewTask, Task};
use taskhub_server::models::tenant::{NewTenant, Tenant, TenantConfigPatch};
use taskhub_server::models::user::User;
use taskhub_server::routes;
use taskhub_server::state::AppState;

/// Build an [`AppState`] over a fresh in-memory database.
///
/// A single connection keeps every query on the same in-memory database;
/// with more, each pooled connection would see its own empty one.
pub async fn state(fallback_slug: Option<&str>) -> AppState {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap();

    taskhub_server::db::run_migrations(&pool).await.unwrap();

    let config = ServerConfig {
        database_url: SecretString::from("sqlite::memory:"),
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        base_url: "http://localhost".to_string(),
        tenant_fallback_slug: fallback_slug.map(str::to_owned),
        sentry_dsn: None,
    };

    AppState::new(config, pool)
}

/// Run one request through the full application router.
pub async fn send(state: &AppState, request: Request<Body>) -> Response {
    routes::router(state.clone()).oneshot(request).await.unwrap()
}

pub async fn body_string(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn get_with_host(uri: &str, host: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::HOST, host)
        .body(Body::empty())
        .unwrap()
}

pub fn form(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_owned()))
        .unwrap()
}

pub fn json(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn create_tenant(
    state: &AppState,
    name: &str,
    slug: &str,
    domain: Option<&str>,
) -> Tenant {
    let data = NewTenant {
        name: name.to_owned(),
        slug: Slug::parse(slug).unwrap(),
        domain: domain.map(|d| DomainName::parse(d).unwrap()),
        config: TenantConfigPatch::default(),
    };
    TenantRepository::new(state.pool())
        .create(&data)
        .await
        .unwrap()
}

pub async fn create_user(
    state: &AppState,
    tenant_id: TenantId,
    email: &str,
    role: UserRole,
) -> User {
    let data = NewUser {
        tenant_id,
        name: "Test User".to_owned(),
        email: Email::parse(email).unwrap(),
        password_hash: "$argon2id$test-only$not-a-real-hash".to_owned(),
        role,
    };
    UserRepository::new(state.pool()).create(&data).await.unwrap()
}

pub async fn create_task(
    state: &AppState,
    tenant_id: TenantId,
    user: &User,
    title: &str,
    status: TaskStatus,
) -> Task {
    let data = NewTask {
        title: title.to_owned(),
        status: Some(status),
        ..NewTask::default()
    };
    TaskRepository::new(state.pool(), tenant_id)
        .create(user.id, &data)
        .await
        .unwrap()
}
