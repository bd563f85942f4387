//! Demo-data seeder.
//!
//! Wipes the database and creates three demo tenants, each with an admin
//! user, a regular user (argon2-hashed passwords), and five sample tasks.
//!
//! Run with: `cargo run -p taskhub-server --bin seed`

#![cfg_attr(not(test), forbid(unsafe_code))]

use chrono::{Duration, Utc};

use taskhub_core::{
    DomainName, Email, HexColor, Slug, TaskPriority, TaskStatus, TenantId, UserId, UserRole,
};
use taskhub_server::config::ServerConfig;
use taskhub_server::db;
use taskhub_server::db::tasks::TaskRepository;
use taskhub_server::db::tenants::TenantRepository;
use taskhub_server::db::users::{NewUser, UserRepository};
use taskhub_server::models::task::NewTask;
use taskhub_server::models::tenant::{NewTenant, TenantConfigPatch};
use taskhub_server::services::tenants::hash_password;

struct DemoTenant {
    name: &'static str,
    slug: &'static str,
    domain: &'static str,
    primary_color: &'static str,
    secondary_color: &'static str,
    company_name: &'static str,
    company_email: &'static str,
    company_phone: &'static str,
    company_address: &'static str,
}

const DEMO_TENANTS: &[DemoTenant] = &[
    DemoTenant {
        name: "Acme Corp",
        slug: "acme-corp",
        domain: "acme.localhost",
        primary_color: "#3b82f6",
        secondary_color: "#1d4ed8",
        company_name: "Acme Corporation",
        company_email: "contact@acme.example",
        company_phone: "+1 555 0100",
        company_address: "100 Main St, Springfield",
    },
    DemoTenant {
        name: "Startup XYZ",
        slug: "startup-xyz",
        domain: "xyz.localhost",
        primary_color: "#10b981",
        secondary_color: "#059669",
        company_name: "Startup XYZ",
        company_email: "hello@startupxyz.example",
        company_phone: "+1 555 0200",
        company_address: "1000 Market Ave, Metropolis",
    },
    DemoTenant {
        name: "Tech Consulting",
        slug: "tech-consulting",
        domain: "tech.localhost",
        primary_color: "#f59e0b",
        secondary_color: "#d97706",
        company_name: "Tech Consulting Ltd",
        company_email: "info@techconsulting.example",
        company_phone: "+1 555 0300",
        company_address: "456 Technology Rd, Gotham",
    },
];

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seed=info".into()),
        )
        .init();

    let config = ServerConfig::from_env().expect("Failed to load configuration");
    let pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");
    db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    // Wipe in dependency order; cascades would cover it, but being explicit
    // keeps the seeder usable on databases with foreign keys off.
    for table in ["tasks", "users", "tenant_configs", "tenants"] {
        sqlx::query(&format!("DELETE FROM {table}"))
            .execute(&pool)
            .await
            .expect("Failed to clear table");
    }
    tracing::info!("Existing data cleared");

    let tenants = TenantRepository::new(&pool);
    let users = UserRepository::new(&pool);

    for demo in DEMO_TENANTS {
        let tenant = tenants
            .create(&NewTenant {
                name: demo.name.to_owned(),
                slug: Slug::parse(demo.slug).expect("invalid demo slug"),
                domain: Some(DomainName::parse(demo.domain).expect("invalid demo domain")),
                config: TenantConfigPatch {
                    primary_color: Some(
                        HexColor::parse(demo.primary_color).expect("invalid demo color"),
                    ),
                    secondary_color: Some(
                        HexColor::parse(demo.secondary_color).expect("invalid demo color"),
                    ),
                    company_name: Some(demo.company_name.to_owned()),
                    company_email: Some(demo.company_email.to_owned()),
                    company_phone: Some(demo.company_phone.to_owned()),
                    company_address: Some(demo.company_address.to_owned()),
                    ..TenantConfigPatch::default()
                },
            })
            .await
            .expect("Failed to create tenant");

        let admin = create_user(
            &users,
            tenant.id,
            "Administrator",
            "admin@example.com",
            "admin123",
            UserRole::Admin,
        )
        .await;
        let member = create_user(
            &users,
            tenant.id,
            "Regular User",
            "user@example.com",
            "user123",
            UserRole::User,
        )
        .await;

        seed_tasks(&pool, tenant.id, admin, member).await;

        tracing::info!(slug = %tenant.slug, "tenant seeded");
    }

    tracing::info!("Seed complete");
}

async fn create_user(
    users: &UserRepository<'_>,
    tenant_id: TenantId,
    name: &str,
    email: &str,
    password: &str,
    role: UserRole,
) -> UserId {
    let user = users
        .create(&NewUser {
            tenant_id,
            name: name.to_owned(),
            email: Email::parse(email).expect("invalid demo email"),
            password_hash: hash_password(password).expect("Failed to hash password"),
            role,
        })
        .await
        .expect("Failed to create user");
    user.id
}

async fn seed_tasks(pool: &sqlx::SqlitePool, tenant_id: TenantId, admin: UserId, member: UserId) {
    let tasks = TaskRepository::new(pool, tenant_id);
    let now = Utc::now();

    let samples = [
        (
            admin,
            "Set up development environment",
            "Install and configure the tooling for the project",
            2,
            TaskStatus::InProgress,
            TaskPriority::High,
            vec!["development", "setup"],
        ),
        (
            member,
            "Review API documentation",
            "Update and improve the REST API documentation",
            5,
            TaskStatus::Pending,
            TaskPriority::Medium,
            vec!["documentation", "api"],
        ),
        (
            admin,
            "Implement unit tests",
            "Cover the main components with tests",
            3,
            TaskStatus::Completed,
            TaskPriority::High,
            vec!["tests", "quality"],
        ),
        (
            member,
            "Optimize database performance",
            "Analyze and tune the slowest queries",
            7,
            TaskStatus::Pending,
            TaskPriority::Urgent,
            vec!["performance", "database"],
        ),
        (
            admin,
            "Prepare client presentation",
            "Build slides and material for the project walkthrough",
            1,
            TaskStatus::InProgress,
            TaskPriority::Medium,
            vec!["presentation", "client"],
        ),
    ];

    for (owner, title, description, days, status, priority, tags) in samples {
        tasks
            .create(
                owner,
                &NewTask {
                    title: title.to_owned(),
                    description: Some(description.to_owned()),
                    due_date: Some(now + Duration::days(days)),
                    status: Some(status),
                    priority: Some(priority),
                    tags: Some(tags.into_iter().map(str::to_owned).collect()),
                },
            )
            .await
            .expect("Failed to create task");
    }
}
