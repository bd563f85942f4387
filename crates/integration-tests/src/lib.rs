//! Integration tests for TaskHub.
//!
//! These tests run against a live server instead of an in-process router,
//! so they are `#[ignore]`d by default.
//!
//! # Running Tests
//!
//! ```bash
//! # Seed a local database and start the server
//! cargo run -p taskhub-server --bin seed
//! cargo run -p taskhub-server &
//!
//! # Run the ignored integration tests against it
//! cargo test -p taskhub-integration-tests -- --ignored
//! ```
//!
//! The target server is configurable via `TASKHUB_BASE_URL`
//! (default: `http://localhost:3000`). The server should be started with
//! `TENANT_FALLBACK_SLUG` set so plain `localhost` requests resolve.
//!
//! # Test Categories
//!
//! - `tasks_flow` - Tenant task pages and the JSON status endpoint
//! - `admin_tenants` - Admin console tenant management
