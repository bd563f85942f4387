//! TaskHub server library.
//!
//! Multi-tenant task management: tenants resolved per request by domain or
//! URL slug, server-rendered task pages, and a cross-tenant admin console.
//! Exposed as a library so the router can be exercised in tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod forms;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
