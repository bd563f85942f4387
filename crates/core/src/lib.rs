//! TaskHub Core - Shared types library.
//!
//! This crate provides common types used across all TaskHub components:
//! - `server` - Multi-tenant web application (tenant app + admin console)
//! - `integration-tests` - End-to-end tests against a running server
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP.
//! Validation rules live here as parse types (`Slug::parse`, `HexColor::parse`,
//! ...) so that an invalid value cannot exist past the boundary.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, slugs, emails, colors,
//!   domains, and the task/user enumerations

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
