//! Core types for TaskHub.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod color;
pub mod domain;
pub mod email;
pub mod id;
pub mod slug;
pub mod status;

pub use color::{HexColor, HexColorError};
pub use domain::{DomainName, DomainNameError};
pub use email::{Email, EmailError};
pub use id::*;
pub use slug::{Slug, SlugError};
pub use status::{TaskPriority, TaskStatus, UserRole};
