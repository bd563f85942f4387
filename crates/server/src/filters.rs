//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Lowercases a status/priority label and replaces underscores with hyphens,
/// for use as a CSS class.
///
/// Usage in templates: `{{ task.status|css_label }}`
#[askama::filter_fn]
pub fn css_label(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(value.to_string().to_lowercase().replace('_', "-"))
}
