//! Form payloads and field validation.
//!
//! Handlers deserialize the raw form, call `validate_*`, and either pass the
//! validated data to a service or re-render the form with the error list and
//! the submitted values preserved. Empty form strings normalize to "absent".

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;

use taskhub_core::{DomainName, HexColor, Slug, TaskPriority, TaskStatus};

use crate::models::task::{NewTask, TaskPatch};
use crate::models::tenant::{NewTenant, TenantConfigPatch, TenantPatch};

const TITLE_MAX: usize = 100;
const DESCRIPTION_MAX: usize = 500;
const NAME_MIN: usize = 2;
const NAME_MAX: usize = 100;
const MAX_TASKS_MIN: i64 = 1;
const MAX_TASKS_MAX: i64 = 1000;

/// A single validation failure, rendered in the form's error list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Raw task form as submitted by the browser.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    /// Comma-separated tag list.
    pub tags: Option<String>,
}

impl TaskForm {
    /// Validate for creation. Title is required; everything else falls back
    /// to the documented defaults.
    ///
    /// # Errors
    ///
    /// Returns every failed field, not just the first.
    pub fn validate_create(&self) -> Result<NewTask, Vec<FieldError>> {
        let mut errors = Vec::new();

        let title = match non_empty(self.title.as_deref()) {
            Some(title) if title.chars().count() <= TITLE_MAX => Some(title),
            _ => {
                errors.push(FieldError::new(
                    "title",
                    format!("Title must be between 1 and {TITLE_MAX} characters"),
                ));
                None
            }
        };

        let (description, due_date, status, priority, tags) =
            self.validate_common(&mut errors);

        if errors.is_empty() {
            Ok(NewTask {
                title: title.unwrap_or_default(),
                description,
                due_date,
                status,
                priority,
                tags,
            })
        } else {
            Err(errors)
        }
    }

    /// Validate for update. All fields optional; absent fields are left
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns every failed field, not just the first.
    pub fn validate_update(&self) -> Result<TaskPatch, Vec<FieldError>> {
        let mut errors = Vec::new();

        let title = non_empty(self.title.as_deref());
        if let Some(t) = &title
            && t.chars().count() > TITLE_MAX
        {
            errors.push(FieldError::new(
                "title",
                format!("Title must be between 1 and {TITLE_MAX} characters"),
            ));
        }

        let (description, due_date, status, priority, _) = self.validate_common(&mut errors);

        // A submitted-but-empty tags field clears the list; an absent field
        // leaves it unchanged.
        let tags = self.tags.as_deref().map(split_tags);

        if errors.is_empty() {
            Ok(TaskPatch {
                title,
                description,
                due_date,
                status,
                priority,
                tags,
            })
        } else {
            Err(errors)
        }
    }

    #[allow(clippy::type_complexity)]
    fn validate_common(
        &self,
        errors: &mut Vec<FieldError>,
    ) -> (
        Option<String>,
        Option<DateTime<Utc>>,
        Option<TaskStatus>,
        Option<TaskPriority>,
        Option<Vec<String>>,
    ) {
        let description = non_empty(self.description.as_deref());
        if let Some(d) = &description
            && d.chars().count() > DESCRIPTION_MAX
        {
            errors.push(FieldError::new(
                "description",
                format!("Description must be at most {DESCRIPTION_MAX} characters"),
            ));
        }

        let due_date = match non_empty(self.due_date.as_deref()) {
            Some(raw) => match parse_due_date(&raw) {
                Some(dt) => Some(dt),
                None => {
                    errors.push(FieldError::new("due_date", "Due date must be a valid date"));
                    None
                }
            },
            None => None,
        };

        let status = match non_empty(self.status.as_deref()) {
            Some(raw) => match raw.parse::<TaskStatus>() {
                Ok(status) => Some(status),
                Err(_) => {
                    errors.push(FieldError::new(
                        "status",
                        "Status must be PENDING, IN_PROGRESS or COMPLETED",
                    ));
                    None
                }
            },
            None => None,
        };

        let priority = match non_empty(self.priority.as_deref()) {
            Some(raw) => match raw.parse::<TaskPriority>() {
                Ok(priority) => Some(priority),
                Err(_) => {
                    errors.push(FieldError::new(
                        "priority",
                        "Priority must be LOW, MEDIUM, HIGH or URGENT",
                    ));
                    None
                }
            },
            None => None,
        };

        let tags = non_empty(self.tags.as_deref()).map(|raw| split_tags(&raw));

        (description, due_date, status, priority, tags)
    }
}

/// Raw tenant form as submitted by the admin console (flat fields; the
/// config fields are prefixed to keep the form one level deep).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TenantForm {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub domain: Option<String>,
    pub is_active: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub logo_url: Option<String>,
    pub company_name: Option<String>,
    pub company_email: Option<String>,
    pub company_phone: Option<String>,
    pub company_address: Option<String>,
    pub allow_registration: Option<String>,
    pub max_tasks_per_user: Option<String>,
    pub allow_task_comments: Option<String>,
}

impl TenantForm {
    /// Validate for creation. Name and slug are required.
    ///
    /// # Errors
    ///
    /// Returns every failed field, not just the first.
    pub fn validate_create(&self) -> Result<NewTenant, Vec<FieldError>> {
        let mut errors = Vec::new();

        let name = self.validate_name(true, &mut errors);
        let slug = self.validate_slug(true, &mut errors);
        let domain = self.validate_domain(&mut errors);
        let config = self.validate_config(&mut errors);

        // An empty error list implies both required fields are present.
        match (name, slug) {
            (Some(name), Some(slug)) if errors.is_empty() => Ok(NewTenant {
                name,
                slug,
                domain,
                config,
            }),
            _ => Err(errors),
        }
    }

    /// Validate for update. All fields optional.
    ///
    /// # Errors
    ///
    /// Returns every failed field, not just the first.
    pub fn validate_update(&self) -> Result<TenantPatch, Vec<FieldError>> {
        let mut errors = Vec::new();

        let name = self.validate_name(false, &mut errors);
        let slug = self.validate_slug(false, &mut errors);
        let domain = self.validate_domain(&mut errors);
        let is_active = non_empty(self.is_active.as_deref()).map(|v| checkbox_value(&v));
        let config = self.validate_config(&mut errors);

        if errors.is_empty() {
            Ok(TenantPatch {
                name,
                slug,
                domain,
                is_active,
                config: Some(config),
            })
        } else {
            Err(errors)
        }
    }

    fn validate_name(&self, required: bool, errors: &mut Vec<FieldError>) -> Option<String> {
        let message = format!("Name must be between {NAME_MIN} and {NAME_MAX} characters");
        match non_empty(self.name.as_deref()) {
            Some(name) => {
                let len = name.chars().count();
                if (NAME_MIN..=NAME_MAX).contains(&len) {
                    Some(name)
                } else {
                    errors.push(FieldError::new("name", message));
                    None
                }
            }
            None => {
                if required {
                    errors.push(FieldError::new("name", message));
                }
                None
            }
        }
    }

    fn validate_slug(&self, required: bool, errors: &mut Vec<FieldError>) -> Option<Slug> {
        match non_empty(self.slug.as_deref()) {
            Some(raw) => match Slug::parse(&raw) {
                Ok(slug) => Some(slug),
                Err(e) => {
                    errors.push(FieldError::new("slug", e.to_string()));
                    None
                }
            },
            None => {
                if required {
                    errors.push(FieldError::new("slug", "Slug is required"));
                }
                None
            }
        }
    }

    fn validate_domain(&self, errors: &mut Vec<FieldError>) -> Option<DomainName> {
        match non_empty(self.domain.as_deref()) {
            Some(raw) => match DomainName::parse(&raw) {
                Ok(domain) => Some(domain),
                Err(_) => {
                    errors.push(FieldError::new(
                        "domain",
                        "Domain must be a valid fully qualified domain name",
                    ));
                    None
                }
            },
            None => None,
        }
    }

    fn validate_config(&self, errors: &mut Vec<FieldError>) -> TenantConfigPatch {
        let primary_color =
            validate_color(self.primary_color.as_deref(), "primary_color", errors);
        let secondary_color =
            validate_color(self.secondary_color.as_deref(), "secondary_color", errors);

        let max_tasks_per_user = match non_empty(self.max_tasks_per_user.as_deref()) {
            Some(raw) => match raw.parse::<i64>() {
                Ok(n) if (MAX_TASKS_MIN..=MAX_TASKS_MAX).contains(&n) => Some(n),
                _ => {
                    errors.push(FieldError::new(
                        "max_tasks_per_user",
                        format!(
                            "Max tasks per user must be between {MAX_TASKS_MIN} and {MAX_TASKS_MAX}"
                        ),
                    ));
                    None
                }
            },
            None => None,
        };

        TenantConfigPatch {
            primary_color,
            secondary_color,
            logo_url: non_empty(self.logo_url.as_deref()),
            company_name: non_empty(self.company_name.as_deref()),
            company_email: non_empty(self.company_email.as_deref()),
            company_phone: non_empty(self.company_phone.as_deref()),
            company_address: non_empty(self.company_address.as_deref()),
            allow_registration: non_empty(self.allow_registration.as_deref())
                .map(|v| checkbox_value(&v)),
            max_tasks_per_user,
            allow_task_comments: non_empty(self.allow_task_comments.as_deref())
                .map(|v| checkbox_value(&v)),
        }
    }
}

/// Trim a form value, treating empty strings as absent.
fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

/// Interpret a checkbox/select value as a boolean.
fn checkbox_value(value: &str) -> bool {
    matches!(value, "true" | "on" | "1")
}

/// Split a comma-separated tag list, trimming and dropping empties.
fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Parse a due date: RFC 3339, `datetime-local` input, or a bare date.
fn parse_due_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M") {
        return Some(dt.and_utc());
    }
    if let Ok(date) = raw.parse::<NaiveDate>() {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }
    None
}

fn validate_color(
    value: Option<&str>,
    field: &'static str,
    errors: &mut Vec<FieldError>,
) -> Option<HexColor> {
    match non_empty(value) {
        Some(raw) => match HexColor::parse(&raw) {
            Ok(color) => Some(color),
            Err(_) => {
                errors.push(FieldError::new(
                    field,
                    "Color must be a hex code like #6366f1",
                ));
                None
            }
        },
        None => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn has_error(errors: &[FieldError], field: &str) -> bool {
        errors.iter().any(|e| e.field == field)
    }

    #[test]
    fn test_task_create_requires_title() {
        let form = TaskForm::default();
        let errors = form.validate_create().unwrap_err();
        assert!(has_error(&errors, "title"));
    }

    #[test]
    fn test_task_create_empty_title_is_absent() {
        let form = TaskForm {
            title: Some("   ".to_string()),
            ..TaskForm::default()
        };
        assert!(form.validate_create().is_err());
    }

    #[test]
    fn test_task_create_title_too_long() {
        let form = TaskForm {
            title: Some("x".repeat(101)),
            ..TaskForm::default()
        };
        let errors = form.validate_create().unwrap_err();
        assert!(has_error(&errors, "title"));
    }

    #[test]
    fn test_task_create_defaults() {
        let form = TaskForm {
            title: Some("Write report".to_string()),
            ..TaskForm::default()
        };
        let data = form.validate_create().unwrap();
        assert_eq!(data.title, "Write report");
        assert!(data.status.is_none());
        assert!(data.priority.is_none());
        assert!(data.tags.is_none());
    }

    #[test]
    fn test_task_tags_split_and_trimmed() {
        let form = TaskForm {
            title: Some("T".to_string()),
            tags: Some(" urgent , q3,, billing ".to_string()),
            ..TaskForm::default()
        };
        let data = form.validate_create().unwrap();
        assert_eq!(data.tags.unwrap(), vec!["urgent", "q3", "billing"]);
    }

    #[test]
    fn test_task_invalid_status_and_priority() {
        let form = TaskForm {
            title: Some("T".to_string()),
            status: Some("DONE".to_string()),
            priority: Some("CRITICAL".to_string()),
            ..TaskForm::default()
        };
        let errors = form.validate_create().unwrap_err();
        assert!(has_error(&errors, "status"));
        assert!(has_error(&errors, "priority"));
    }

    #[test]
    fn test_task_due_date_formats() {
        for raw in ["2026-09-01", "2026-09-01T10:30", "2026-09-01T10:30:00Z"] {
            let form = TaskForm {
                title: Some("T".to_string()),
                due_date: Some(raw.to_string()),
                ..TaskForm::default()
            };
            assert!(
                form.validate_create().unwrap().due_date.is_some(),
                "failed to parse {raw}"
            );
        }
    }

    #[test]
    fn test_task_due_date_invalid() {
        let form = TaskForm {
            title: Some("T".to_string()),
            due_date: Some("next tuesday".to_string()),
            ..TaskForm::default()
        };
        let errors = form.validate_create().unwrap_err();
        assert!(has_error(&errors, "due_date"));
    }

    #[test]
    fn test_task_update_all_optional() {
        let form = TaskForm::default();
        let patch = form.validate_update().unwrap();
        assert!(patch.title.is_none());
        assert!(patch.status.is_none());
        assert!(patch.tags.is_none());
    }

    #[test]
    fn test_task_update_empty_tags_clears_them() {
        let form = TaskForm {
            tags: Some(String::new()),
            ..TaskForm::default()
        };
        let patch = form.validate_update().unwrap();
        assert_eq!(patch.tags, Some(Vec::new()));
    }

    #[test]
    fn test_tenant_create_valid() {
        let form = TenantForm {
            name: Some("Acme Corp".to_string()),
            slug: Some("acme".to_string()),
            domain: Some("tasks.acme.com".to_string()),
            primary_color: Some("#112233".to_string()),
            max_tasks_per_user: Some("50".to_string()),
            ..TenantForm::default()
        };
        let data = form.validate_create().unwrap();
        assert_eq!(data.name, "Acme Corp");
        assert_eq!(data.slug.as_str(), "acme");
        assert_eq!(data.config.max_tasks_per_user, Some(50));
    }

    #[test]
    fn test_tenant_create_requires_name_and_slug() {
        let form = TenantForm::default();
        let errors = form.validate_create().unwrap_err();
        assert!(has_error(&errors, "name"));
        assert!(has_error(&errors, "slug"));
    }

    #[test]
    fn test_tenant_invalid_slug() {
        let form = TenantForm {
            name: Some("My Org".to_string()),
            slug: Some("My Org!".to_string()),
            ..TenantForm::default()
        };
        let errors = form.validate_create().unwrap_err();
        assert!(has_error(&errors, "slug"));
    }

    #[test]
    fn test_tenant_invalid_domain_and_color() {
        let form = TenantForm {
            name: Some("My Org".to_string()),
            slug: Some("my-org".to_string()),
            domain: Some("not a domain".to_string()),
            primary_color: Some("blue".to_string()),
            ..TenantForm::default()
        };
        let errors = form.validate_create().unwrap_err();
        assert!(has_error(&errors, "domain"));
        assert!(has_error(&errors, "primary_color"));
    }

    #[test]
    fn test_tenant_max_tasks_bounds() {
        for raw in ["0", "1001", "ten"] {
            let form = TenantForm {
                name: Some("My Org".to_string()),
                slug: Some("my-org".to_string()),
                max_tasks_per_user: Some(raw.to_string()),
                ..TenantForm::default()
            };
            let errors = form.validate_create().unwrap_err();
            assert!(has_error(&errors, "max_tasks_per_user"), "accepted {raw}");
        }
    }

    #[test]
    fn test_tenant_update_is_active() {
        let form = TenantForm {
            is_active: Some("false".to_string()),
            ..TenantForm::default()
        };
        let patch = form.validate_update().unwrap();
        assert_eq!(patch.is_active, Some(false));
    }

    #[test]
    fn test_checkbox_values() {
        assert!(checkbox_value("true"));
        assert!(checkbox_value("on"));
        assert!(!checkbox_value("false"));
    }
}
