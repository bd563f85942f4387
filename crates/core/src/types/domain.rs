//! Fully-qualified domain name type for tenant custom domains.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`DomainName`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainNameError {
    /// The input string is empty.
    #[error("domain cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("domain must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The domain has fewer than two labels (no TLD).
    #[error("domain must be fully qualified (e.g. tasks.example.com)")]
    NotFullyQualified,
    /// A label is empty, too long, or has a leading/trailing hyphen.
    #[error("domain label '{0}' is invalid")]
    InvalidLabel(String),
    /// A label contains a character outside `[A-Za-z0-9-]`.
    #[error("domain contains an invalid character")]
    InvalidCharacter,
    /// The top-level domain is not alphabetic or is too short.
    #[error("domain top-level label must be at least 2 letters")]
    InvalidTld,
}

/// A fully-qualified domain name (FQDN), e.g. `tasks.example.com`.
///
/// ## Constraints
///
/// - At most 253 characters overall
/// - At least two dot-separated labels
/// - Each label: 1-63 characters of `[A-Za-z0-9-]`, no leading or trailing
///   hyphen
/// - Top-level label: alphabetic, at least 2 characters
///
/// The value is lowercased on parse so lookups are case-insensitive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct DomainName(String);

impl DomainName {
    /// Maximum overall length of a domain name.
    pub const MAX_LENGTH: usize = 253;
    /// Maximum length of a single label.
    pub const MAX_LABEL_LENGTH: usize = 63;

    /// Parse a `DomainName` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a valid FQDN per the constraints
    /// above.
    pub fn parse(s: &str) -> Result<Self, DomainNameError> {
        if s.is_empty() {
            return Err(DomainNameError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(DomainNameError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        let labels: Vec<&str> = s.split('.').collect();
        if labels.len() < 2 {
            return Err(DomainNameError::NotFullyQualified);
        }

        for label in &labels {
            if label.is_empty() || label.len() > Self::MAX_LABEL_LENGTH {
                return Err(DomainNameError::InvalidLabel((*label).to_owned()));
            }
            if !label
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-')
            {
                return Err(DomainNameError::InvalidCharacter);
            }
            if label.starts_with('-') || label.ends_with('-') {
                return Err(DomainNameError::InvalidLabel((*label).to_owned()));
            }
        }

        // Last label is the TLD: alphabetic, at least 2 characters.
        let tld = labels.last().unwrap_or(&"");
        if tld.len() < 2 || !tld.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(DomainNameError::InvalidTld);
        }

        Ok(Self(s.to_ascii_lowercase()))
    }

    /// Returns the domain as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `DomainName` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for DomainName {
    type Err = DomainNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
