//! URL-safe tenant slug type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Slug`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SlugError {
    /// The input is shorter than the minimum length.
    #[error("slug must be at least {min} characters")]
    TooShort {
        /// Minimum allowed length.
        min: usize,
    },
    /// The input is longer than the maximum length.
    #[error("slug must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character outside `[a-z0-9-]`.
    #[error("slug may only contain lowercase letters, digits, and hyphens")]
    InvalidCharacter,
}

/// A URL-safe, lowercase tenant identifier.
///
/// ## Constraints
///
/// - Length: 2-50 characters
/// - Characters: lowercase ASCII letters, digits, and hyphens only
///
/// ## Examples
///
/// ```
/// use taskhub_core::Slug;
///
/// assert!(Slug::parse("my-org-1").is_ok());
/// assert!(Slug::parse("My Org!").is_err()); // uppercase, space, '!'
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Minimum length of a slug.
    pub const MIN_LENGTH: usize = 2;
    /// Maximum length of a slug.
    pub const MAX_LENGTH: usize = 50;

    /// Parse a `Slug` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is shorter than 2 characters, longer
    /// than 50 characters, or contains anything outside `[a-z0-9-]`.
    pub fn parse(s: &str) -> Result<Self, SlugError> {
        if s.len() < Self::MIN_LENGTH {
            return Err(SlugError::TooShort {
                min: Self::MIN_LENGTH,
            });
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(SlugError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if !s
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
        {
            return Err(SlugError::InvalidCharacter);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the slug as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Slug` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Slug {
    type Err = SlugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
