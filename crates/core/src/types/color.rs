//! Hex color type for tenant branding.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`HexColor`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum HexColorError {
    /// The input does not start with `#`.
    #[error("hex color must start with '#'")]
    MissingHash,
    /// The input is not exactly 7 characters (`#` + 6 hex digits).
    #[error("hex color must be a '#' followed by 6 hex digits")]
    WrongLength,
    /// A character after the `#` is not a hex digit.
    #[error("hex color contains a non-hexadecimal digit")]
    InvalidDigit,
}

/// A 6-digit hex color code such as `#6366f1`.
///
/// Parsing is case-insensitive and the value is stored as given.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct HexColor(String);

impl HexColor {
    /// Parse a `HexColor` from a string of the form `#RRGGBB`.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a `#` followed by exactly six
    /// hexadecimal digits.
    pub fn parse(s: &str) -> Result<Self, HexColorError> {
        let Some(digits) = s.strip_prefix('#') else {
            return Err(HexColorError::MissingHash);
        };

        if digits.len() != 6 {
            return Err(HexColorError::WrongLength);
        }

        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(HexColorError::InvalidDigit);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the color as a string slice, including the leading `#`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `HexColor` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for HexColor {
    type Err = HexColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
