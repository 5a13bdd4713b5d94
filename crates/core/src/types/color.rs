//! Hex color value type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`HexColor`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum HexColorError {
    /// The input string is empty.
    #[error("Value is required")]
    Empty,
    /// The input does not start with `#`.
    #[error("Value must be a valid hex code")]
    MissingHash,
    /// The input is shorter than the minimum length.
    #[error("Value must be at least {min} characters")]
    TooShort {
        /// Minimum allowed length, including the `#`.
        min: usize,
    },
}

/// A color swatch value such as `#fff` or `#1a2b3c`.
///
/// ## Constraints
///
/// - Must start with `#`
/// - Length of at least 4 characters (`#` plus three digits)
///
/// The digits themselves are not checked; the dashboard only ever renders
/// the value as a CSS background.
///
/// ## Examples
///
/// ```
/// use shopdeck_core::HexColor;
///
/// assert!(HexColor::parse("#fff").is_ok());
/// assert!(HexColor::parse("#1a2b3c").is_ok());
///
/// assert!(HexColor::parse("").is_err());     // empty
/// assert!(HexColor::parse("fff").is_err());  // missing #
/// assert!(HexColor::parse("#ff").is_err());  // too short
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct HexColor(String);

impl HexColor {
    /// Minimum length, including the leading `#`.
    pub const MIN_LENGTH: usize = 4;

    /// Parse a `HexColor` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, does not start with `#`, or
    /// is shorter than [`Self::MIN_LENGTH`] characters.
    pub fn parse(s: &str) -> Result<Self, HexColorError> {
        if s.is_empty() {
            return Err(HexColorError::Empty);
        }

        if !s.starts_with('#') {
            return Err(HexColorError::MissingHash);
        }

        if s.chars().count() < Self::MIN_LENGTH {
            return Err(HexColorError::TooShort {
                min: Self::MIN_LENGTH,
            });
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the color as a string slice.
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
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for HexColor {
    type Err = HexColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
