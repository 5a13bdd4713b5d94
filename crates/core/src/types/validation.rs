//! Per-field validation of request payloads.
//!
//! The same rules run on both sides of the wire: forms check them before
//! submitting, and the API re-checks them and answers `400` with the first
//! failing field's message.

use core::fmt;

use serde::Serialize;

/// A single failed field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// JSON field name (camelCase).
    pub field: &'static str,
    /// Human-readable message, e.g. `Name is required`.
    pub message: String,
}

/// All failed fields of a payload, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    /// An empty error set.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// An error set with one failed field.
    #[must_use]
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(field, message);
        errors
    }

    /// Record a failure for `field`.
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Record `message` for `field` when `value` is blank.
    pub fn require(&mut self, field: &'static str, value: &str, message: &str) {
        if value.trim().is_empty() {
            self.push(field, message);
        }
    }

    /// Record `message` for `field` when `value` is `None`.
    pub fn require_some<T>(&mut self, field: &'static str, value: Option<&T>, message: &str) {
        if value.is_none() {
            self.push(field, message);
        }
    }

    /// Whether no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of failed fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Message of the first failed field.
    #[must_use]
    pub fn first_message(&self) -> Option<&str> {
        self.0.first().map(|e| e.message.as_str())
    }

    /// Message for a specific field, if it failed.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// Iterate over the failures.
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// `Ok(())` if empty, otherwise `Err(self)`.
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one field failed.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", error.field, error.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

/// A payload with required fields.
pub trait Validate {
    /// Check every field, collecting all failures.
    ///
    /// # Errors
    ///
    /// Returns the failed fields in declaration order.
    fn validate(&self) -> Result<(), FieldErrors>;
}
