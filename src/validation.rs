//! Payload validation.
//!
//! Create and update models implement [`Validatable`]; the generic create and
//! update handlers run validation before touching the database and turn
//! failures into 422 responses with per-field messages.

use serde::Serialize;
use std::fmt;

/// A single failed check, tied to the field that failed it.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Accumulator so a payload reports every failed field at once rather than
/// one error per round-trip.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ValidationError::new(field, message));
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Ok when no checks failed, otherwise the collected errors.
    pub fn result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed with {} error(s):", self.errors.len())?;
        for error in &self.errors {
            write!(f, "\n  - {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Implemented by create/update payloads.
pub trait Validatable {
    /// # Errors
    ///
    /// Returns every failed field check collected into [`ValidationErrors`].
    fn validate(&self) -> Result<(), ValidationErrors>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_collection_is_ok() {
        assert!(ValidationErrors::new().result().is_ok());
    }

    #[test]
    fn collects_multiple_errors() {
        let mut errors = ValidationErrors::new();
        errors.add("name", "must not be empty");
        errors.add("year", "must be between 1900 and 2100");
        let err = errors.result().unwrap_err();
        assert_eq!(err.errors().len(), 2);
        assert_eq!(err.errors()[0].to_string(), "name: must not be empty");
    }
}
