use std::fmt;

use serde::Serialize;

/// A single input field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    /// Name of the offending field as it appears on the wire.
    pub field: &'static str,
    /// Human-readable description of the constraint that was broken.
    pub message: String,
}

impl FieldViolation {
    /// Creates a violation for `field`.
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self { field, message: message.into() }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Errors produced by the `wish-core` crate.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CoreError {
    /// One or more input fields broke the wish constraints.
    #[error("validation failed: {}", join(.violations))]
    Validation { violations: Vec<FieldViolation> },
}

impl CoreError {
    /// Shorthand for a validation error on a single field.
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation { violations: vec![FieldViolation::new(field, message)] }
    }

    /// The individual field violations carried by this error.
    #[must_use]
    pub fn violations(&self) -> &[FieldViolation] {
        match self {
            Self::Validation { violations } => violations,
        }
    }
}

fn join(violations: &[FieldViolation]) -> String {
    violations.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}
