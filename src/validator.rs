//! Tag-driven struct validation. Rust has no runtime reflection
//! over struct fields, so the actual per-field tag reading happens at
//! compile time in `junction_macros`'s `#[derive(Validate)]`. This module
//! holds only what that expansion calls into: the pure per-rule checks
//! (`rules`), the localized message catalog (`messages`), and the
//! collecting error type every expansion builds up into.

pub mod messages;
pub mod rules;

use std::fmt;

/// Implemented by `#[derive(Validate)]`. Validation is collecting,
/// never fail-fast: every violated rule on every field is recorded.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        self.validate_locale("en")
    }

    fn validate_locale(&self, locale: &str) -> Result<(), ValidationErrors>;
}

/// A single field's violation message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

/// An ordered, never-fail-fast collection of field violations. Its
/// `Display` joins every message with `"; "`, a fixed, testable separator
/// the aggregated error surface promises callers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn new() -> ValidationErrors {
        ValidationErrors(Vec::new())
    }

    pub fn push<F: Into<String>, M: Into<String>>(&mut self, field: F, message: M) {
        self.0.push(ValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn into_inner(self) -> Vec<ValidationError> {
        self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self.0.iter().map(|e| e.message.as_str()).collect::<Vec<_>>().join("; ");
        write!(f, "{}", joined)
    }
}

impl std::error::Error for ValidationErrors {}
