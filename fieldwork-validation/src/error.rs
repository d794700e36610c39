// Validation errors

use crate::date::DateError;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Usage error raised by the fluent API.
///
/// These signal a mistake in the calling code (unknown field, unregistered
/// rule, date comparison on a value that was never normalized...). Failed
/// checks on submitted data never produce one; they are recorded on the
/// field and reported through [`FieldErrors`].
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Field does not exist: {0}")]
    UnknownField(String),

    #[error("Method {0} does not exist")]
    UnknownRule(String),

    #[error("No field selected - call field() before filtering or validating")]
    NoCurrentField,

    #[error("Value of {field} is not a string (found {found})")]
    NotText { field: String, found: &'static str },

    #[error("Both fields must be dates - call to_date_time on {field} before comparing it")]
    NotADate { field: String },

    #[error("Passed value is not a valid date: {0}")]
    InvalidReferenceDate(String),

    #[error("No error message registered for kind: {0}")]
    UnknownMessageKind(String),

    #[error("Input must be a JSON object, got {0}")]
    InvalidInput(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error(transparent)]
    Date(#[from] DateError),
}

pub type Result<T> = std::result::Result<T, ValidationError>;

/// Failure recorded on a single field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Field name
    pub field: String,

    /// Fully formatted message
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Failures of every invalid field, in field insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: Vec<FieldError>,
}

impl FieldErrors {
    pub fn new(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Message recorded for `field`, if it is invalid
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Messages only, in order
    pub fn messages(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.message.as_str()).collect()
    }

    /// Convert to a `name -> message` JSON object
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.errors
                .iter()
                .map(|e| (e.field.clone(), serde_json::Value::String(e.message.clone())))
                .collect(),
        )
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for error in &self.errors {
            writeln!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl IntoIterator for FieldErrors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a FieldErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FieldErrors {
        FieldErrors::new(vec![
            FieldError {
                field: "email".to_string(),
                message: "Email is not valid".to_string(),
            },
            FieldError {
                field: "age".to_string(),
                message: "Age is required".to_string(),
            },
        ])
    }

    #[test]
    fn test_lookup_by_field() {
        let errors = sample();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("age"), Some("Age is required"));
        assert!(!errors.contains("name"));
    }

    #[test]
    fn test_keeps_insertion_order() {
        let errors = sample();
        assert_eq!(errors.messages(), vec!["Email is not valid", "Age is required"]);
    }

    #[test]
    fn test_to_json() {
        let json = sample().to_json();
        assert_eq!(json["email"], "Email is not valid");
        assert_eq!(json["age"], "Age is required");
    }

    #[test]
    fn test_usage_error_display() {
        let error = ValidationError::UnknownRule("digits".to_string());
        assert_eq!(error.to_string(), "Method digits does not exist");
    }
}
