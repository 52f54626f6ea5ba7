//! Formflow Validation
//!
//! Uniform validation reporting for form processing: the `ValidationInfo`
//! report a rendering layer consumes, declarative per-field rules, and the
//! translation of validation-engine errors into that report.
//!
//! This crate is pure data and pure functions; the request-scoped
//! orchestration lives in the `formflow` crate.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub mod rules;
pub mod translate;

pub use rules::{extract_validation_rules, FieldDescriptor, FormFields};
pub use translate::{
    message_key, relative_field_name, translate_validation_error, FieldFailure, InvalidValidation,
    ValidationFailures,
};

/// One declarative constraint attached to a field, e.g. `required` or
/// `max=10`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRule {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// A single validation error as shown to the rendering layer.
///
/// `message_key` is a stable translation key; `default_label` is the
/// last-resort human string when no translation exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Error {
    pub tag: String,
    pub message_key: String,
    pub default_label: String,
}

impl Error {
    pub fn new(
        tag: impl Into<String>,
        message_key: impl Into<String>,
        default_label: impl Into<String>,
    ) -> Self {
        Self {
            tag: tag.into(),
            message_key: message_key.into(),
            default_label: default_label.into(),
        }
    }
}

/// The uniform validation outcome of one form submission.
///
/// Field errors are keyed by the relative field name (dot-separated for
/// nested structures) and preserve discovery order. Every mutating helper
/// that records an error also flips `is_valid` to `false`; a fresh report
/// is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationInfo {
    pub is_valid: bool,
    pub field_errors: IndexMap<String, Vec<Error>>,
    pub general_errors: Vec<Error>,
}

impl Default for ValidationInfo {
    fn default() -> Self {
        Self::valid()
    }
}

impl ValidationInfo {
    /// The report with no errors.
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            field_errors: IndexMap::new(),
            general_errors: Vec::new(),
        }
    }

    /// Records an error against a field and marks the report invalid.
    pub fn add_field_error(&mut self, field: impl Into<String>, error: Error) {
        self.is_valid = false;
        self.field_errors.entry(field.into()).or_default().push(error);
    }

    /// Records an error that is not attributable to a single field.
    pub fn add_general_error(&mut self, error: Error) {
        self.is_valid = false;
        self.general_errors.push(error);
    }

    /// Records an unclassified failure, e.g. a decode or parse fault.
    pub fn add_general_unknown_error(&mut self, message: &str) {
        self.add_general_error(Error::new("unknown", "formerror_unknown", message));
    }

    pub fn has_errors_for_field(&self, field: &str) -> bool {
        self.field_errors.contains_key(field)
    }

    pub fn errors_for_field(&self, field: &str) -> Option<&[Error]> {
        self.field_errors.get(field).map(Vec::as_slice)
    }

    /// First error for a field, the one a compact rendering shows.
    pub fn first_error_for_field(&self, field: &str) -> Option<&Error> {
        self.field_errors.get(field).and_then(|errors| errors.first())
    }
}
