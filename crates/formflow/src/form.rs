// File: src/form.rs
// Purpose: The per-request form result and the fatal processing error

use std::fmt;

use formflow_validation::{Error, ValidationInfo, ValidationRule};
use indexmap::IndexMap;

use crate::request_context::SubmittedValues;

/// The result of processing one form request.
///
/// Created fresh per request and populated during orchestration; never
/// persisted or shared across requests. `data` is the service-defined
/// typed value and is `None` until parsing succeeded.
#[derive(Debug, Clone, PartialEq)]
pub struct Form<T> {
    pub data: Option<T>,
    pub is_submitted: bool,
    pub original_post_values: SubmittedValues,
    pub validation_rules: IndexMap<String, Vec<ValidationRule>>,
    pub validation_info: ValidationInfo,
}

impl<T> Default for Form<T> {
    fn default() -> Self {
        Self {
            data: None,
            is_submitted: false,
            original_post_values: SubmittedValues::default(),
            validation_rules: IndexMap::new(),
            validation_info: ValidationInfo::valid(),
        }
    }
}

impl<T> Form<T> {
    /// True when the form was submitted and passed validation, the
    /// condition for acting on `data`.
    pub fn is_valid_and_submitted(&self) -> bool {
        self.is_submitted && self.validation_info.is_valid
    }

    pub fn has_error_for_field(&self, field: &str) -> bool {
        self.validation_info.has_errors_for_field(field)
    }

    pub fn errors_for_field(&self, field: &str) -> Option<&[Error]> {
        self.validation_info.errors_for_field(field)
    }

    pub fn rules_for_field(&self, field: &str) -> Option<&[ValidationRule]> {
        self.validation_rules.get(field).map(Vec::as_slice)
    }
}

/// A fatal-to-request processing failure: decoding the submitted values
/// or the required parse step failed.
///
/// Carries the best-effort partially populated form so a rendering layer
/// can still show something sensible.
#[derive(Debug)]
pub struct FormRequestError<T> {
    pub form: Form<T>,
    pub source: anyhow::Error,
}

impl<T> fmt::Display for FormRequestError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.source.fmt(f)
    }
}

impl<T: fmt::Debug> std::error::Error for FormRequestError<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}
