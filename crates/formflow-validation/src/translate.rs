//! Translation of validation-engine errors into the uniform
//! [`ValidationInfo`] report.
//!
//! An engine reports either that it could not run at all
//! ([`InvalidValidation`]) or a set of per-field constraint failures
//! ([`ValidationFailures`]). Both travel as an opaque [`anyhow::Error`]
//! across the service boundary and are recognized here by downcast; any
//! other error shape leaves the report valid.

use crate::{Error, ValidationInfo};

/// The validation engine could not run at all, e.g. over a malformed rule
/// table.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid validation: {message}")]
pub struct InvalidValidation {
    pub message: String,
}

impl InvalidValidation {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// One failing constraint reported by the validation engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFailure {
    /// Fully qualified path of the failing field, e.g. `Form.Address.Street`.
    pub namespace: String,
    /// Structural name of the failing field, e.g. `Street`.
    pub field: String,
    /// Name of the failing constraint, e.g. `required`.
    pub tag: String,
}

impl FieldFailure {
    pub fn new(
        namespace: impl Into<String>,
        field: impl Into<String>,
        tag: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            field: field.into(),
            tag: tag.into(),
        }
    }
}

/// A set of per-field constraint failures.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{} validation failure(s)", .0.len())]
pub struct ValidationFailures(pub Vec<FieldFailure>);

/// The stable translation key for a failing constraint on a field.
pub fn message_key(field: &str, tag: &str) -> String {
    format!("formerror_{field}_{tag}")
}

/// The reporting path of a failure: the root segment of the namespace is
/// dropped (it names the form struct and carries no information for the
/// caller) and every remaining segment gets a lower-cased first letter.
///
/// A namespace without a dot is kept whole, lower-cased first letter.
pub fn relative_field_name(namespace: &str) -> String {
    let relative = match namespace.split_once('.') {
        Some((_, rest)) => rest,
        None => namespace,
    };
    relative
        .split('.')
        .map(lower_first)
        .collect::<Vec<_>>()
        .join(".")
}

fn lower_first(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Normalizes a validation engine error into a [`ValidationInfo`].
///
/// `None` yields the valid report. Unrecognized error shapes also leave
/// the report valid: no error info recognized means valid by default.
pub fn translate_validation_error(err: Option<&anyhow::Error>) -> ValidationInfo {
    let mut info = ValidationInfo::valid();
    let err = match err {
        Some(err) => err,
        None => return info,
    };

    if let Some(invalid) = err.downcast_ref::<InvalidValidation>() {
        info.add_general_unknown_error(&invalid.to_string());
    }
    if let Some(ValidationFailures(failures)) = err.downcast_ref::<ValidationFailures>() {
        for failure in failures {
            let field_name = relative_field_name(&failure.namespace);
            let error = Error {
                tag: failure.tag.clone(),
                message_key: message_key(&field_name, &failure.tag),
                default_label: format!("{} wrong", failure.field),
            };
            info.add_field_error(field_name, error);
        }
    }

    info
}
