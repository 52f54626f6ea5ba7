// formflow - request-scoped form processing and validation
// Parses submitted data through a pluggable per-form service, derives
// declarative rules from the data type's field table, and normalizes every
// validation outcome into one uniform report.

pub mod form;
pub mod processor;
pub mod request_context;
pub mod service;

pub use form::{Form, FormRequestError};
pub use processor::{
    process_form_request, simple_process_form_request, unsubmitted_form, SimpleFormData,
    NOVALIDATE_FIELD,
};
pub use request_context::{RequestContext, SubmittedValues};
pub use service::{
    DefaultFormData, DefaultFormDataWithContext, FormHandler, FormService, ValidateFormData,
    ValidateFormDataWithContext,
};

// Re-export the validation report types alongside the pipeline
pub use formflow_validation as validation;
pub use formflow_validation::{
    extract_validation_rules, translate_validation_error, Error, FieldDescriptor, FieldFailure,
    FormFields, InvalidValidation, ValidationFailures, ValidationInfo, ValidationRule,
};

// Re-export commonly used HTTP types from dependencies
pub use axum::http::{header, HeaderMap, Method};
