// File: src/processor.rs
// Purpose: Request-scoped orchestration of parsing, rule extraction, and
// conditional validation over a registered form service

use formflow_validation::{extract_validation_rules, translate_validation_error, FormFields};
use indexmap::IndexMap;

use crate::form::{Form, FormRequestError};
use crate::request_context::RequestContext;
use crate::service::{FormHandler, FormService};

/// Submitting this field with the value `true` opts the request out of
/// validation.
pub const NOVALIDATE_FIELD: &str = "novalidate";

/// Parses and validates one form request with the help of the registered
/// service.
///
/// Validation only runs for a `POST` without the `novalidate=true` opt-out;
/// on any other request the service's default-data capability (when
/// registered) supplies placeholder data for display instead, and the form
/// stays unsubmitted. A validate capability's own invocation error is
/// translated into the validation report, never surfaced as a call-level
/// error: `Err` here always means a fatal decode or parse failure, carrying
/// the best-effort partial form.
pub fn process_form_request<S: FormService>(
    ctx: &RequestContext,
    handler: &FormHandler<S>,
) -> Result<Form<S::Data>, FormRequestError<S::Data>> {
    let mut form = Form::default();

    let values = match ctx.submitted_values() {
        Ok(values) => values,
        Err(source) => {
            tracing::warn!(error = %source, path = ctx.path(), "failed to decode submitted values");
            form.validation_info.add_general_unknown_error(&source.to_string());
            return Err(FormRequestError { form, source });
        }
    };
    form.original_post_values = values.clone();

    let mut data = match handler.service().parse_form_data(ctx, &values) {
        Ok(data) => data,
        Err(source) => {
            tracing::warn!(error = %source, path = ctx.path(), "form service failed to parse submitted values");
            form.validation_info.add_general_unknown_error(&source.to_string());
            return Err(FormRequestError { form, source });
        }
    };

    form.validation_rules = extract_validation_rules(S::Data::field_descriptors());

    let novalidate = values.get(NOVALIDATE_FIELD) == Some("true");
    if !novalidate && ctx.is_post() {
        form.is_submitted = true;
        if let Some(dispatch) = handler.validate_dispatch() {
            match dispatch.invoke(handler.service(), ctx, &data) {
                Ok(info) => form.validation_info = info,
                Err(err) => {
                    tracing::debug!(error = %err, "validation invocation failed, translating");
                    form.validation_info = translate_validation_error(Some(&err));
                }
            }
        }
    } else {
        tracing::debug!(novalidate, method = %ctx.method(), "skipping validation");
        if let Some(dispatch) = handler.default_data_dispatch() {
            data = dispatch.invoke(handler.service(), ctx, Some(data));
        }
    }
    form.data = Some(data);

    Ok(form)
}

/// Builds the unsubmitted form for a first rendering: default data when
/// the capability is registered, rules from the static field table, no
/// submitted values. Unsubmitted forms are always valid.
pub fn unsubmitted_form<S: FormService>(
    ctx: &RequestContext,
    handler: &FormHandler<S>,
) -> Form<S::Data> {
    let mut form = Form::default();

    if let Some(dispatch) = handler.default_data_dispatch() {
        form.data = Some(dispatch.invoke(handler.service(), ctx, None));
    }
    form.validation_rules = extract_validation_rules(S::Data::field_descriptors());

    form
}

/// The flat data of the simple form path: every submitted field collapsed
/// to one string.
pub type SimpleFormData = IndexMap<String, String>;

/// Parses the submitted values into a flat string map, without a form
/// service and without validation.
///
/// Multi-valued fields collapse into one space-joined string in submission
/// order. Anything but a `POST` returns an unsubmitted, valid form without
/// touching the payload.
pub fn simple_process_form_request(
    ctx: &RequestContext,
) -> Result<Form<SimpleFormData>, FormRequestError<SimpleFormData>> {
    let mut form = Form::default();

    if !ctx.is_post() {
        form.is_submitted = false;
        form.validation_info.is_valid = true;
        return Ok(form);
    }

    form.is_submitted = true;

    let values = match ctx.submitted_values() {
        Ok(values) => values,
        Err(source) => {
            tracing::warn!(error = %source, path = ctx.path(), "failed to decode submitted values");
            form.validation_info.add_general_unknown_error(&source.to_string());
            return Err(FormRequestError { form, source });
        }
    };

    form.validation_info.is_valid = true;
    let mut data = SimpleFormData::new();
    for (name, field_values) in values.iter() {
        data.insert(name.to_string(), field_values.join(" "));
    }
    form.data = Some(data);

    Ok(form)
}
