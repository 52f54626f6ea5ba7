// File: src/service.rs
// Purpose: Form service boundary and its registration-time capability set

use formflow_validation::{FormFields, ValidationInfo};

use crate::request_context::{RequestContext, SubmittedValues};

/// The per-form business service. Parsing submitted values into the typed
/// form data is the one required capability; everything else is optional
/// and registered on a [`FormHandler`].
pub trait FormService {
    type Data: FormFields;

    /// Converts the raw submitted values into this form's typed data.
    fn parse_form_data(
        &self,
        ctx: &RequestContext,
        values: &SubmittedValues,
    ) -> anyhow::Result<Self::Data>;
}

/// Optional capability: validate parsed form data.
pub trait ValidateFormData: FormService {
    fn validate_form_data(&self, data: &Self::Data) -> anyhow::Result<ValidationInfo>;
}

/// Optional capability: validate parsed form data with access to the
/// request context.
pub trait ValidateFormDataWithContext: FormService {
    fn validate_form_data_with_context(
        &self,
        ctx: &RequestContext,
        data: &Self::Data,
    ) -> anyhow::Result<ValidationInfo>;
}

/// Optional capability: supply placeholder or default data for display
/// when the form was not submitted. `data` is the parsed value when one
/// exists.
pub trait DefaultFormData: FormService {
    fn default_form_data(&self, data: Option<Self::Data>) -> Self::Data;
}

/// Optional capability: default-data population with access to the
/// request context.
pub trait DefaultFormDataWithContext: FormService {
    fn default_form_data_with_context(
        &self,
        ctx: &RequestContext,
        data: Option<Self::Data>,
    ) -> Self::Data;
}

pub(crate) enum ValidateDispatch<S: FormService> {
    Plain(fn(&S, &S::Data) -> anyhow::Result<ValidationInfo>),
    WithContext(fn(&S, &RequestContext, &S::Data) -> anyhow::Result<ValidationInfo>),
}

impl<S: FormService> ValidateDispatch<S> {
    pub(crate) fn invoke(
        &self,
        service: &S,
        ctx: &RequestContext,
        data: &S::Data,
    ) -> anyhow::Result<ValidationInfo> {
        match self {
            Self::Plain(run) => run(service, data),
            Self::WithContext(run) => run(service, ctx, data),
        }
    }
}

pub(crate) enum DefaultDataDispatch<S: FormService> {
    Plain(fn(&S, Option<S::Data>) -> S::Data),
    WithContext(fn(&S, &RequestContext, Option<S::Data>) -> S::Data),
}

impl<S: FormService> DefaultDataDispatch<S> {
    pub(crate) fn invoke(
        &self,
        service: &S,
        ctx: &RequestContext,
        data: Option<S::Data>,
    ) -> S::Data {
        match self {
            Self::Plain(run) => run(service, data),
            Self::WithContext(run) => run(service, ctx, data),
        }
    }
}

/// A form service plus the optional capabilities it registered, resolved
/// once at registration time into concrete dispatch slots.
///
/// Each optional pair holds at most one variant. The preference is
/// deterministic and independent of registration order: the context-free
/// capability wins, so registering the context-aware variant is a no-op
/// while the context-free one is present.
pub struct FormHandler<S: FormService> {
    service: S,
    validate: Option<ValidateDispatch<S>>,
    default_data: Option<DefaultDataDispatch<S>>,
}

impl<S: FormService> FormHandler<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            validate: None,
            default_data: None,
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Registers the context-free validate capability.
    pub fn with_validation(mut self) -> Self
    where
        S: ValidateFormData,
    {
        self.validate = Some(ValidateDispatch::Plain(S::validate_form_data));
        self
    }

    /// Registers the context-aware validate capability; yields to a
    /// registered context-free one.
    pub fn with_context_validation(mut self) -> Self
    where
        S: ValidateFormDataWithContext,
    {
        if !matches!(self.validate, Some(ValidateDispatch::Plain(_))) {
            self.validate = Some(ValidateDispatch::WithContext(
                S::validate_form_data_with_context,
            ));
        }
        self
    }

    /// Registers the context-free default-data capability.
    pub fn with_default_data(mut self) -> Self
    where
        S: DefaultFormData,
    {
        self.default_data = Some(DefaultDataDispatch::Plain(S::default_form_data));
        self
    }

    /// Registers the context-aware default-data capability; yields to a
    /// registered context-free one.
    pub fn with_context_default_data(mut self) -> Self
    where
        S: DefaultFormDataWithContext,
    {
        if !matches!(self.default_data, Some(DefaultDataDispatch::Plain(_))) {
            self.default_data = Some(DefaultDataDispatch::WithContext(
                S::default_form_data_with_context,
            ));
        }
        self
    }

    pub(crate) fn validate_dispatch(&self) -> Option<&ValidateDispatch<S>> {
        self.validate.as_ref()
    }

    pub(crate) fn default_data_dispatch(&self) -> Option<&DefaultDataDispatch<S>> {
        self.default_data.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formflow_validation::FieldDescriptor;

    #[derive(Debug, Default)]
    struct Probe;

    #[derive(Debug)]
    struct ProbeData;

    impl FormFields for ProbeData {
        fn field_descriptors() -> &'static [FieldDescriptor] {
            &[]
        }
    }

    impl FormService for Probe {
        type Data = ProbeData;

        fn parse_form_data(
            &self,
            _ctx: &RequestContext,
            _values: &SubmittedValues,
        ) -> anyhow::Result<ProbeData> {
            Ok(ProbeData)
        }
    }

    impl ValidateFormData for Probe {
        fn validate_form_data(&self, _data: &ProbeData) -> anyhow::Result<ValidationInfo> {
            Ok(ValidationInfo::valid())
        }
    }

    impl ValidateFormDataWithContext for Probe {
        fn validate_form_data_with_context(
            &self,
            _ctx: &RequestContext,
            _data: &ProbeData,
        ) -> anyhow::Result<ValidationInfo> {
            Ok(ValidationInfo::valid())
        }
    }

    #[test]
    fn no_capabilities_by_default() {
        let handler = FormHandler::new(Probe);
        assert!(handler.validate_dispatch().is_none());
        assert!(handler.default_data_dispatch().is_none());
    }

    #[test]
    fn context_free_wins_regardless_of_registration_order() {
        let handler = FormHandler::new(Probe)
            .with_context_validation()
            .with_validation();
        assert!(matches!(
            handler.validate_dispatch(),
            Some(ValidateDispatch::Plain(_))
        ));

        let handler = FormHandler::new(Probe)
            .with_validation()
            .with_context_validation();
        assert!(matches!(
            handler.validate_dispatch(),
            Some(ValidateDispatch::Plain(_))
        ));
    }

    #[test]
    fn context_aware_fills_an_empty_slot() {
        let handler = FormHandler::new(Probe).with_context_validation();
        assert!(matches!(
            handler.validate_dispatch(),
            Some(ValidateDispatch::WithContext(_))
        ));
    }
}
