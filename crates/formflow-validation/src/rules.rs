//! Declarative validation rules extracted from a form data type's field
//! table.
//!
//! A form data type describes its fields once, at compile time, through
//! [`FormFields`]; rule extraction walks that table and parses each field's
//! constraint descriptor into [`ValidationRule`]s keyed by the field's
//! reporting name. The result is independent of any submitted values.

use indexmap::IndexMap;

use crate::ValidationRule;

/// Static metadata for one field of a form data type.
///
/// `validate` is a comma-separated constraint descriptor such as
/// `"required,max=10"`. `form_name` overrides the reporting name; the
/// sentinel `"-"` excludes the field from rule reporting entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub form_name: Option<&'static str>,
    pub validate: Option<&'static str>,
}

impl FieldDescriptor {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            form_name: None,
            validate: None,
        }
    }

    pub const fn form_name(mut self, form_name: &'static str) -> Self {
        self.form_name = Some(form_name);
        self
    }

    pub const fn validate(mut self, descriptor: &'static str) -> Self {
        self.validate = Some(descriptor);
        self
    }
}

/// Supplied by a form data type alongside its definition: the compile-time
/// field table rule extraction reads.
pub trait FormFields {
    fn field_descriptors() -> &'static [FieldDescriptor];
}

/// Parses every field's constraint descriptor into declarative rules,
/// keyed by reporting name and in declaration order.
///
/// Tokens named `omitempty` signal "only apply rules if present" and never
/// appear in the output. Malformed descriptors degrade silently: a token
/// without `=` yields a rule with no value.
pub fn extract_validation_rules(
    fields: &[FieldDescriptor],
) -> IndexMap<String, Vec<ValidationRule>> {
    let mut result = IndexMap::new();

    for field in fields {
        let descriptor = match field.validate {
            Some(descriptor) => descriptor,
            None => continue,
        };
        if field.form_name == Some("-") {
            continue;
        }
        let key = field.form_name.unwrap_or(field.name);

        for token in descriptor.split(',') {
            let (name, value) = match token.split_once('=') {
                Some((name, value)) => (name, Some(value.to_string())),
                None => (token, None),
            };
            if name == "omitempty" {
                continue;
            }
            result
                .entry(key.to_string())
                .or_insert_with(Vec::new)
                .push(ValidationRule {
                    name: name.to_string(),
                    value,
                });
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rule(name: &str, value: Option<&str>) -> ValidationRule {
        ValidationRule {
            name: name.to_string(),
            value: value.map(str::to_string),
        }
    }

    #[test]
    fn untagged_fields_yield_no_rules() {
        let fields = [
            FieldDescriptor::new("email"),
            FieldDescriptor::new("name").form_name("name"),
        ];
        assert!(extract_validation_rules(&fields).is_empty());
    }

    #[test]
    fn descriptor_splits_into_named_rules() {
        let fields = [FieldDescriptor::new("Email")
            .form_name("email")
            .validate("required,max=10")];

        let rules = extract_validation_rules(&fields);
        assert_eq!(
            rules.get("email"),
            Some(&vec![rule("required", None), rule("max", Some("10"))])
        );
    }

    #[test]
    fn omitempty_never_appears() {
        let fields = [
            FieldDescriptor::new("a").validate("omitempty,required"),
            FieldDescriptor::new("b").validate("required,omitempty,max=3"),
        ];

        let rules = extract_validation_rules(&fields);
        assert_eq!(rules.get("a"), Some(&vec![rule("required", None)]));
        assert_eq!(
            rules.get("b"),
            Some(&vec![rule("required", None), rule("max", Some("3"))])
        );
    }

    #[test]
    fn dash_override_excludes_the_field() {
        let fields = [FieldDescriptor::new("Secret")
            .form_name("-")
            .validate("required")];
        assert!(extract_validation_rules(&fields).is_empty());
    }

    #[test]
    fn reporting_name_falls_back_to_structural_name() {
        let fields = [FieldDescriptor::new("Street").validate("required")];

        let rules = extract_validation_rules(&fields);
        assert!(rules.contains_key("Street"));
    }

    #[test]
    fn field_order_follows_the_table() {
        let fields = [
            FieldDescriptor::new("b").validate("required"),
            FieldDescriptor::new("a").validate("required"),
        ];

        let rules = extract_validation_rules(&fields);
        let keys: Vec<_> = rules.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn token_without_value_degrades_silently() {
        let fields = [FieldDescriptor::new("email").validate("email,min=")];

        let rules = extract_validation_rules(&fields);
        assert_eq!(
            rules.get("email"),
            Some(&vec![rule("email", None), rule("min", Some(""))])
        );
    }
}
