//! Validation messages and the per-field error map the pages render.
//!
//! Field rules are declared on the forms with `serde_valid`; this module turns
//! its errors into [`FormErrors`] and holds the few checks it cannot express.

use serde::Serialize;
use serde_json::Value;
use serde_valid::validation::Errors;
use std::collections::BTreeMap;

pub const REQUIRED: &str = "This field is required.";
pub const INVALID_EMAIL: &str = "Invalid email address.";
pub const INVALID_CHOICE: &str = "Not a valid choice.";

/// Confirm-style check against another field of the same form.
pub fn equal_to(value: &str, other_value: &str, other_name: &str) -> Result<(), String> {
    if value != other_value {
        return Err(format!("Field must be equal to {other_name}."));
    }
    Ok(())
}

/// Lower-cased extension of an uploaded file name, if it has one.
pub fn extension(filename: &str) -> Option<String> {
    let (stem, ext) = filename.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

pub fn file_allowed(filename: &str, allowed: &[&str], message: &str) -> Result<(), String> {
    match extension(filename) {
        Some(ext) if allowed.contains(&ext.as_str()) => Ok(()),
        _ => Err(message.to_string()),
    }
}

/// Inline error messages keyed by field name.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Records a failed rule for `field`; returns whether the rule passed.
    pub fn check(&mut self, field: &str, outcome: Result<(), String>) -> bool {
        match outcome {
            Ok(()) => true,
            Err(message) => {
                self.add(field, message);
                false
            }
        }
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Errors> for FormErrors {
    fn from(errors: Errors) -> Self {
        let mut form_errors = FormErrors::new();
        let tree = serde_json::to_value(&errors).unwrap_or_default();

        let properties = tree.get("properties").and_then(Value::as_object);
        for (field, nested) in properties.into_iter().flatten() {
            let messages = nested.get("errors").and_then(Value::as_array);
            for message in messages.into_iter().flatten().filter_map(Value::as_str) {
                form_errors.add(field, message);
            }
        }

        // an empty field reports only that it is required
        for messages in form_errors.0.values_mut() {
            if messages.iter().any(|message| message == REQUIRED) {
                messages.retain(|message| message == REQUIRED);
            }
        }

        form_errors
    }
}

/// Field errors of a `serde_valid` form, empty when it passed.
pub fn field_errors(outcome: Result<(), Errors>) -> FormErrors {
    match outcome {
        Ok(()) => FormErrors::new(),
        Err(errors) => errors.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_valid::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(min_length = 1, message = "This field is required.")]
        #[validate(max_length = 3, message = "Field must be between 1 and 3 characters long.")]
        name: String,
        #[validate(min_length = 1, message = "This field is required.")]
        #[validate(enumerate("red", "blue"), message = "Not a valid choice.")]
        color: String,
    }

    fn sample(name: &str, color: &str) -> Sample {
        Sample {
            name: name.to_string(),
            color: color.to_string(),
        }
    }

    #[test]
    fn serde_valid_errors_map_to_fields() {
        assert!(field_errors(sample("abc", "red").validate()).is_empty());

        let errors = field_errors(sample("abcd", "green").validate());
        assert_eq!(
            errors.get("name"),
            ["Field must be between 1 and 3 characters long.".to_string()]
        );
        assert_eq!(errors.get("color"), [INVALID_CHOICE.to_string()]);
    }

    #[test]
    fn empty_field_reports_required_only() {
        let errors = field_errors(sample("", "").validate());
        assert_eq!(errors.get("name"), [REQUIRED.to_string()]);
        assert_eq!(errors.get("color"), [REQUIRED.to_string()]);
    }

    #[test]
    fn equal_to_names_the_other_field() {
        assert!(equal_to("test", "test", "password").is_ok());
        assert_eq!(
            equal_to("test2", "test", "password"),
            Err("Field must be equal to password.".to_string())
        );
    }

    #[test]
    fn file_extension_is_case_insensitive() {
        let allowed = ["jpg", "jpeg", "png"];
        assert!(file_allowed("me.PNG", &allowed, "Images Only!").is_ok());
        assert!(file_allowed("archive.tar.jpeg", &allowed, "Images Only!").is_ok());
        assert_eq!(
            file_allowed("me.gif", &allowed, "Images Only!"),
            Err("Images Only!".to_string())
        );
        assert!(file_allowed("png", &allowed, "Images Only!").is_err());
        assert!(file_allowed(".png", &allowed, "Images Only!").is_err());
    }

    #[test]
    fn form_errors_collect_per_field() {
        let mut errors = FormErrors::new();
        assert!(errors.check("username", Ok(())));
        assert!(!errors.check("email", Err(INVALID_EMAIL.to_string())));
        errors.add("email", "Email is taken");

        assert!(!errors.is_empty());
        assert!(!errors.has("username"));
        assert_eq!(errors.get("email").len(), 2);
        assert!(errors.get("password").is_empty());
    }
}
