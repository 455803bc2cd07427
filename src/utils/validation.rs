use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

pub fn validate<T: Validate>(val: &T) -> Result<(), ValidationErrors> {
    val.validate()
}

pub fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// Accumulates derive-level and hand-written field checks into one
/// `ValidationErrors`, so a form reports every failing field at once.
pub struct Checks {
    errors: ValidationErrors,
}

impl Checks {
    pub fn new() -> Self {
        Self {
            errors: ValidationErrors::new(),
        }
    }

    pub fn from_derive<T: Validate>(val: &T) -> Self {
        match validate(val) {
            Ok(()) => Self::new(),
            Err(errors) => Self { errors },
        }
    }

    pub fn fail_if(
        &mut self,
        failed: bool,
        field: &'static str,
        code: &'static str,
        message: &'static str,
    ) -> &mut Self {
        if failed {
            self.errors.add(field, field_error(code, message));
        }
        self
    }

    pub fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

impl Default for Checks {
    fn default() -> Self {
        Self::new()
    }
}

/// Splits a comma-separated form value into trimmed, non-empty items.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// List fields arrive either as the form's comma-separated text or as a
/// JSON array.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ListInput {
    Text(String),
    Items(Vec<String>),
}

impl ListInput {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            ListInput::Text(raw) => split_list(&raw),
            ListInput::Items(items) => items
                .into_iter()
                .map(|item| item.trim().to_string())
                .filter(|item| !item.is_empty())
                .collect(),
        }
    }
}

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Loose phone check: 7 to 15 digits, with `+`, spaces, dashes and
/// parentheses allowed around them.
pub fn is_valid_phone(value: &str) -> bool {
    let digits = value.chars().filter(|c| c.is_ascii_digit()).count();
    let allowed = value
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | ' ' | '-' | '(' | ')'));
    allowed && (7..=15).contains(&digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_list_drops_blank_items() {
        assert_eq!(
            split_list(" Rust, SQL ,, ,Docker "),
            vec!["Rust".to_string(), "SQL".to_string(), "Docker".to_string()]
        );
        assert!(split_list("").is_empty());
    }

    #[test]
    fn list_input_accepts_text_or_array() {
        let text: ListInput = serde_json::from_str("\"Health cover, Remote\"").unwrap();
        assert_eq!(text.into_vec(), vec!["Health cover", "Remote"]);
        let items: ListInput = serde_json::from_str("[\" Gym \", \"\"]").unwrap();
        assert_eq!(items.into_vec(), vec!["Gym"]);
    }

    #[test]
    fn phone_numbers() {
        assert!(is_valid_phone("+254 (712) 345-678"));
        assert!(!is_valid_phone("12345"));
        assert!(!is_valid_phone("call me"));
    }

    #[test]
    fn checks_collect_every_failure() {
        let mut checks = Checks::new();
        checks
            .fail_if(true, "amount", "positive", "Amount must be greater than 0")
            .fail_if(false, "purpose", "required", "Purpose is required")
            .fail_if(true, "repaymentMonths", "positive", "Repayment months must be greater than 0");
        let errors = checks.finish().unwrap_err();
        let fields = errors.field_errors();
        assert_eq!(fields.len(), 2);
        assert!(fields.contains_key("amount"));
        assert!(fields.contains_key("repaymentMonths"));
    }
}
