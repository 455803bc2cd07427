use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use crate::utils::validation::{is_blank, is_valid_phone, Checks};

/// Marketing-site contact form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContactForm {
    #[validate(length(min = 1, max = 120, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    pub phone: Option<String>,
    #[validate(length(max = 200, message = "Subject is too long"))]
    pub subject: Option<String>,
    #[validate(length(min = 10, max = 5000, message = "Message must be at least 10 characters"))]
    pub message: String,
}

impl ContactForm {
    pub fn check(&self) -> Result<(), ValidationErrors> {
        let mut checks = Checks::from_derive(self);
        checks
            .fail_if(is_blank(&self.name), "name", "required", "Name is required")
            .fail_if(
                self.phone
                    .as_deref()
                    .map(|p| !p.trim().is_empty() && !is_valid_phone(p))
                    .unwrap_or(false),
                "phone",
                "phone",
                "Please enter a valid phone number",
            );
        checks.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ContactForm {
        ContactForm {
            name: "Jane Doe".into(),
            email: "jane@example.com".into(),
            phone: Some("+1 555 010 9999".into()),
            subject: Some("Hiring".into()),
            message: "We need three warehouse staff next month.".into(),
        }
    }

    #[test]
    fn valid_form_passes() {
        assert!(form().check().is_ok());
    }

    #[test]
    fn invalid_email_is_keyed_by_field() {
        let mut f = form();
        f.email = "not-an-email".into();
        let errors = f.check().unwrap_err();
        let fields = errors.field_errors();
        assert_eq!(fields.len(), 1);
        assert!(fields.contains_key("email"));
    }

    #[test]
    fn blank_name_and_short_message() {
        let mut f = form();
        f.name = "   ".into();
        f.message = "hi".into();
        let errors = f.check().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("message"));
    }

    #[test]
    fn empty_phone_is_allowed() {
        let mut f = form();
        f.phone = Some(String::new());
        assert!(f.check().is_ok());
    }
}
