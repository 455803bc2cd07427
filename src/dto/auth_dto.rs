use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use crate::models::user::{Role, User};
use crate::utils::validation::{is_blank, is_valid_phone, Checks};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPayload {
    #[validate(length(min = 1, max = 120, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    pub role: String,
    pub phone: Option<String>,
    pub company: Option<String>,
}

impl RegisterPayload {
    /// Self-registration never grants the admin role.
    pub fn check(&self) -> Result<Role, ValidationErrors> {
        let role = self.role.parse::<Role>().ok();
        let mut checks = Checks::from_derive(self);
        checks
            .fail_if(is_blank(&self.name), "name", "required", "Name is required")
            .fail_if(role.is_none(), "role", "role", "Role must be client, vendor or employee")
            .fail_if(role == Some(Role::Admin), "role", "role", "Admins cannot self-register")
            .fail_if(
                self.phone.as_deref().map(|p| !is_valid_phone(p)).unwrap_or(false),
                "phone",
                "phone",
                "Please enter a valid phone number",
            );
        checks.finish()?;
        Ok(role.unwrap_or(Role::Client))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginPayload {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: String,
    /// Same as `role`; older dashboard screens read this key.
    pub user_type: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfilePayload {
    #[validate(length(min = 1, max = 120, message = "Name cannot be empty"))]
    pub name: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    #[validate(length(max = 2000, message = "Bio is too long"))]
    pub bio: Option<String>,
    #[validate(url(message = "Avatar must be a valid URL"))]
    pub avatar_url: Option<String>,
}

impl UpdateProfilePayload {
    pub fn check(&self) -> Result<(), ValidationErrors> {
        let mut checks = Checks::from_derive(self);
        checks.fail_if(
            self.phone.as_deref().map(|p| !is_valid_phone(p)).unwrap_or(false),
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

    fn register(role: &str) -> RegisterPayload {
        RegisterPayload {
            name: "Grace Wanjiru".into(),
            email: "grace@client.io".into(),
            password: "s3cure-pass".into(),
            role: role.into(),
            phone: None,
            company: Some("Acme".into()),
        }
    }

    #[test]
    fn register_accepts_non_admin_roles() {
        assert_eq!(register("client").check().unwrap(), Role::Client);
        assert_eq!(register("Vendor").check().unwrap(), Role::Vendor);
    }

    #[test]
    fn register_rejects_admin_and_unknown_roles() {
        let errors = register("admin").check().unwrap_err();
        assert!(errors.field_errors().contains_key("role"));
        assert!(register("pirate").check().is_err());
    }

    #[test]
    fn short_password_is_reported() {
        let mut payload = register("employee");
        payload.password = "short".into();
        let errors = payload.check().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }
}
