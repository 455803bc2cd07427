use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::models::client_connection::CONNECTION_TYPES;
use crate::models::pricing_plan::BILLING_CYCLES;
use crate::utils::validation::{is_blank, is_valid_phone, Checks, ListInput};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlanPayload {
    #[validate(length(min = 1, max = 120, message = "Service name is required"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,
    pub price: Decimal,
    pub currency: Option<String>,
    pub billing_cycle: Option<String>,
    pub features: Option<ListInput>,
    pub limitations: Option<ListInput>,
    pub is_active: Option<bool>,
    pub popular: Option<bool>,
}

impl CreatePlanPayload {
    pub fn check(&self) -> Result<(), ValidationErrors> {
        let mut checks = Checks::from_derive(self);
        checks.fail_if(is_blank(&self.name), "name", "required", "Service name is required");
        check_plan_fields(&mut checks, Some(self.price), self.billing_cycle.as_deref());
        checks.finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlanPayload {
    #[validate(length(min = 1, max = 120, message = "Service name cannot be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(length(min = 1, message = "Category cannot be empty"))]
    pub category: Option<String>,
    pub price: Option<Decimal>,
    pub currency: Option<String>,
    pub billing_cycle: Option<String>,
    pub features: Option<ListInput>,
    pub limitations: Option<ListInput>,
    pub is_active: Option<bool>,
}

impl UpdatePlanPayload {
    pub fn check(&self) -> Result<(), ValidationErrors> {
        let mut checks = Checks::from_derive(self);
        check_plan_fields(&mut checks, self.price, self.billing_cycle.as_deref());
        checks.finish()
    }
}

fn check_plan_fields(checks: &mut Checks, price: Option<Decimal>, billing_cycle: Option<&str>) {
    checks
        .fail_if(
            price.map(|p| p < Decimal::ZERO).unwrap_or(false),
            "price",
            "range",
            "Price cannot be negative",
        )
        .fail_if(
            billing_cycle.map(|c| !BILLING_CYCLES.contains(&c)).unwrap_or(false),
            "billingCycle",
            "billing_cycle",
            "Billing cycle must be monthly, yearly or one-time",
        );
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct PlanQuery {
    pub category: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularToggle {
    pub id: Uuid,
    pub popular: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateConnectionPayload {
    #[validate(length(min = 1, max = 120, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    pub company: Option<String>,
    pub phone: Option<String>,
    #[serde(rename = "type")]
    pub connection_type: Option<String>,
    pub notes: Option<String>,
}

impl CreateConnectionPayload {
    pub fn check(&self) -> Result<(), ValidationErrors> {
        let mut checks = Checks::from_derive(self);
        check_connection_fields(&mut checks, self.phone.as_deref(), self.connection_type.as_deref());
        checks.finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateConnectionPayload {
    #[validate(length(min = 1, max = 120, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: Option<String>,
    pub company: Option<String>,
    pub phone: Option<String>,
    #[serde(rename = "type")]
    pub connection_type: Option<String>,
    pub notes: Option<String>,
}

impl UpdateConnectionPayload {
    pub fn check(&self) -> Result<(), ValidationErrors> {
        let mut checks = Checks::from_derive(self);
        check_connection_fields(&mut checks, self.phone.as_deref(), self.connection_type.as_deref());
        checks.finish()
    }
}

fn check_connection_fields(checks: &mut Checks, phone: Option<&str>, connection_type: Option<&str>) {
    checks
        .fail_if(
            phone.map(|p| !is_valid_phone(p)).unwrap_or(false),
            "phone",
            "phone",
            "Please enter a valid phone number",
        )
        .fail_if(
            connection_type.map(|t| !CONNECTION_TYPES.contains(&t)).unwrap_or(false),
            "type",
            "type",
            "Type must be client or admin",
        );
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ConnectionQuery {
    #[serde(rename = "type")]
    pub connection_type: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendMessagePayload {
    pub client_id: Uuid,
    #[validate(length(min = 1, max = 5000, message = "Message cannot be empty"))]
    pub body: String,
}

impl SendMessagePayload {
    pub fn check(&self) -> Result<(), ValidationErrors> {
        let mut checks = Checks::from_derive(self);
        checks.fail_if(is_blank(&self.body), "body", "required", "Message cannot be empty");
        checks.finish()
    }
}

/// `client_id` keeps the snake_case name the messaging widget sends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesQuery {
    pub client_id: Uuid,
}

/// A client's reply into a vendor thread.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReplyPayload {
    pub connection_id: Uuid,
    #[validate(length(min = 1, max = 5000, message = "Message cannot be empty"))]
    pub body: String,
}

impl ReplyPayload {
    pub fn check(&self) -> Result<(), ValidationErrors> {
        let mut checks = Checks::from_derive(self);
        checks.fail_if(is_blank(&self.body), "body", "required", "Message cannot be empty");
        checks.finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadQuery {
    pub connection_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectHistoryQuery {
    pub status: Option<String>,
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan() -> CreatePlanPayload {
        CreatePlanPayload {
            name: "Bulk hiring".into(),
            description: None,
            category: "Recruitment".into(),
            price: Decimal::new(19900, 2),
            currency: None,
            billing_cycle: Some("monthly".into()),
            features: Some(ListInput::Text("Screening, Interviews".into())),
            limitations: None,
            is_active: None,
            popular: None,
        }
    }

    #[test]
    fn plan_price_and_cycle_are_checked() {
        assert!(plan().check().is_ok());

        let mut bad = plan();
        bad.price = Decimal::new(-1, 0);
        bad.billing_cycle = Some("weekly".into());
        let errors = bad.check().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("price"));
        assert!(fields.contains_key("billingCycle"));
    }

    #[test]
    fn connection_type_accepts_known_values() {
        let payload: CreateConnectionPayload = serde_json::from_value(serde_json::json!({
            "name": "Acme HR",
            "email": "hr@acme.io",
            "type": "partner"
        }))
        .unwrap();
        let errors = payload.check().unwrap_err();
        assert!(errors.field_errors().contains_key("type"));
    }

    #[test]
    fn blank_message_is_rejected() {
        let payload = SendMessagePayload { client_id: Uuid::new_v4(), body: "   ".into() };
        assert!(payload.check().is_err());
    }

    #[test]
    fn reply_needs_text() {
        let reply = ReplyPayload { connection_id: Uuid::new_v4(), body: "\n\t".into() };
        assert!(reply.check().unwrap_err().field_errors().contains_key("body"));
        let reply = ReplyPayload { connection_id: Uuid::new_v4(), body: "Sounds good".into() };
        assert!(reply.check().is_ok());
    }
}
