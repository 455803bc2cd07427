use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::models::payment::PAYMENT_STATUSES;
use crate::models::project::PROJECT_STATUSES;
use crate::utils::validation::Checks;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectPayload {
    #[validate(length(min = 1, max = 200, message = "Project name is required"))]
    pub name: String,
    pub description: Option<String>,
    /// Filled from the session for clients; admins name the client.
    #[validate(email(message = "Please enter a valid client email"))]
    pub client_email: Option<String>,
    #[validate(email(message = "Please enter a valid vendor email"))]
    pub vendor_email: Option<String>,
    pub status: Option<String>,
    pub budget: Option<Decimal>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl CreateProjectPayload {
    pub fn check(&self) -> Result<(), ValidationErrors> {
        let mut checks = Checks::from_derive(self);
        check_project_fields(
            &mut checks,
            self.status.as_deref(),
            self.budget,
            self.start_date,
            self.end_date,
        );
        checks.finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectPayload {
    #[validate(length(min = 1, max = 200, message = "Project name cannot be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(email(message = "Please enter a valid vendor email"))]
    pub vendor_email: Option<String>,
    pub status: Option<String>,
    pub budget: Option<Decimal>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl UpdateProjectPayload {
    pub fn check(&self) -> Result<(), ValidationErrors> {
        let mut checks = Checks::from_derive(self);
        check_project_fields(
            &mut checks,
            self.status.as_deref(),
            self.budget,
            self.start_date,
            self.end_date,
        );
        checks.finish()
    }
}

fn check_project_fields(
    checks: &mut Checks,
    status: Option<&str>,
    budget: Option<Decimal>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) {
    let inverted = matches!((start, end), (Some(s), Some(e)) if e < s);
    checks
        .fail_if(
            status.map(|s| !PROJECT_STATUSES.contains(&s)).unwrap_or(false),
            "status",
            "status",
            "Unknown project status",
        )
        .fail_if(
            budget.map(|b| b < Decimal::ZERO).unwrap_or(false),
            "budget",
            "range",
            "Budget cannot be negative",
        )
        .fail_if(inverted, "endDate", "order", "End date cannot be before start date");
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectQuery {
    pub status: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentPayload {
    #[validate(email(message = "Please enter a valid client email"))]
    pub client_email: String,
    pub project_id: Option<Uuid>,
    pub description: Option<String>,
    pub amount: Decimal,
    pub currency: Option<String>,
    #[validate(length(min = 1, message = "Payment method is required"))]
    pub method: String,
    pub status: Option<String>,
    pub reference: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
}

impl CreatePaymentPayload {
    pub fn check(&self) -> Result<(), ValidationErrors> {
        let mut checks = Checks::from_derive(self);
        checks
            .fail_if(self.amount <= Decimal::ZERO, "amount", "range", "Amount must be greater than 0")
            .fail_if(
                self.status.as_deref().map(|s| !PAYMENT_STATUSES.contains(&s)).unwrap_or(false),
                "status",
                "status",
                "Status must be paid, pending or failed",
            );
        checks.finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct PaymentQuery {
    pub status: Option<String>,
    pub search: Option<String>,
}

/// Payment list plus the totals the history page shows above it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentHistory {
    pub payments: Vec<crate::models::payment::Payment>,
    pub total_paid: Decimal,
    pub total_pending: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_dates_must_be_ordered() {
        let payload = UpdateProjectPayload {
            start_date: NaiveDate::from_ymd_opt(2026, 6, 1),
            end_date: NaiveDate::from_ymd_opt(2026, 5, 1),
            ..Default::default()
        };
        let errors = payload.check().unwrap_err();
        assert!(errors.field_errors().contains_key("endDate"));
    }

    #[test]
    fn unknown_project_status_is_rejected() {
        let payload = UpdateProjectPayload {
            status: Some("archived".into()),
            ..Default::default()
        };
        assert!(payload.check().is_err());
        let payload = UpdateProjectPayload {
            status: Some("on-hold".into()),
            ..Default::default()
        };
        assert!(payload.check().is_ok());
    }

    #[test]
    fn payments_need_a_positive_amount() {
        let payload = CreatePaymentPayload {
            client_email: "client@acme.io".into(),
            project_id: None,
            description: None,
            amount: Decimal::ZERO,
            currency: None,
            method: "bank".into(),
            status: Some("refunded".into()),
            reference: None,
            paid_at: None,
        };
        let errors = payload.check().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("amount"));
        assert!(fields.contains_key("status"));
    }
}
