use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::filter::Searchable;

pub const PAYMENT_STATUSES: [&str; 3] = ["paid", "pending", "failed"];

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Uuid,
    pub client_email: String,
    pub project_id: Option<Uuid>,
    pub description: Option<String>,
    pub amount: Decimal,
    pub currency: String,
    pub method: String,
    pub status: String,
    pub reference: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Searchable for Payment {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.method.as_str()];
        if let Some(reference) = self.reference.as_deref() {
            fields.push(reference);
        }
        if let Some(description) = self.description.as_deref() {
            fields.push(description);
        }
        fields
    }

    fn facet(&self, name: &str) -> Option<&str> {
        match name {
            "status" => Some(self.status.as_str()),
            _ => None,
        }
    }
}
