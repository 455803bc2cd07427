use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::filter::Searchable;

pub const CONNECTION_TYPES: [&str; 2] = ["client", "admin"];

/// A contact in a vendor's client book.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ClientConnection {
    pub id: Uuid,
    pub vendor_email: String,
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub connection_type: String,
    pub notes: Option<String>,
    pub unread_messages: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Searchable for ClientConnection {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.email.as_str()];
        if let Some(company) = self.company.as_deref() {
            fields.push(company);
        }
        fields
    }

    fn facet(&self, name: &str) -> Option<&str> {
        match name {
            "type" => Some(self.connection_type.as_str()),
            _ => None,
        }
    }
}
