use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::filter::Searchable;

pub const EMPLOYEE_STATUSES: [&str; 3] = ["active", "inactive", "on-leave"];

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub department: String,
    pub position: String,
    pub salary: Option<Decimal>,
    pub join_date: Option<NaiveDate>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Searchable for Employee {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.email.as_str(), self.position.as_str()]
    }

    fn facet(&self, name: &str) -> Option<&str> {
        match name {
            "department" => Some(self.department.as_str()),
            "status" => Some(self.status.as_str()),
            _ => None,
        }
    }
}
