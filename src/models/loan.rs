use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::filter::Searchable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    Pending,
    Approved,
    Rejected,
    Completed,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Pending => "pending",
            LoanStatus::Approved => "approved",
            LoanStatus::Rejected => "rejected",
            LoanStatus::Completed => "completed",
        }
    }

    pub fn can_become(&self, next: LoanStatus) -> bool {
        matches!(
            (self, next),
            (LoanStatus::Pending, LoanStatus::Approved)
                | (LoanStatus::Pending, LoanStatus::Rejected)
                | (LoanStatus::Approved, LoanStatus::Completed)
        )
    }
}

impl std::str::FromStr for LoanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(LoanStatus::Pending),
            "approved" => Ok(LoanStatus::Approved),
            "rejected" => Ok(LoanStatus::Rejected),
            "completed" => Ok(LoanStatus::Completed),
            other => Err(format!("Unknown loan status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LoanRequest {
    pub id: Uuid,
    pub employee_email: String,
    pub employee_name: String,
    pub loan_type: String,
    pub amount: Decimal,
    pub purpose: String,
    pub repayment_months: i32,
    pub monthly_installment: Decimal,
    pub status: String,
    pub admin_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Searchable for LoanRequest {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.employee_name.as_str(),
            self.employee_email.as_str(),
            self.purpose.as_str(),
        ]
    }

    fn facet(&self, name: &str) -> Option<&str> {
        match name {
            "status" => Some(self.status.as_str()),
            "loanType" => Some(self.loan_type.as_str()),
            _ => None,
        }
    }
}

/// Equal monthly split of the principal, rounded to cents.
pub fn monthly_installment(amount: Decimal, repayment_months: i32) -> Decimal {
    if repayment_months <= 0 {
        return Decimal::ZERO;
    }
    (amount / Decimal::from(repayment_months)).round_dp(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn installment_rounds_to_cents() {
        let amount = Decimal::from_str("1000").unwrap();
        assert_eq!(monthly_installment(amount, 3), Decimal::from_str("333.33").unwrap());
        assert_eq!(monthly_installment(amount, 4), Decimal::from_str("250").unwrap());
        assert_eq!(monthly_installment(amount, 0), Decimal::ZERO);
    }

    #[test]
    fn loan_lifecycle() {
        assert!(LoanStatus::Pending.can_become(LoanStatus::Approved));
        assert!(LoanStatus::Approved.can_become(LoanStatus::Completed));
        assert!(!LoanStatus::Pending.can_become(LoanStatus::Completed));
        assert!(!LoanStatus::Rejected.can_become(LoanStatus::Approved));
        assert!(!LoanStatus::Completed.can_become(LoanStatus::Pending));
    }
}
