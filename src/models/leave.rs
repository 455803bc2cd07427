use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::filter::Searchable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

impl LeaveStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveStatus::Pending => "pending",
            LeaveStatus::Approved => "approved",
            LeaveStatus::Rejected => "rejected",
        }
    }

    /// A request is decided exactly once, from pending.
    pub fn can_become(&self, next: LeaveStatus) -> bool {
        matches!(
            (self, next),
            (LeaveStatus::Pending, LeaveStatus::Approved) | (LeaveStatus::Pending, LeaveStatus::Rejected)
        )
    }
}

impl std::str::FromStr for LeaveStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(LeaveStatus::Pending),
            "approved" => Ok(LeaveStatus::Approved),
            "rejected" => Ok(LeaveStatus::Rejected),
            other => Err(format!("Unknown leave status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequest {
    pub id: Uuid,
    pub employee_email: String,
    pub employee_name: String,
    pub leave_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: Option<String>,
    pub status: String,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LeaveRequest {
    pub fn days(&self) -> i64 {
        leave_days(self.start_date, self.end_date)
    }
}

/// Inclusive day count of a leave range; zero for an inverted range.
pub fn leave_days(start: NaiveDate, end: NaiveDate) -> i64 {
    if end < start {
        return 0;
    }
    (end - start).num_days() + 1
}

impl Searchable for LeaveRequest {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.employee_name.as_str(), self.employee_email.as_str()]
    }

    fn facet(&self, name: &str) -> Option<&str> {
        match name {
            "status" => Some(self.status.as_str()),
            "leaveType" => Some(self.leave_type.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_pending_requests_can_be_decided() {
        assert!(LeaveStatus::Pending.can_become(LeaveStatus::Approved));
        assert!(LeaveStatus::Pending.can_become(LeaveStatus::Rejected));
        assert!(!LeaveStatus::Approved.can_become(LeaveStatus::Rejected));
        assert!(!LeaveStatus::Rejected.can_become(LeaveStatus::Approved));
        assert!(!LeaveStatus::Pending.can_become(LeaveStatus::Pending));
    }

    #[test]
    fn leave_days_are_inclusive() {
        let start = NaiveDate::from_ymd_opt(2026, 5, 4).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 5, 8).unwrap();
        assert_eq!(leave_days(start, end), 5);
        assert_eq!(leave_days(start, start), 1);
        assert_eq!(leave_days(end, start), 0);
    }
}
