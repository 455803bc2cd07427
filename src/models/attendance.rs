use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::filter::Searchable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Leave,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::Leave => "leave",
        }
    }
}

impl std::str::FromStr for AttendanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "present" => Ok(AttendanceStatus::Present),
            "absent" => Ok(AttendanceStatus::Absent),
            "leave" => Ok(AttendanceStatus::Leave),
            other => Err(format!("Unknown attendance status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: Uuid,
    pub employee_email: String,
    pub employee_name: String,
    pub department: Option<String>,
    pub date: NaiveDate,
    pub status: String,
    pub check_in: Option<NaiveTime>,
    pub check_out: Option<NaiveTime>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AttendanceRecord {
    /// Worked hours, when both punches are present.
    pub fn hours_worked(&self) -> Option<f64> {
        match (self.check_in, self.check_out) {
            (Some(start), Some(end)) if end > start => {
                Some((end - start).num_minutes() as f64 / 60.0)
            }
            _ => None,
        }
    }
}

impl Searchable for AttendanceRecord {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.employee_name.as_str(), self.employee_email.as_str()]
    }

    fn facet(&self, name: &str) -> Option<&str> {
        match name {
            "status" => Some(self.status.as_str()),
            "department" => self.department.as_deref(),
            _ => None,
        }
    }
}

/// Per-day counts used by the weekly and monthly charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DailyAttendance {
    pub date: NaiveDate,
    pub present: i64,
    pub absent: i64,
    pub leave: i64,
}

impl DailyAttendance {
    pub fn total(&self) -> i64 {
        self.present + self.absent + self.leave
    }

    /// Share of present records, in percent with one decimal.
    pub fn rate(&self) -> f64 {
        attendance_rate(self.present, self.total())
    }
}

pub fn attendance_rate(present: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    ((present as f64 / total as f64) * 1000.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_rounds_to_one_decimal() {
        assert_eq!(attendance_rate(2, 3), 66.7);
        assert_eq!(attendance_rate(0, 0), 0.0);
        let day = DailyAttendance {
            date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            present: 8,
            absent: 1,
            leave: 1,
        };
        assert_eq!(day.total(), 10);
        assert_eq!(day.rate(), 80.0);
    }

    #[test]
    fn hours_need_both_punches_in_order() {
        let mut record = AttendanceRecord {
            id: Uuid::new_v4(),
            employee_email: "amina@corp.io".into(),
            employee_name: "Amina".into(),
            department: Some("Sales".into()),
            date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            status: "present".into(),
            check_in: NaiveTime::from_hms_opt(9, 0, 0),
            check_out: NaiveTime::from_hms_opt(17, 30, 0),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(record.hours_worked(), Some(8.5));
        record.check_out = None;
        assert_eq!(record.hours_worked(), None);
    }
}
