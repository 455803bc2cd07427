use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::filter::Searchable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    Draft,
    Active,
    Paused,
    Completed,
    Expired,
}

impl JobStatus {
    pub const ALL: [JobStatus; 5] = [
        JobStatus::Draft,
        JobStatus::Active,
        JobStatus::Paused,
        JobStatus::Completed,
        JobStatus::Expired,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Draft => "Draft",
            JobStatus::Active => "Active",
            JobStatus::Paused => "Paused",
            JobStatus::Completed => "Completed",
            JobStatus::Expired => "Expired",
        }
    }

    /// Only active postings accept new applications.
    pub fn accepts_applications(&self) -> bool {
        matches!(self, JobStatus::Active)
    }
}

impl std::str::FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JobStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown job status: {}", s))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub location: String,
    pub job_type: String,
    pub category: String,
    pub salary_min: Option<Decimal>,
    pub salary_max: Option<Decimal>,
    pub currency: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub benefits: Vec<String>,
    pub skills: Vec<String>,
    pub deadline: Option<NaiveDate>,
    pub status: String,
    pub vacancies: i32,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub posted_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn status(&self) -> Option<JobStatus> {
        self.status.parse().ok()
    }

    pub fn is_past_deadline(&self, today: NaiveDate) -> bool {
        self.deadline.map(|d| d < today).unwrap_or(false)
    }
}

impl Searchable for Job {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.company.as_str(), self.location.as_str()]
    }

    fn facet(&self, name: &str) -> Option<&str> {
        match name {
            "status" => Some(self.status.as_str()),
            "category" => Some(self.category.as_str()),
            "jobType" => Some(self.job_type.as_str()),
            "location" => Some(self.location.as_str()),
            _ => None,
        }
    }
}

/// Job row joined with its application count, as shown on the client's
/// "posted jobs" screen.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PostedJob {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub job: Job,
    pub applicant_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_display_names() {
        for status in JobStatus::ALL {
            assert_eq!(status.as_str().parse::<JobStatus>().unwrap(), status);
        }
        assert_eq!("active".parse::<JobStatus>().unwrap(), JobStatus::Active);
        assert!("Archived".parse::<JobStatus>().is_err());
    }

    #[test]
    fn only_active_jobs_accept_applications() {
        assert!(JobStatus::Active.accepts_applications());
        assert!(!JobStatus::Paused.accepts_applications());
        assert!(!JobStatus::Expired.accepts_applications());
    }
}
