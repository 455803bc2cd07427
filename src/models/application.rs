use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::filter::Searchable;

/// Application pipeline statuses. The mixed spelling is the wire format the
/// dashboards already use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationStatus {
    #[serde(rename = "Under Review")]
    UnderReview,
    #[serde(rename = "Approved")]
    Approved,
    #[serde(rename = "Rejected")]
    Rejected,
    #[serde(rename = "shortlisted")]
    Shortlisted,
    #[serde(rename = "interview-scheduled")]
    InterviewScheduled,
    #[serde(rename = "hired")]
    Hired,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 6] = [
        ApplicationStatus::UnderReview,
        ApplicationStatus::Approved,
        ApplicationStatus::Rejected,
        ApplicationStatus::Shortlisted,
        ApplicationStatus::InterviewScheduled,
        ApplicationStatus::Hired,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::UnderReview => "Under Review",
            ApplicationStatus::Approved => "Approved",
            ApplicationStatus::Rejected => "Rejected",
            ApplicationStatus::Shortlisted => "shortlisted",
            ApplicationStatus::InterviewScheduled => "interview-scheduled",
            ApplicationStatus::Hired => "hired",
        }
    }
}

impl std::str::FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ApplicationStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("Unknown application status: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InterviewType {
    Video,
    Phone,
    InPerson,
}

impl InterviewType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewType::Video => "video",
            InterviewType::Phone => "phone",
            InterviewType::InPerson => "in-person",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: Uuid,
    pub job_id: Uuid,
    pub applicant_name: String,
    pub applicant_email: String,
    pub phone: Option<String>,
    pub position: String,
    pub status: String,
    pub cover_letter: Option<String>,
    pub resume_url: Option<String>,
    pub interview_date: Option<NaiveDate>,
    pub interview_time: Option<NaiveTime>,
    pub interview_duration: Option<i32>,
    pub interview_type: Option<String>,
    pub meeting_link: Option<String>,
    pub interviewer: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Searchable for Application {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.applicant_name.as_str(),
            self.applicant_email.as_str(),
            self.position.as_str(),
        ]
    }

    fn facet(&self, name: &str) -> Option<&str> {
        match name {
            "status" => Some(self.status.as_str()),
            "position" => Some(self.position.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_keep_dashboard_spelling() {
        assert_eq!(
            serde_json::to_value(ApplicationStatus::InterviewScheduled).unwrap(),
            "interview-scheduled"
        );
        assert_eq!(
            "under review".parse::<ApplicationStatus>().unwrap(),
            ApplicationStatus::UnderReview
        );
        assert_eq!("Hired".parse::<ApplicationStatus>().unwrap(), ApplicationStatus::Hired);
        assert!("withdrawn".parse::<ApplicationStatus>().is_err());
    }

    #[test]
    fn interview_type_uses_kebab_case() {
        let parsed: InterviewType = serde_json::from_str("\"in-person\"").unwrap();
        assert_eq!(parsed, InterviewType::InPerson);
        assert_eq!(parsed.as_str(), "in-person");
    }
}
