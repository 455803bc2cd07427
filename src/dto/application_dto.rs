use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::models::application::{ApplicationStatus, InterviewType};
use crate::utils::time::parse_time;
use crate::utils::validation::{is_blank, is_valid_phone, Checks};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ApplyPayload {
    pub job_id: Uuid,
    #[validate(length(min = 1, max = 120, message = "Name cannot be empty"))]
    pub applicant_name: Option<String>,
    pub phone: Option<String>,
    #[validate(length(max = 5000, message = "Cover letter is too long"))]
    pub cover_letter: Option<String>,
    #[validate(length(min = 1, message = "Resume link cannot be empty"))]
    pub resume_url: Option<String>,
}

impl ApplyPayload {
    pub fn check(&self) -> Result<(), ValidationErrors> {
        let mut checks = Checks::from_derive(self);
        checks.fail_if(
            self.phone.as_deref().map(|p| !is_valid_phone(p)).unwrap_or(false),
            "phone",
            "phone",
            "Please enter a valid phone number",
        );
        checks.finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateApplicationPayload {
    pub status: String,
    #[validate(length(max = 2000, message = "Notes are too long"))]
    pub notes: Option<String>,
}

impl UpdateApplicationPayload {
    pub fn check(&self) -> Result<ApplicationStatus, ValidationErrors> {
        let status = self.status.parse::<ApplicationStatus>().ok();
        let mut checks = Checks::from_derive(self);
        checks.fail_if(status.is_none(), "status", "status", "Unknown application status");
        checks.finish()?;
        Ok(status.unwrap_or(ApplicationStatus::UnderReview))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleInterviewPayload {
    pub date: NaiveDate,
    pub time: String,
    #[validate(range(min = 15, max = 480, message = "Duration must be between 15 and 480 minutes"))]
    pub duration: i32,
    #[serde(rename = "type")]
    pub interview_type: InterviewType,
    #[validate(url(message = "Meeting link must be a valid URL"))]
    pub meeting_link: Option<String>,
    #[validate(length(min = 1, message = "Interviewer is required"))]
    pub interviewer: String,
    pub notes: Option<String>,
}

impl ScheduleInterviewPayload {
    pub fn check(&self, today: NaiveDate) -> Result<NaiveTime, ValidationErrors> {
        let time = parse_time(&self.time);
        let missing_link = self
            .meeting_link
            .as_deref()
            .map(is_blank)
            .unwrap_or(true);
        let mut checks = Checks::from_derive(self);
        checks
            .fail_if(time.is_none(), "time", "time", "Time must be HH:MM")
            .fail_if(self.date < today, "date", "date", "Interview date cannot be in the past")
            .fail_if(
                self.interview_type == InterviewType::Video && missing_link,
                "meetingLink",
                "required",
                "Video interviews need a meeting link",
            )
            .fail_if(is_blank(&self.interviewer), "interviewer", "required", "Interviewer is required");
        checks.finish()?;
        time.ok_or_else(ValidationErrors::new)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ApplicationListQuery {
    pub status: Option<String>,
    pub search: Option<String>,
    pub job_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interview(kind: InterviewType, link: Option<&str>) -> ScheduleInterviewPayload {
        ScheduleInterviewPayload {
            date: NaiveDate::from_ymd_opt(2026, 10, 20).unwrap(),
            time: "14:30".into(),
            duration: 45,
            interview_type: kind,
            meeting_link: link.map(str::to_string),
            interviewer: "Ruth Achieng".into(),
            notes: None,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    #[test]
    fn video_interview_needs_a_link() {
        let errors = interview(InterviewType::Video, None).check(today()).unwrap_err();
        assert!(errors.field_errors().contains_key("meetingLink"));
        assert!(interview(InterviewType::Video, Some("https://meet.example.com/abc"))
            .check(today())
            .is_ok());
        assert!(interview(InterviewType::Phone, None).check(today()).is_ok());
    }

    #[test]
    fn interview_time_is_parsed() {
        let time = interview(InterviewType::InPerson, None).check(today()).unwrap();
        assert_eq!(time, NaiveTime::from_hms_opt(14, 30, 0).unwrap());

        let mut bad = interview(InterviewType::InPerson, None);
        bad.time = "half past two".into();
        assert!(bad.check(today()).is_err());
    }

    #[test]
    fn past_dates_and_bad_durations_fail() {
        let mut p = interview(InterviewType::Phone, None);
        p.date = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
        p.duration = 5;
        let errors = p.check(today()).unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("date"));
        assert!(fields.contains_key("duration"));
    }

    #[test]
    fn status_update_validates_known_statuses() {
        let ok = UpdateApplicationPayload { status: "shortlisted".into(), notes: None };
        assert_eq!(ok.check().unwrap(), ApplicationStatus::Shortlisted);
        let bad = UpdateApplicationPayload { status: "ghosted".into(), notes: None };
        assert!(bad.check().is_err());
    }
}
