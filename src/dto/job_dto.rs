use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use crate::models::job::{Job, JobStatus};
use crate::utils::validation::{is_blank, is_valid_phone, Checks, ListInput};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobPayload {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Company is required"))]
    pub company: String,
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: String,
    #[validate(length(min = 1, message = "Job type is required"))]
    pub job_type: String,
    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,
    pub salary_min: Option<Decimal>,
    pub salary_max: Option<Decimal>,
    pub currency: Option<String>,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    pub requirements: Option<ListInput>,
    pub benefits: Option<ListInput>,
    pub skills: Option<ListInput>,
    pub deadline: Option<NaiveDate>,
    pub status: Option<String>,
    #[validate(range(min = 1, message = "At least one vacancy is required"))]
    pub vacancies: Option<i32>,
    #[validate(email(message = "Please enter a valid contact email"))]
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
}

impl CreateJobPayload {
    pub fn check(&self, today: NaiveDate) -> Result<JobStatus, ValidationErrors> {
        let status = match self.status.as_deref() {
            None => Some(JobStatus::Draft),
            Some(raw) => raw.parse::<JobStatus>().ok(),
        };
        let mut checks = Checks::from_derive(self);
        checks
            .fail_if(is_blank(&self.title), "title", "required", "Title is required")
            .fail_if(status.is_none(), "status", "status", "Unknown job status")
            .fail_if(
                status == Some(JobStatus::Expired),
                "status",
                "status",
                "A new job cannot be created as expired",
            );
        check_salary(&mut checks, self.salary_min, self.salary_max);
        check_deadline(&mut checks, status, self.deadline, today);
        check_phone(&mut checks, self.contact_phone.as_deref());
        checks.finish()?;
        Ok(status.unwrap_or(JobStatus::Draft))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJobPayload {
    #[validate(length(min = 1, max = 200, message = "Title cannot be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Company cannot be empty"))]
    pub company: Option<String>,
    #[validate(length(min = 1, message = "Location cannot be empty"))]
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub category: Option<String>,
    pub salary_min: Option<Decimal>,
    pub salary_max: Option<Decimal>,
    pub currency: Option<String>,
    #[validate(length(min = 1, message = "Description cannot be empty"))]
    pub description: Option<String>,
    pub requirements: Option<ListInput>,
    pub benefits: Option<ListInput>,
    pub skills: Option<ListInput>,
    pub deadline: Option<NaiveDate>,
    pub status: Option<String>,
    #[validate(range(min = 1, message = "At least one vacancy is required"))]
    pub vacancies: Option<i32>,
    #[validate(email(message = "Please enter a valid contact email"))]
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
}

impl UpdateJobPayload {
    /// Cross-field rules run on the update merged onto the stored job.
    pub fn check(&self, current: &Job, today: NaiveDate) -> Result<Option<JobStatus>, ValidationErrors> {
        let status = self.status.as_deref().map(|raw| raw.parse::<JobStatus>());
        let mut checks = Checks::from_derive(self);
        checks.fail_if(
            matches!(status, Some(Err(_))),
            "status",
            "status",
            "Unknown job status",
        );
        check_salary(
            &mut checks,
            self.salary_min.or(current.salary_min),
            self.salary_max.or(current.salary_max),
        );
        // Untouched schedules are left to the expiry sweep.
        if self.status.is_some() || self.deadline.is_some() {
            let merged_status = match &status {
                Some(parsed) => parsed.as_ref().ok().copied(),
                None => current.status(),
            };
            check_deadline(
                &mut checks,
                merged_status,
                self.deadline.or(current.deadline),
                today,
            );
        }
        check_phone(&mut checks, self.contact_phone.as_deref());
        checks.finish()?;
        Ok(status.and_then(|s| s.ok()))
    }
}

fn check_salary(checks: &mut Checks, min: Option<Decimal>, max: Option<Decimal>) {
    checks
        .fail_if(
            min.map(|v| v.is_sign_negative()).unwrap_or(false),
            "salaryMin",
            "range",
            "Salary cannot be negative",
        )
        .fail_if(
            max.map(|v| v.is_sign_negative()).unwrap_or(false),
            "salaryMax",
            "range",
            "Salary cannot be negative",
        );
    if let (Some(min), Some(max)) = (min, max) {
        checks.fail_if(
            min > max,
            "salaryMax",
            "range",
            "Maximum salary must not be below the minimum",
        );
    }
}

fn check_deadline(
    checks: &mut Checks,
    status: Option<JobStatus>,
    deadline: Option<NaiveDate>,
    today: NaiveDate,
) {
    let past = deadline.map(|d| d < today).unwrap_or(false);
    checks.fail_if(
        past && status == Some(JobStatus::Active),
        "deadline",
        "deadline",
        "The application deadline is already past",
    );
}

fn check_phone(checks: &mut Checks, phone: Option<&str>) {
    checks.fail_if(
        phone.map(|p| !p.trim().is_empty() && !is_valid_phone(p)).unwrap_or(false),
        "contactPhone",
        "phone",
        "Please enter a valid phone number",
    );
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct JobListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub status: Option<String>,
    pub category: Option<String>,
    pub job_type: Option<String>,
    pub location: Option<String>,
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    fn payload() -> CreateJobPayload {
        CreateJobPayload {
            title: "Warehouse Supervisor".into(),
            company: "Acme Logistics".into(),
            location: "Nairobi".into(),
            job_type: "Full-time".into(),
            category: "Logistics".into(),
            salary_min: Some(Decimal::from_str("1200").unwrap()),
            salary_max: Some(Decimal::from_str("1800").unwrap()),
            currency: None,
            description: "Lead the night shift.".into(),
            requirements: Some(ListInput::Text("Forklift licence, 3 years experience".into())),
            benefits: None,
            skills: None,
            deadline: NaiveDate::from_ymd_opt(2026, 11, 30),
            status: Some("Active".into()),
            vacancies: Some(2),
            contact_email: Some("hr@acme.io".into()),
            contact_phone: None,
        }
    }

    #[test]
    fn valid_payload_yields_status() {
        assert_eq!(payload().check(today()).unwrap(), JobStatus::Active);
        let mut draft = payload();
        draft.status = None;
        assert_eq!(draft.check(today()).unwrap(), JobStatus::Draft);
    }

    #[test]
    fn inverted_salary_range_is_rejected() {
        let mut p = payload();
        p.salary_min = Some(Decimal::from_str("5000").unwrap());
        let errors = p.check(today()).unwrap_err();
        assert!(errors.field_errors().contains_key("salaryMax"));
    }

    #[test]
    fn active_job_with_past_deadline_is_rejected() {
        let mut p = payload();
        p.deadline = NaiveDate::from_ymd_opt(2026, 1, 1);
        assert!(p.check(today()).is_err());
        p.status = Some("Draft".into());
        assert!(p.check(today()).is_ok());
    }

    fn stored(status: &str, deadline: Option<NaiveDate>) -> Job {
        let now = chrono::Utc::now();
        Job {
            id: uuid::Uuid::new_v4(),
            title: "Warehouse Supervisor".into(),
            company: "Acme Logistics".into(),
            location: "Nairobi".into(),
            job_type: "Full-time".into(),
            category: "Logistics".into(),
            salary_min: None,
            salary_max: Some(Decimal::from_str("2000").unwrap()),
            currency: "USD".into(),
            description: "Lead the night shift.".into(),
            requirements: vec![],
            benefits: vec![],
            skills: vec![],
            deadline,
            status: status.into(),
            vacancies: 1,
            contact_email: None,
            contact_phone: None,
            posted_by: "hr@acme.io".into(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn update_merges_salary_with_stored_values() {
        let update = UpdateJobPayload {
            salary_min: Some(Decimal::from_str("3000").unwrap()),
            ..Default::default()
        };
        assert!(update.check(&stored("Draft", None), today()).is_err());

        let mut open_ended = stored("Draft", None);
        open_ended.salary_max = None;
        assert!(update.check(&open_ended, today()).is_ok());
    }

    #[test]
    fn update_with_unknown_status_fails() {
        let update = UpdateJobPayload {
            status: Some("Archived".into()),
            ..Default::default()
        };
        assert!(update.check(&stored("Draft", None), today()).is_err());
    }

    #[test]
    fn update_cannot_activate_a_job_past_its_deadline() {
        let past = NaiveDate::from_ymd_opt(2026, 1, 1);
        let activate = UpdateJobPayload {
            status: Some("Active".into()),
            ..Default::default()
        };
        let errors = activate.check(&stored("Draft", past), today()).unwrap_err();
        assert!(errors.field_errors().contains_key("deadline"));

        let backdate = UpdateJobPayload {
            deadline: past,
            ..Default::default()
        };
        assert!(backdate.check(&stored("Active", None), today()).is_err());

        let both = UpdateJobPayload {
            status: Some("Active".into()),
            deadline: NaiveDate::from_ymd_opt(2026, 12, 31),
            ..Default::default()
        };
        assert!(both.check(&stored("Draft", past), today()).is_ok());
    }

    #[test]
    fn unrelated_update_leaves_schedule_to_the_sweep() {
        let rename = UpdateJobPayload {
            title: Some("Night Shift Lead".into()),
            ..Default::default()
        };
        let lapsed = stored("Active", NaiveDate::from_ymd_opt(2026, 1, 1));
        assert_eq!(rename.check(&lapsed, today()).unwrap(), None);
    }
}
