use chrono::{NaiveDate, NaiveTime};
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::application_dto::{ApplicationListQuery, ApplyPayload, ScheduleInterviewPayload};
use crate::error::{Error, Result};
use crate::models::application::{Application, ApplicationStatus};
use crate::models::job::Job;

const APPLICATION_COLUMNS: &str = "id, job_id, applicant_name, applicant_email, phone, position, status, cover_letter, resume_url, interview_date, interview_time, interview_duration, interview_type, meeting_link, interviewer, notes, created_at, updated_at";

#[derive(Clone)]
pub struct ApplicationService {
    pool: PgPool,
}

impl ApplicationService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Files an application against an open job. One application per
    /// applicant per job.
    pub async fn apply(
        &self,
        job: &Job,
        payload: ApplyPayload,
        applicant_email: &str,
        applicant_name: &str,
        today: NaiveDate,
    ) -> Result<Application> {
        let open = job.status().map(|s| s.accepts_applications()).unwrap_or(false);
        if !open || job.is_past_deadline(today) {
            return Err(Error::BadRequest("This job is not accepting applications".into()));
        }

        let name = payload
            .applicant_name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| applicant_name.to_string());
        let sql = format!(
            "INSERT INTO applications (job_id, applicant_name, applicant_email, phone, position, status, cover_letter, resume_url)
             VALUES ($1, $2, LOWER($3), $4, $5, $6, $7, $8)
             RETURNING {}",
            APPLICATION_COLUMNS
        );
        let application = sqlx::query_as::<_, Application>(&sql)
            .bind(job.id)
            .bind(name)
            .bind(applicant_email)
            .bind(payload.phone)
            .bind(&job.title)
            .bind(ApplicationStatus::UnderReview.as_str())
            .bind(payload.cover_letter)
            .bind(payload.resume_url)
            .fetch_one(&self.pool)
            .await
            .map_err(|err| match Error::from(err) {
                Error::Conflict(_) => Error::Conflict("You have already applied for this job".into()),
                other => other,
            })?;

        tracing::info!(application_id = %application.id, job_id = %job.id, "application received");
        Ok(application)
    }

    pub async fn list(&self, query: ApplicationListQuery) -> Result<Vec<Application>> {
        let mut filters = Vec::new();
        let mut status_arg = None;
        let mut search_arg = None;

        if let Some(status) = query.status.filter(|s| !s.is_empty() && s != "all") {
            filters.push(format!("status = ${}", filters.len() + 1));
            status_arg = Some(status);
        }
        if let Some(search) = query.search.filter(|s| !s.trim().is_empty()) {
            let n = filters.len() + 1;
            filters.push(format!(
                "(applicant_name ILIKE ${n} OR applicant_email ILIKE ${n} OR position ILIKE ${n})"
            ));
            search_arg = Some(format!("%{}%", search.trim()));
        }
        if query.job_id.is_some() {
            filters.push(format!("job_id = ${}", filters.len() + 1));
        }

        let where_clause = if filters.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", filters.join(" AND "))
        };
        let sql = format!(
            "SELECT {} FROM applications {} ORDER BY created_at DESC",
            APPLICATION_COLUMNS, where_clause
        );

        let mut statement = sqlx::query_as::<_, Application>(&sql);
        if let Some(status) = status_arg {
            statement = statement.bind(status);
        }
        if let Some(search) = search_arg {
            statement = statement.bind(search);
        }
        if let Some(job_id) = query.job_id {
            statement = statement.bind(job_id);
        }
        Ok(statement.fetch_all(&self.pool).await?)
    }

    pub async fn for_job(&self, job_id: Uuid) -> Result<Vec<Application>> {
        self.list(ApplicationListQuery {
            job_id: Some(job_id),
            ..Default::default()
        })
        .await
    }

    pub async fn for_applicant(&self, email: &str) -> Result<Vec<Application>> {
        let sql = format!(
            "SELECT {} FROM applications WHERE applicant_email = LOWER($1) ORDER BY created_at DESC",
            APPLICATION_COLUMNS
        );
        let items = sqlx::query_as::<_, Application>(&sql)
            .bind(email)
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Application> {
        let sql = format!("SELECT {} FROM applications WHERE id = $1", APPLICATION_COLUMNS);
        sqlx::query_as::<_, Application>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Application not found".into()))
    }

    pub async fn update_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
        notes: Option<String>,
    ) -> Result<Application> {
        let sql = format!(
            "UPDATE applications
             SET status = $2, notes = COALESCE($3, notes), updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            APPLICATION_COLUMNS
        );
        sqlx::query_as::<_, Application>(&sql)
            .bind(id)
            .bind(status.as_str())
            .bind(notes)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Application not found".into()))
    }

    /// Records the interview slot and moves the application to
    /// `interview-scheduled`.
    pub async fn schedule_interview(
        &self,
        id: Uuid,
        payload: ScheduleInterviewPayload,
        time: NaiveTime,
    ) -> Result<Application> {
        let sql = format!(
            "UPDATE applications
             SET status = $2,
                 interview_date = $3,
                 interview_time = $4,
                 interview_duration = $5,
                 interview_type = $6,
                 meeting_link = $7,
                 interviewer = $8,
                 notes = COALESCE($9, notes),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            APPLICATION_COLUMNS
        );
        let application = sqlx::query_as::<_, Application>(&sql)
            .bind(id)
            .bind(ApplicationStatus::InterviewScheduled.as_str())
            .bind(payload.date)
            .bind(time)
            .bind(payload.duration)
            .bind(payload.interview_type.as_str())
            .bind(payload.meeting_link)
            .bind(payload.interviewer.trim())
            .bind(payload.notes)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Application not found".into()))?;

        tracing::info!(application_id = %id, date = ?application.interview_date, "interview scheduled");
        Ok(application)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let res = sqlx::query("DELETE FROM applications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(Error::NotFound("Application not found".into()));
        }
        Ok(())
    }
}
