use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::envelope::{page_window, Page};
use crate::dto::job_dto::{CreateJobPayload, JobListQuery, UpdateJobPayload};
use crate::error::{Error, Result};
use crate::models::job::{Job, JobStatus, PostedJob};
use crate::utils::validation::ListInput;

pub(crate) const JOB_COLUMNS: &str = "id, title, company, location, job_type, category, salary_min, salary_max, currency, description, requirements, benefits, skills, deadline, status, vacancies, contact_email, contact_phone, posted_by, created_at, updated_at";

#[derive(Clone)]
pub struct JobService {
    pool: PgPool,
}

fn list_or_empty(input: Option<ListInput>) -> Vec<String> {
    input.map(ListInput::into_vec).unwrap_or_default()
}

impl JobService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        payload: CreateJobPayload,
        status: JobStatus,
        posted_by: &str,
    ) -> Result<Job> {
        let sql = format!(
            "INSERT INTO jobs (
                title, company, location, job_type, category,
                salary_min, salary_max, currency, description, requirements,
                benefits, skills, deadline, status, vacancies,
                contact_email, contact_phone, posted_by
            ) VALUES (
                $1, $2, $3, $4, $5,
                $6, $7, COALESCE($8, 'USD'), $9, $10,
                $11, $12, $13, $14, COALESCE($15, 1),
                $16, $17, $18
            )
            RETURNING {}",
            JOB_COLUMNS
        );
        let job = sqlx::query_as::<_, Job>(&sql)
            .bind(payload.title.trim())
            .bind(payload.company.trim())
            .bind(payload.location.trim())
            .bind(payload.job_type)
            .bind(payload.category)
            .bind(payload.salary_min)
            .bind(payload.salary_max)
            .bind(payload.currency)
            .bind(payload.description)
            .bind(list_or_empty(payload.requirements))
            .bind(list_or_empty(payload.benefits))
            .bind(list_or_empty(payload.skills))
            .bind(payload.deadline)
            .bind(status.as_str())
            .bind(payload.vacancies)
            .bind(payload.contact_email)
            .bind(payload.contact_phone)
            .bind(posted_by)
            .fetch_one(&self.pool)
            .await?;

        tracing::info!(job_id = %job.id, posted_by, "job created");
        Ok(job)
    }

    pub async fn update(
        &self,
        id: Uuid,
        payload: UpdateJobPayload,
        status: Option<JobStatus>,
    ) -> Result<Job> {
        let sql = format!(
            "UPDATE jobs
             SET title = COALESCE($2, title),
                 company = COALESCE($3, company),
                 location = COALESCE($4, location),
                 job_type = COALESCE($5, job_type),
                 category = COALESCE($6, category),
                 salary_min = COALESCE($7, salary_min),
                 salary_max = COALESCE($8, salary_max),
                 currency = COALESCE($9, currency),
                 description = COALESCE($10, description),
                 requirements = COALESCE($11, requirements),
                 benefits = COALESCE($12, benefits),
                 skills = COALESCE($13, skills),
                 deadline = COALESCE($14, deadline),
                 status = COALESCE($15, status),
                 vacancies = COALESCE($16, vacancies),
                 contact_email = COALESCE($17, contact_email),
                 contact_phone = COALESCE($18, contact_phone),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            JOB_COLUMNS
        );
        let job = sqlx::query_as::<_, Job>(&sql)
            .bind(id)
            .bind(payload.title)
            .bind(payload.company)
            .bind(payload.location)
            .bind(payload.job_type)
            .bind(payload.category)
            .bind(payload.salary_min)
            .bind(payload.salary_max)
            .bind(payload.currency)
            .bind(payload.description)
            .bind(payload.requirements.map(ListInput::into_vec))
            .bind(payload.benefits.map(ListInput::into_vec))
            .bind(payload.skills.map(ListInput::into_vec))
            .bind(payload.deadline)
            .bind(status.map(|s| s.as_str()))
            .bind(payload.vacancies)
            .bind(payload.contact_email)
            .bind(payload.contact_phone)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Job not found".into()))?;
        Ok(job)
    }

    /// Paged, filtered listing. `public_only` restricts to jobs open for
    /// applications regardless of the status filter.
    pub async fn list(&self, query: JobListQuery, public_only: bool) -> Result<Page<Job>> {
        let (page, per_page, offset) = page_window(query.page, query.per_page);

        let mut filters = Vec::new();
        let mut args: Vec<String> = Vec::new();

        if public_only {
            filters.push(format!("status = '{}'", JobStatus::Active.as_str()));
        } else if let Some(status) = query.status.filter(|s| !s.is_empty() && s != "all") {
            filters.push(format!("status = ${}", args.len() + 1));
            args.push(status);
        }
        if let Some(category) = query.category.filter(|s| !s.is_empty() && s != "all") {
            filters.push(format!("category = ${}", args.len() + 1));
            args.push(category);
        }
        if let Some(job_type) = query.job_type.filter(|s| !s.is_empty() && s != "all") {
            filters.push(format!("job_type = ${}", args.len() + 1));
            args.push(job_type);
        }
        if let Some(location) = query.location.filter(|s| !s.trim().is_empty()) {
            filters.push(format!("location ILIKE ${}", args.len() + 1));
            args.push(format!("%{}%", location.trim()));
        }
        if let Some(search) = query.search.filter(|s| !s.trim().is_empty()) {
            let n = args.len() + 1;
            filters.push(format!(
                "(title ILIKE ${n} OR company ILIKE ${n} OR location ILIKE ${n})"
            ));
            args.push(format!("%{}%", search.trim()));
        }

        let where_clause = if filters.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", filters.join(" AND "))
        };

        let items_query = format!(
            "SELECT {} FROM jobs {} ORDER BY created_at DESC LIMIT ${} OFFSET ${}",
            JOB_COLUMNS,
            where_clause,
            args.len() + 1,
            args.len() + 2
        );
        let total_query = format!("SELECT COUNT(*) FROM jobs {}", where_clause);

        let mut items_statement = sqlx::query_as::<_, Job>(&items_query);
        for value in &args {
            items_statement = items_statement.bind(value);
        }
        let items = items_statement
            .bind(per_page)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        let mut total_statement = sqlx::query_scalar::<_, i64>(&total_query);
        for value in &args {
            total_statement = total_statement.bind(value);
        }
        let total = total_statement.fetch_one(&self.pool).await?;

        Ok(Page::new(items, total, page, per_page))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Job> {
        let sql = format!("SELECT {} FROM jobs WHERE id = $1", JOB_COLUMNS);
        sqlx::query_as::<_, Job>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Job not found".into()))
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let res = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(Error::NotFound("Job not found".into()));
        }
        Ok(())
    }

    /// Jobs posted by `email`, each with its number of applications.
    pub async fn posted_by(&self, email: &str) -> Result<Vec<PostedJob>> {
        let columns = JOB_COLUMNS
            .split(", ")
            .map(|c| format!("j.{}", c))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "SELECT {}, COUNT(a.id) AS applicant_count
             FROM jobs j
             LEFT JOIN applications a ON a.job_id = j.id
             WHERE j.posted_by = $1
             GROUP BY j.id
             ORDER BY j.created_at DESC",
            columns
        );
        let jobs = sqlx::query_as::<_, PostedJob>(&sql)
            .bind(email)
            .fetch_all(&self.pool)
            .await?;
        Ok(jobs)
    }

    pub async fn recent(&self, limit: i64) -> Result<Vec<Job>> {
        let sql = format!(
            "SELECT {} FROM jobs ORDER BY created_at DESC LIMIT $1",
            JOB_COLUMNS
        );
        let jobs = sqlx::query_as::<_, Job>(&sql)
            .bind(limit.clamp(1, 50))
            .fetch_all(&self.pool)
            .await?;
        Ok(jobs)
    }

    /// Marks active jobs whose deadline is before `today` as expired.
    pub async fn expire_past_deadline(&self, today: NaiveDate) -> Result<u64> {
        let res = sqlx::query(
            "UPDATE jobs SET status = $1, updated_at = NOW()
             WHERE status = $2 AND deadline IS NOT NULL AND deadline < $3",
        )
        .bind(JobStatus::Expired.as_str())
        .bind(JobStatus::Active.as_str())
        .bind(today)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected())
    }
}
