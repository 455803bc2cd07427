use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::IntoResponse,
    Extension, Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    dto::envelope::{created, ok},
    dto::job_dto::{CreateJobPayload, JobListQuery, UpdateJobPayload},
    error::{Error, Result},
    middleware::auth::{optional_claims, Claims},
    models::job::JobStatus,
    utils::time::today,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/jobs",
    params(
        ("page" = Option<i64>, Query, description = "Page number"),
        ("perPage" = Option<i64>, Query, description = "Items per page"),
        ("status" = Option<String>, Query, description = "Filter by status (admins only)"),
        ("category" = Option<String>, Query, description = "Filter by category"),
        ("jobType" = Option<String>, Query, description = "Filter by job type"),
        ("location" = Option<String>, Query, description = "Location contains"),
        ("search" = Option<String>, Query, description = "Search title, company and location")
    ),
    responses(
        (status = 200, description = "Paged list of jobs")
    )
)]
#[axum::debug_handler]
pub async fn list_jobs(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<JobListQuery>,
) -> Result<impl IntoResponse> {
    let is_admin = optional_claims(&headers).map(|c| c.is_admin()).unwrap_or(false);
    let page = state.job_service.list(query, !is_admin).await?;
    Ok(ok(page))
}

#[utoipa::path(
    get,
    path = "/api/jobs/{id}",
    params(
        ("id" = Uuid, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Job found"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn get_job(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let job = state.job_service.get_by_id(id).await?;
    if job.status() == Some(JobStatus::Draft) {
        let can_see = optional_claims(&headers)
            .map(|c| c.ensure_owner_or_admin(&job.posted_by).is_ok())
            .unwrap_or(false);
        if !can_see {
            return Err(Error::NotFound("Job not found".into()));
        }
    }
    Ok(ok(job))
}

#[utoipa::path(
    post,
    path = "/api/jobs",
    request_body = CreateJobPayload,
    responses(
        (status = 201, description = "Job created"),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Missing session"),
        (status = 403, description = "Role not allowed")
    )
)]
#[axum::debug_handler]
pub async fn create_job(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateJobPayload>,
) -> Result<impl IntoResponse> {
    let status = payload.check(today())?;
    let job = state.job_service.create(payload, status, &claims.email).await?;
    Ok(created(job))
}

#[utoipa::path(
    put,
    path = "/api/jobs/{id}",
    params(
        ("id" = Uuid, Path, description = "Job ID")
    ),
    request_body = UpdateJobPayload,
    responses(
        (status = 200, description = "Job updated"),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn update_job(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateJobPayload>,
) -> Result<impl IntoResponse> {
    let current = state.job_service.get_by_id(id).await?;
    claims.ensure_owner_or_admin(&current.posted_by)?;
    let status = payload.check(&current, today())?;
    let job = state.job_service.update(id, payload, status).await?;
    Ok(ok(job))
}

#[utoipa::path(
    delete,
    path = "/api/jobs/{id}",
    params(
        ("id" = Uuid, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Job deleted"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_job(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let current = state.job_service.get_by_id(id).await?;
    claims.ensure_owner_or_admin(&current.posted_by)?;
    state.job_service.delete(id).await?;
    state
        .audit_service
        .record(&claims.email, "delete", "job", id, Some(json!({ "title": current.title })))
        .await;
    Ok(ok(json!({ "id": id })))
}

#[utoipa::path(
    get,
    path = "/api/postedJobs",
    responses(
        (status = 200, description = "The caller's jobs with applicant counts")
    )
)]
#[axum::debug_handler]
pub async fn posted_jobs(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let jobs = state.job_service.posted_by(&claims.email).await?;
    Ok(ok(jobs))
}
