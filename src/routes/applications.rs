use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Extension, Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    dto::application_dto::{
        ApplicationListQuery, ApplyPayload, ScheduleInterviewPayload, UpdateApplicationPayload,
    },
    dto::envelope::{created, ok},
    error::{Error, Result},
    middleware::auth::Claims,
    utils::time::today,
    AppState,
};

#[axum::debug_handler]
pub async fn list_applications(
    State(state): State<AppState>,
    Query(query): Query<ApplicationListQuery>,
) -> Result<impl IntoResponse> {
    let items = state.application_service.list(query).await?;
    Ok(ok(items))
}

#[axum::debug_handler]
pub async fn update_application(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateApplicationPayload>,
) -> Result<impl IntoResponse> {
    let status = payload.check()?;
    let application = state
        .application_service
        .update_status(id, status, payload.notes)
        .await?;
    state
        .audit_service
        .record(&claims.email, "status", "application", id, Some(json!({ "status": status.as_str() })))
        .await;
    Ok(ok(application))
}

#[axum::debug_handler]
pub async fn delete_application(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.application_service.delete(id).await?;
    state
        .audit_service
        .record(&claims.email, "delete", "application", id, None)
        .await;
    Ok(ok(json!({ "id": id })))
}

#[axum::debug_handler]
pub async fn schedule_interview(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ScheduleInterviewPayload>,
) -> Result<impl IntoResponse> {
    let time = payload.check(today())?;
    let application = state
        .application_service
        .schedule_interview(id, payload, time)
        .await?;
    state
        .audit_service
        .record(&claims.email, "interview", "application", id, None)
        .await;
    Ok(ok(application))
}

/// Applications to one of the caller's own jobs.
#[axum::debug_handler]
pub async fn list_for_job(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let job = state.job_service.get_by_id(job_id).await?;
    claims.ensure_owner_or_admin(&job.posted_by)?;
    let items = state.application_service.for_job(job_id).await?;
    Ok(ok(items))
}

#[axum::debug_handler]
pub async fn update_for_job(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path((job_id, id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateApplicationPayload>,
) -> Result<impl IntoResponse> {
    let status = payload.check()?;
    let job = state.job_service.get_by_id(job_id).await?;
    claims.ensure_owner_or_admin(&job.posted_by)?;
    let current = state.application_service.get_by_id(id).await?;
    if current.job_id != job_id {
        return Err(Error::NotFound("Application not found".into()));
    }
    let application = state
        .application_service
        .update_status(id, status, payload.notes)
        .await?;
    Ok(ok(application))
}

#[axum::debug_handler]
pub async fn my_applications(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let items = state.application_service.for_applicant(&claims.email).await?;
    Ok(ok(items))
}

#[axum::debug_handler]
pub async fn apply(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<ApplyPayload>,
) -> Result<impl IntoResponse> {
    payload.check()?;
    let job = state.job_service.get_by_id(payload.job_id).await?;
    let application = state
        .application_service
        .apply(&job, payload, &claims.email, &claims.display_name(), today())
        .await?;
    Ok(created(application))
}
