use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Extension, Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    dto::envelope::{created, ok},
    dto::hr_dto::{CreateLeavePayload, DecideLeavePayload, LeaveQuery},
    error::Result,
    middleware::auth::Claims,
    utils::time::today,
    AppState,
};

#[axum::debug_handler]
pub async fn list_leaves(
    State(state): State<AppState>,
    Query(query): Query<LeaveQuery>,
) -> Result<impl IntoResponse> {
    let items = state.leave_service.list(query, None).await?;
    Ok(ok(items))
}

#[axum::debug_handler]
pub async fn decide_leave(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<DecideLeavePayload>,
) -> Result<impl IntoResponse> {
    let status = payload.check()?;
    let request = state
        .leave_service
        .decide(id, status, payload.rejection_reason)
        .await?;
    state
        .audit_service
        .record(
            &claims.email,
            status.as_str(),
            "leave_request",
            id,
            Some(json!({ "rejectionReason": request.rejection_reason })),
        )
        .await;
    Ok(ok(request))
}

#[axum::debug_handler]
pub async fn my_leaves(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<LeaveQuery>,
) -> Result<impl IntoResponse> {
    let items = state.leave_service.list(query, Some(&claims.email)).await?;
    Ok(ok(items))
}

#[axum::debug_handler]
pub async fn request_leave(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateLeavePayload>,
) -> Result<impl IntoResponse> {
    payload.check(today())?;
    let request = state
        .leave_service
        .create(payload, &claims.email, &claims.display_name())
        .await?;
    Ok(created(request))
}
