use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Extension, Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    dto::envelope::{created, ok},
    dto::hr_dto::{CreateEmployeePayload, EmployeeQuery, UpdateEmployeePayload},
    error::Result,
    middleware::auth::Claims,
    AppState,
};

#[axum::debug_handler]
pub async fn list_employees(
    State(state): State<AppState>,
    Query(query): Query<EmployeeQuery>,
) -> Result<impl IntoResponse> {
    let items = state.employee_service.list(query).await?;
    Ok(ok(items))
}

#[axum::debug_handler]
pub async fn create_employee(
    State(state): State<AppState>,
    Json(payload): Json<CreateEmployeePayload>,
) -> Result<impl IntoResponse> {
    payload.check()?;
    let employee = state.employee_service.create(payload).await?;
    Ok(created(employee))
}

#[axum::debug_handler]
pub async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateEmployeePayload>,
) -> Result<impl IntoResponse> {
    payload.check()?;
    let employee = state.employee_service.update(id, payload).await?;
    Ok(ok(employee))
}

#[axum::debug_handler]
pub async fn delete_employee(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.employee_service.delete(id).await?;
    state
        .audit_service
        .record(&claims.email, "delete", "employee", id, None)
        .await;
    Ok(ok(json!({ "id": id })))
}
