use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Extension, Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    dto::envelope::{created, ok},
    dto::hr_dto::{CreateLoanPayload, LoanQuery, UpdateLoanPayload},
    error::{Error, Result},
    middleware::auth::Claims,
    models::user::Role,
    AppState,
};

/// Admins see every request; employees only their own.
#[axum::debug_handler]
pub async fn list_loans(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<LoanQuery>,
) -> Result<impl IntoResponse> {
    let scope = if claims.is_admin() { None } else { Some(claims.email.as_str()) };
    let items = state.loan_service.list(query, scope).await?;
    Ok(ok(items))
}

#[axum::debug_handler]
pub async fn request_loan(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateLoanPayload>,
) -> Result<impl IntoResponse> {
    payload.check()?;
    if !claims.is(Role::Employee) {
        return Err(Error::Forbidden("Only employees can request loans".into()));
    }
    let loan = state
        .loan_service
        .create(payload, &claims.email, &claims.display_name())
        .await?;
    Ok(created(loan))
}

#[axum::debug_handler]
pub async fn update_loan(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateLoanPayload>,
) -> Result<impl IntoResponse> {
    if !claims.is_admin() {
        return Err(Error::Forbidden("Only admins can decide loan requests".into()));
    }
    let status = payload.check()?;
    let loan = state
        .loan_service
        .update_status(id, status, payload.admin_note)
        .await?;
    state
        .audit_service
        .record(&claims.email, status.as_str(), "loan_request", id, Some(json!({ "amount": loan.amount })))
        .await;
    Ok(ok(loan))
}
