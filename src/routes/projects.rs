use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Extension, Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    dto::envelope::{created, ok},
    dto::project_dto::{
        CreatePaymentPayload, CreateProjectPayload, PaymentQuery, ProjectQuery, UpdateProjectPayload,
    },
    error::{Error, Result},
    middleware::auth::Claims,
    models::project::Project,
    models::user::Role,
    services::project_service::ProjectScope,
    AppState,
};

fn scope_for(claims: &Claims) -> Result<ProjectScope> {
    match claims.role() {
        Some(Role::Admin) => Ok(ProjectScope::All),
        Some(Role::Client) => Ok(ProjectScope::Client(claims.email.clone())),
        Some(Role::Vendor) => Ok(ProjectScope::Vendor(claims.email.clone())),
        _ => Err(Error::Forbidden("Projects are not available for this role".into())),
    }
}

fn ensure_can_edit(claims: &Claims, project: &Project) -> Result<()> {
    claims.ensure_owner_or_admin(&project.client_email)
}

#[axum::debug_handler]
pub async fn list_projects(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<ProjectQuery>,
) -> Result<impl IntoResponse> {
    let items = state.project_service.list(scope_for(&claims)?, query).await?;
    Ok(ok(items))
}

#[axum::debug_handler]
pub async fn create_project(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateProjectPayload>,
) -> Result<impl IntoResponse> {
    payload.check()?;
    let client_email = match claims.role() {
        Some(Role::Client) => claims.email.clone(),
        Some(Role::Admin) => payload
            .client_email
            .clone()
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| Error::BadRequest("clientEmail is required".into()))?,
        _ => return Err(Error::Forbidden("Only clients and admins can create projects".into())),
    };
    let project = state.project_service.create(payload, &client_email).await?;
    Ok(created(project))
}

#[axum::debug_handler]
pub async fn update_project(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProjectPayload>,
) -> Result<impl IntoResponse> {
    payload.check()?;
    let current = state.project_service.get_by_id(id).await?;
    ensure_can_edit(&claims, &current)?;
    let project = state.project_service.update(id, payload).await?;
    Ok(ok(project))
}

#[axum::debug_handler]
pub async fn delete_project(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let current = state.project_service.get_by_id(id).await?;
    ensure_can_edit(&claims, &current)?;
    state.project_service.delete(id).await?;
    state
        .audit_service
        .record(&claims.email, "delete", "project", id, Some(json!({ "name": current.name })))
        .await;
    Ok(ok(json!({ "id": id })))
}

#[axum::debug_handler]
pub async fn payment_history(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<PaymentQuery>,
) -> Result<impl IntoResponse> {
    let history = state.payment_service.history(&claims.email, query).await?;
    Ok(ok(history))
}

#[axum::debug_handler]
pub async fn record_payment(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreatePaymentPayload>,
) -> Result<impl IntoResponse> {
    payload.check()?;
    let payment = state.payment_service.create(payload).await?;
    tracing::info!(admin = %claims.email, payment_id = %payment.id, "payment recorded");
    Ok(created(payment))
}
