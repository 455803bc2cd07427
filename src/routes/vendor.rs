use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Extension, Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    dto::envelope::{created, ok},
    dto::project_dto::ProjectQuery,
    dto::vendor_dto::{
        ConnectionQuery, CreateConnectionPayload, CreatePlanPayload, MessagesQuery, PlanQuery,
        ProjectHistoryQuery, SendMessagePayload, UpdateConnectionPayload, UpdatePlanPayload,
    },
    error::Result,
    middleware::auth::Claims,
    models::message::{CreateMessage, Sender},
    services::project_service::ProjectScope,
    AppState,
};

// ---------- services / pricing ----------

#[axum::debug_handler]
pub async fn list_services(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<PlanQuery>,
) -> Result<impl IntoResponse> {
    let plans = state.pricing_plan_service.list(&claims.email, query).await?;
    Ok(ok(plans))
}

#[axum::debug_handler]
pub async fn create_service(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreatePlanPayload>,
) -> Result<impl IntoResponse> {
    payload.check()?;
    let plan = state.pricing_plan_service.create(&claims.email, payload).await?;
    Ok(created(plan))
}

#[axum::debug_handler]
pub async fn update_service(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePlanPayload>,
) -> Result<impl IntoResponse> {
    payload.check()?;
    let plan = state.pricing_plan_service.update(&claims.email, id, payload).await?;
    Ok(ok(plan))
}

#[axum::debug_handler]
pub async fn delete_service(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.pricing_plan_service.delete(&claims.email, id).await?;
    Ok(ok(json!({ "id": id })))
}

#[axum::debug_handler]
pub async fn toggle_popular(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let toggle = state.pricing_plan_service.toggle_popular(&claims.email, id).await?;
    Ok(ok(toggle))
}

// ---------- clients ----------

#[axum::debug_handler]
pub async fn list_clients(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<ConnectionQuery>,
) -> Result<impl IntoResponse> {
    let clients = state.connection_service.list(&claims.email, query).await?;
    Ok(ok(clients))
}

#[axum::debug_handler]
pub async fn create_client(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateConnectionPayload>,
) -> Result<impl IntoResponse> {
    payload.check()?;
    let client = state.connection_service.create(&claims.email, payload).await?;
    Ok(created(client))
}

#[axum::debug_handler]
pub async fn update_client(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateConnectionPayload>,
) -> Result<impl IntoResponse> {
    payload.check()?;
    let client = state.connection_service.update(&claims.email, id, payload).await?;
    Ok(ok(client))
}

#[axum::debug_handler]
pub async fn delete_client(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.connection_service.delete(&claims.email, id).await?;
    Ok(ok(json!({ "id": id })))
}

// ---------- messages ----------

/// Thread with one client; opening it marks the client's messages read.
#[axum::debug_handler]
pub async fn list_messages(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<MessagesQuery>,
) -> Result<impl IntoResponse> {
    let connection = state.connection_service.get(&claims.email, query.client_id).await?;
    let messages = state.message_service.thread(connection.id).await?;
    state.message_service.mark_as_read(connection.id, Sender::Vendor).await?;
    Ok(ok(messages))
}

#[axum::debug_handler]
pub async fn send_message(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<SendMessagePayload>,
) -> Result<impl IntoResponse> {
    payload.check()?;
    let connection = state.connection_service.get(&claims.email, payload.client_id).await?;
    let message = state
        .message_service
        .create(CreateMessage {
            connection_id: connection.id,
            sender: Sender::Vendor,
            body: payload.body,
        })
        .await?;
    Ok(created(message))
}

// ---------- project history ----------

#[axum::debug_handler]
pub async fn project_history(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<ProjectHistoryQuery>,
) -> Result<impl IntoResponse> {
    let projects = state
        .project_service
        .list(
            ProjectScope::Vendor(claims.email.clone()),
            ProjectQuery {
                status: query.status,
                search: query.search,
            },
        )
        .await?;
    Ok(ok(projects))
}
