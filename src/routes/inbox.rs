use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Extension, Json,
};

use crate::{
    dto::envelope::{created, ok},
    dto::vendor_dto::{ReplyPayload, ThreadQuery},
    error::Result,
    middleware::auth::Claims,
    models::message::{CreateMessage, Sender},
    AppState,
};

/// Vendors the client can talk to, with their unread message counts.
#[axum::debug_handler]
pub async fn list_conversations(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let connections = state.connection_service.for_client(&claims.email).await?;
    Ok(ok(connections))
}

#[axum::debug_handler]
pub async fn list_thread(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<ThreadQuery>,
) -> Result<impl IntoResponse> {
    let connection = state
        .connection_service
        .get_for_client(&claims.email, query.connection_id)
        .await?;
    let messages = state.message_service.thread(connection.id).await?;
    state.message_service.mark_as_read(connection.id, Sender::Client).await?;
    Ok(ok(messages))
}

#[axum::debug_handler]
pub async fn reply(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<ReplyPayload>,
) -> Result<impl IntoResponse> {
    payload.check()?;
    let connection = state
        .connection_service
        .get_for_client(&claims.email, payload.connection_id)
        .await?;
    let message = state
        .message_service
        .create(CreateMessage {
            connection_id: connection.id,
            sender: Sender::Client,
            body: payload.body,
        })
        .await?;
    tracing::info!(connection_id = %connection.id, vendor = %connection.vendor_email, "client replied");
    Ok(created(message))
}
