use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

use crate::{
    dto::contact_dto::ContactForm,
    dto::envelope::{created, ok},
    error::Result,
    AppState,
};

#[axum::debug_handler]
pub async fn submit_contact(
    State(state): State<AppState>,
    Json(form): Json<ContactForm>,
) -> Result<impl IntoResponse> {
    form.check()?;
    let message = state.contact_service.submit(form).await?;
    Ok(created(json!({
        "id": message.id,
        "message": "Thank you for reaching out. We will get back to you shortly.",
    })))
}

#[axum::debug_handler]
pub async fn list_contacts(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let items = state.contact_service.list(200).await?;
    Ok(ok(items))
}
