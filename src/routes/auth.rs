use axum::{
    extract::State,
    response::IntoResponse,
    Extension, Json,
};
use uuid::Uuid;

use crate::{
    config::get_config,
    dto::auth_dto::{AuthResponse, LoginPayload, RegisterPayload, SessionResponse, UpdateProfilePayload},
    dto::envelope::{created, ok, ApiResponse},
    error::{Error, Result},
    middleware::auth::Claims,
    models::user::User,
    utils::token::issue_session_token,
    AppState,
};

fn session_for(user: User) -> Result<AuthResponse> {
    let config = get_config();
    let token = issue_session_token(&user, &config.jwt_secret, config.jwt_ttl_hours)
        .map_err(|e| Error::Internal(format!("Failed to sign session token: {}", e)))?;
    Ok(AuthResponse { token, user })
}

fn user_id(claims: &Claims) -> Result<Uuid> {
    claims
        .sub
        .parse()
        .map_err(|_| Error::Unauthorized("Session does not belong to a user account".into()))
}

#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<impl IntoResponse> {
    let role = payload.check()?;
    let user = state.user_service.register(payload, role).await?;
    Ok(created(session_for(user)?))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse> {
    validator::Validate::validate(&payload)?;
    let user = state.user_service.login(&payload).await?;
    tracing::info!(email = %user.email, "user logged in");
    Ok(ok(session_for(user)?))
}

#[axum::debug_handler]
pub async fn session(Extension(claims): Extension<Claims>) -> Result<impl IntoResponse> {
    Ok(ok(SessionResponse {
        id: claims.sub.clone(),
        email: claims.email.clone(),
        name: claims.display_name(),
        role: claims.role.clone(),
        user_type: claims.role.clone(),
    }))
}

#[axum::debug_handler]
pub async fn get_admin_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let user = state.user_service.get_by_id(user_id(&claims)?).await?;
    Ok(ok(user))
}

#[axum::debug_handler]
pub async fn update_admin_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UpdateProfilePayload>,
) -> Result<impl IntoResponse> {
    payload.check()?;
    let id = user_id(&claims)?;
    let user = state.user_service.update_profile(id, payload).await?;
    Ok(Json(ApiResponse::ok(user).with_message("Profile updated")))
}
