use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Extension,
};
use serde::Deserialize;

use crate::{
    dto::dashboard_dto::DashboardResponse,
    dto::envelope::ok,
    error::{Error, Result},
    middleware::auth::Claims,
    utils::time::{parse_month, today},
    AppState,
};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ReportQuery {
    pub month: Option<String>,
}

#[axum::debug_handler]
pub async fn my_report(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse> {
    let month = match query.month.as_deref().filter(|m| !m.trim().is_empty()) {
        Some(raw) => parse_month(raw)
            .ok_or_else(|| Error::BadRequest("month must be formatted as YYYY-MM".into()))?,
        None => today(),
    };
    let report = state.report_service.employee_report(&claims.email, month).await?;
    Ok(ok(report))
}

#[axum::debug_handler]
pub async fn dashboard_stats(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let stats = state.report_service.dashboard_stats(today()).await?;
    let recent_jobs = state.job_service.recent(5).await?;
    Ok(ok(DashboardResponse {
        stats: Some(stats),
        recent_jobs: Some(recent_jobs),
    }))
}
