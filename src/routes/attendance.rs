use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Extension, Json,
};

use crate::{
    dto::envelope::ok,
    dto::hr_dto::{AttendanceQuery, AttendanceStatsQuery, CheckPayload, MarkAttendancePayload},
    error::{Error, Result},
    middleware::auth::Claims,
    services::export_service::ExportService,
    utils::time::{now, parse_month, parse_time, today},
    AppState,
};

#[axum::debug_handler]
pub async fn list_attendance(
    State(state): State<AppState>,
    Query(query): Query<AttendanceQuery>,
) -> Result<impl IntoResponse> {
    let records = state.attendance_service.list(query).await?;
    Ok(ok(records))
}

#[axum::debug_handler]
pub async fn mark_attendance(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<MarkAttendancePayload>,
) -> Result<impl IntoResponse> {
    let mark = payload.check()?;
    let record = state.attendance_service.mark(payload, mark).await?;
    tracing::info!(by = %claims.email, employee = %record.employee_email, date = %record.date, status = %record.status, "attendance marked");
    Ok(ok(record))
}

#[axum::debug_handler]
pub async fn attendance_stats(
    State(state): State<AppState>,
    Query(query): Query<AttendanceStatsQuery>,
) -> Result<impl IntoResponse> {
    let today = today();
    let month = match query.month.as_deref().filter(|m| !m.trim().is_empty()) {
        Some(raw) => parse_month(raw)
            .ok_or_else(|| Error::BadRequest("month must be formatted as YYYY-MM".into()))?,
        None => today,
    };
    let stats = state
        .attendance_service
        .stats(today, query.window_days(), month)
        .await?;
    Ok(ok(stats))
}

/// XLSX download of the filtered attendance records.
#[axum::debug_handler]
pub async fn export_attendance(
    State(state): State<AppState>,
    Query(query): Query<AttendanceQuery>,
) -> Result<impl IntoResponse> {
    let period = match (query.date, query.from, query.to) {
        (Some(date), _, _) => date.to_string(),
        (None, Some(from), Some(to)) => format!("{} to {}", from, to),
        (None, Some(from), None) => format!("from {}", from),
        (None, None, Some(to)) => format!("until {}", to),
        (None, None, None) => "all time".to_string(),
    };
    let records = state.attendance_service.list(query).await?;
    let bytes = ExportService::generate_attendance_xlsx(&records, &period)?;
    let filename = format!("attendance_{}.xlsx", now().format("%Y%m%d_%H%M"));

    Ok((
        [
            (
                header::CONTENT_TYPE,
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    ))
}

fn punch_time(payload: Option<Json<CheckPayload>>) -> Result<chrono::NaiveTime> {
    match payload.and_then(|Json(p)| p.time).filter(|t| !t.trim().is_empty()) {
        Some(raw) => parse_time(&raw).ok_or_else(|| Error::BadRequest("time must be HH:MM".into())),
        None => Ok(now().time()),
    }
}

#[axum::debug_handler]
pub async fn check_in(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    payload: Option<Json<CheckPayload>>,
) -> Result<impl IntoResponse> {
    let time = punch_time(payload)?;
    let employee = state.employee_service.find_by_email(&claims.email).await?;
    let (name, department) = match employee {
        Some(e) => (e.name, Some(e.department)),
        None => (claims.display_name(), None),
    };
    let record = state
        .attendance_service
        .check_in(&claims.email, &name, department, today(), time)
        .await?;
    Ok(ok(record))
}

#[axum::debug_handler]
pub async fn check_out(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    payload: Option<Json<CheckPayload>>,
) -> Result<impl IntoResponse> {
    let time = punch_time(payload)?;
    let record = state
        .attendance_service
        .check_out(&claims.email, today(), time)
        .await?;
    Ok(ok(record))
}
