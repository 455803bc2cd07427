mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::json;

use common::{app, get_request, json_request, send, token};

#[tokio::test]
async fn health_reports_service() {
    let (status, body) = send(app(), get_request("/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "staffing-backend");
}

#[tokio::test]
async fn contact_with_invalid_email_is_rejected_before_storage() {
    let req = json_request(
        "POST",
        "/api/contact",
        None,
        json!({
            "name": "Jane Doe",
            "email": "not-an-email",
            "message": "We need three warehouse staff next month."
        }),
    );
    let (status, body) = send(app(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["errors"]["email"], "Please enter a valid email address");
}

#[tokio::test]
async fn loan_with_non_positive_amount_is_rejected() {
    let employee = token("employee", "dev@corp.io");
    let req = json_request(
        "POST",
        "/api/loanManagement",
        Some(&employee),
        json!({
            "loanType": "personal",
            "amount": "0",
            "purpose": "Laptop",
            "repaymentMonths": 6
        }),
    );
    let (status, body) = send(app(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["amount"].is_string());
}

#[tokio::test]
async fn loan_with_zero_months_is_rejected() {
    let employee = token("employee", "dev@corp.io");
    let req = json_request(
        "POST",
        "/api/loanManagement",
        Some(&employee),
        json!({
            "loanType": "personal",
            "amount": "1200",
            "purpose": "Laptop",
            "repaymentMonths": 0
        }),
    );
    let (status, body) = send(app(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["repaymentMonths"].is_string());
}

#[tokio::test]
async fn job_salary_range_is_checked() {
    let client = token("client", "hr@acme.io");
    let req = json_request(
        "POST",
        "/api/jobs",
        Some(&client),
        json!({
            "title": "Forklift Operator",
            "company": "Acme",
            "location": "Nairobi",
            "jobType": "Full-time",
            "category": "Logistics",
            "description": "Operate forklifts in the main warehouse.",
            "salaryMin": "5000",
            "salaryMax": "3000",
            "requirements": "License, 2 years experience, "
        }),
    );
    let (status, body) = send(app(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["salaryMax"].is_string());
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let (status, body) = send(app(), get_request("/api/employee/leaves", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    let req = Request::builder()
        .uri("/api/dashboard/stats")
        .header(header::AUTHORIZATION, "Bearer not.a.jwt")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(app(), req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wrong_role_is_forbidden() {
    let vendor = token("vendor", "sales@vendor.io");
    let (status, _) = send(app(), get_request("/api/dashboard/stats", Some(&vendor))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin = token("admin", "root@staffing.io");
    let (status, _) = send(app(), get_request("/api/vendor/services", Some(&admin))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let employee = token("employee", "dev@corp.io");
    let (status, _) = send(app(), get_request("/api/contact", Some(&employee))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn dashboard_reports_failure_envelope_when_database_is_down() {
    let admin = token("admin", "root@staffing.io");
    let (status, body) = send(app(), get_request("/api/dashboard/stats", Some(&admin))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn session_echoes_token_identity() {
    let client = token("client", "hr@acme.io");
    let (status, body) = send(app(), get_request("/api/auth/session", Some(&client))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "hr@acme.io");
    assert_eq!(body["data"]["role"], "client");
}

#[tokio::test]
async fn openapi_document_lists_job_routes() {
    let (status, body) = send(app(), get_request("/api/openapi.json", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/jobs"].is_object());
    assert!(body["paths"]["/api/jobs/{id}"].is_object());
}

fn multipart(filename: &str, bytes: &[u8]) -> Body {
    let mut body = Vec::new();
    body.extend_from_slice(b"--XBOUNDARY\r\n");
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(b"\r\n--XBOUNDARY--\r\n");
    Body::from(body)
}

fn upload_request(filename: &str, bytes: &[u8], token: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/uploadImage")
        .header(header::CONTENT_TYPE, "multipart/form-data; boundary=XBOUNDARY")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(multipart(filename, bytes))
        .unwrap()
}

#[tokio::test]
async fn upload_accepts_real_images_only() {
    let vendor = token("vendor", "sales@vendor.io");

    let png = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00];
    let (status, body) = send(app(), upload_request("logo.png", &png, &vendor)).await;
    assert_eq!(status, StatusCode::CREATED);
    let url = body["data"]["url"].as_str().unwrap();
    assert!(url.starts_with("/uploads/images/"));
    assert!(url.ends_with(".png"));

    let (status, _) = send(app(), upload_request("logo.png", b"%PDF-1.7", &vendor)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn huge_page_number_is_clamped_instead_of_overflowing() {
    let uri = format!("/api/jobs?page={}&perPage=100", i64::MAX);
    let (status, body) = send(app(), get_request(&uri, None)).await;
    // Reaches the (unavailable) database with a bounded offset.
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn attendance_stats_reach_the_database_layer() {
    let admin = token("admin", "root@staffing.io");
    let (status, body) =
        send(app(), get_request("/api/admin/attendance/stats", Some(&admin))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Database error");
}

#[tokio::test]
async fn client_replies_are_validated_and_role_gated() {
    let client = token("client", "hr@acme.io");
    let connection = uuid::Uuid::new_v4();

    let blank = json!({ "connectionId": connection, "body": "   " });
    let req = json_request("POST", "/api/client/messages", Some(&client), blank);
    let (status, body) = send(app(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["body"].is_string());

    let vendor = token("vendor", "sales@vendor.io");
    let reply = json!({ "connectionId": connection, "body": "Can we start Monday?" });
    let req = json_request("POST", "/api/client/messages", Some(&vendor), reply.clone());
    let (status, _) = send(app(), req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let req = json_request("POST", "/api/client/messages", Some(&client), reply);
    let (status, body) = send(app(), req).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);

    let (status, _) = send(app(), get_request("/api/client/connections", Some(&vendor))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
