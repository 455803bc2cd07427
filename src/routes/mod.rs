pub mod applications;
pub mod attendance;
pub mod auth;
pub mod contact;
pub mod employees;
pub mod health;
pub mod inbox;
pub mod jobs;
pub mod leave;
pub mod loans;
pub mod openapi;
pub mod projects;
pub mod reports;
pub mod upload;
pub mod vendor;

use axum::{
    extract::DefaultBodyLimit,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{
    config::get_config,
    middleware::{
        auth::{
            require_admin, require_client, require_client_or_admin, require_employee,
            require_session, require_vendor,
        },
        cors::permissive_cors,
        rate_limit::{new_rps_state, rps_middleware},
    },
    AppState,
};

/// Full HTTP surface: public pages, the four dashboards and static uploads.
pub fn router(state: AppState) -> Router {
    let config = get_config();

    let public_api = Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route(
            "/api/contact",
            post(contact::submit_contact)
                .merge(get(contact::list_contacts).route_layer(from_fn(require_admin))),
        )
        .route(
            "/api/jobs",
            get(jobs::list_jobs)
                .merge(post(jobs::create_job).route_layer(from_fn(require_client_or_admin))),
        )
        .route(
            "/api/jobs/:id",
            get(jobs::get_job).merge(
                axum::routing::put(jobs::update_job)
                    .delete(jobs::delete_job)
                    .route_layer(from_fn(require_client_or_admin)),
            ),
        )
        .route("/api/openapi.json", get(openapi::openapi_json))
        .layer(from_fn_with_state(
            new_rps_state(config.public_rps),
            rps_middleware,
        ));

    let session_api = Router::new()
        .route("/api/auth/session", get(auth::session))
        .route("/api/uploadImage", post(upload::upload_image))
        .route(
            "/api/loanManagement",
            get(loans::list_loans).post(loans::request_loan),
        )
        .route(
            "/api/projects",
            get(projects::list_projects).post(projects::create_project),
        )
        .route(
            "/api/projects/:id",
            axum::routing::put(projects::update_project).delete(projects::delete_project),
        )
        .route_layer(from_fn(require_session));

    let admin_api = Router::new()
        .route(
            "/api/adminProfile",
            get(auth::get_admin_profile).put(auth::update_admin_profile),
        )
        .route(
            "/api/applicationManagement",
            get(applications::list_applications),
        )
        .route(
            "/api/applicationManagement/:id",
            axum::routing::put(applications::update_application)
                .delete(applications::delete_application),
        )
        .route(
            "/api/applicationManagement/:id/interview",
            post(applications::schedule_interview),
        )
        .route(
            "/api/admin/attendance",
            get(attendance::list_attendance).post(attendance::mark_attendance),
        )
        .route("/api/admin/attendance/stats", get(attendance::attendance_stats))
        .route("/api/admin/attendance/export", get(attendance::export_attendance))
        .route("/api/admin/leaveManagement", get(leave::list_leaves))
        .route(
            "/api/admin/leaveManagement/:id",
            axum::routing::put(leave::decide_leave),
        )
        .route(
            "/api/employeeManagement",
            get(employees::list_employees).post(employees::create_employee),
        )
        .route(
            "/api/employeeManagement/:id",
            axum::routing::put(employees::update_employee).delete(employees::delete_employee),
        )
        .route(
            "/api/loanManagement/:id",
            axum::routing::put(loans::update_loan),
        )
        .route("/api/dashboard/stats", get(reports::dashboard_stats))
        .route_layer(from_fn(require_admin));

    let client_api = Router::new()
        .route("/api/postedJobs", get(jobs::posted_jobs))
        .route(
            "/api/applicationManagementClient/:job_id",
            get(applications::list_for_job),
        )
        .route(
            "/api/applicationManagementClient/:job_id/:id",
            axum::routing::put(applications::update_for_job),
        )
        .route_layer(from_fn(require_client_or_admin));

    let payments_api = Router::new().route(
        "/api/paymentHistoryClient",
        get(projects::payment_history)
            .route_layer(from_fn(require_client))
            .merge(post(projects::record_payment).route_layer(from_fn(require_admin))),
    );

    let inbox_api = Router::new()
        .route("/api/client/connections", get(inbox::list_conversations))
        .route(
            "/api/client/messages",
            get(inbox::list_thread).post(inbox::reply),
        )
        .route_layer(from_fn(require_client));

    let employee_api = Router::new()
        .route(
            "/api/employeeApplications",
            get(applications::my_applications).post(applications::apply),
        )
        .route("/api/employee/attendance/check-in", post(attendance::check_in))
        .route("/api/employee/attendance/check-out", post(attendance::check_out))
        .route(
            "/api/employee/leaves",
            get(leave::my_leaves).post(leave::request_leave),
        )
        .route("/api/employee/reports", get(reports::my_report))
        .route_layer(from_fn(require_employee));

    let vendor_api = Router::new()
        .route(
            "/api/vendor/services",
            get(vendor::list_services).post(vendor::create_service),
        )
        .route(
            "/api/vendor/services/:id",
            axum::routing::put(vendor::update_service).delete(vendor::delete_service),
        )
        .route("/api/vendor/services/:id/popular", post(vendor::toggle_popular))
        .route(
            "/api/vendor/clients",
            get(vendor::list_clients).post(vendor::create_client),
        )
        .route(
            "/api/vendor/clients/:id",
            axum::routing::put(vendor::update_client).delete(vendor::delete_client),
        )
        .route(
            "/api/vendor/messages",
            get(vendor::list_messages).post(vendor::send_message),
        )
        .route("/api/vendor/projects/history", get(vendor::project_history))
        .route_layer(from_fn(require_vendor));

    let api = Router::new()
        .merge(session_api)
        .merge(admin_api)
        .merge(client_api)
        .merge(payments_api)
        .merge(inbox_api)
        .merge(employee_api)
        .merge(vendor_api)
        .layer(from_fn_with_state(new_rps_state(config.api_rps), rps_middleware));

    Router::new()
        .route("/health", get(health::health))
        .merge(public_api)
        .merge(api)
        .nest_service("/uploads", ServeDir::new(&config.uploads_dir))
        .with_state(state)
        .layer(permissive_cors())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(config.max_upload_mb * 1024 * 1024))
}
