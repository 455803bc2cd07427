use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::json;
use tokio::net::TcpListener;
use uuid::Uuid;

use staffing_backend::{
    client::{ApiClient, ClientError, ContactFormView, DashboardView, ListView, ToastKind},
    dto::{
        application_dto::ApplicationListQuery, contact_dto::ContactForm, hr_dto::CreateLoanPayload,
        vendor_dto::{ConnectionQuery, PlanQuery, ReplyPayload},
    },
    filter::ListFilter,
    models::{
        application::Application, client_connection::ClientConnection,
        loan::LoanRequest, pricing_plan::PricingPlan,
    },
};

/// Requests the stub saw, as `"METHOD path"`.
#[derive(Clone, Default)]
struct Seen {
    calls: Arc<Mutex<Vec<String>>>,
    connections: Vec<ClientConnection>,
    applications: Vec<Application>,
    plans: Vec<PricingPlan>,
}

impl Seen {
    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

fn connection(name: &str) -> ClientConnection {
    let now = Utc::now();
    ClientConnection {
        id: Uuid::new_v4(),
        vendor_email: "sales@vendor.io".into(),
        name: name.into(),
        email: format!("{}@client.io", name.to_lowercase()),
        company: Some(format!("{} Ltd", name)),
        phone: None,
        connection_type: "client".into(),
        notes: None,
        unread_messages: Some(0),
        created_at: now,
        updated_at: now,
    }
}

fn application(name: &str, status: &str) -> Application {
    let now = Utc::now();
    Application {
        id: Uuid::new_v4(),
        job_id: Uuid::new_v4(),
        applicant_name: name.into(),
        applicant_email: format!("{}@mail.io", name.to_lowercase()),
        phone: None,
        position: "Warehouse Associate".into(),
        status: status.into(),
        cover_letter: None,
        resume_url: None,
        interview_date: None,
        interview_time: None,
        interview_duration: None,
        interview_type: None,
        meeting_link: None,
        interviewer: None,
        notes: None,
        created_at: now,
        updated_at: now,
    }
}

fn plan(name: &str, popular: bool) -> PricingPlan {
    let now = Utc::now();
    PricingPlan {
        id: Uuid::new_v4(),
        vendor_email: "sales@vendor.io".into(),
        name: name.into(),
        description: None,
        category: "Recruitment".into(),
        price: Decimal::new(19900, 2),
        currency: "USD".into(),
        billing_cycle: "monthly".into(),
        features: vec!["Screening".into()],
        limitations: vec![],
        is_active: true,
        popular,
        created_at: now,
        updated_at: now,
    }
}

async fn list_clients(State(seen): State<Seen>) -> impl IntoResponse {
    seen.record("GET /api/vendor/clients".into());
    Json(json!({ "success": true, "data": seen.connections }))
}

async fn delete_client(State(seen): State<Seen>, Path(id): Path<Uuid>) -> impl IntoResponse {
    seen.record(format!("DELETE /api/vendor/clients/{}", id));
    Json(json!({ "success": true, "data": { "id": id } }))
}

async fn list_applications(State(seen): State<Seen>) -> impl IntoResponse {
    seen.record("GET /api/applicationManagement".into());
    Json(json!({ "success": true, "data": seen.applications }))
}

async fn list_services(State(seen): State<Seen>) -> impl IntoResponse {
    seen.record("GET /api/vendor/services".into());
    Json(json!({ "success": true, "data": seen.plans }))
}

async fn toggle_popular(State(seen): State<Seen>, Path(id): Path<Uuid>) -> impl IntoResponse {
    seen.record(format!("POST /api/vendor/services/{}/popular", id));
    let was_popular = seen.plans.iter().any(|p| p.id == id && p.popular);
    Json(json!({ "success": true, "data": { "id": id, "popular": !was_popular } }))
}

async fn request_loan(State(seen): State<Seen>) -> impl IntoResponse {
    seen.record("POST /api/loanManagement".into());
    (
        StatusCode::CREATED,
        Json(json!({ "success": false, "error": "stub should not be reached" })),
    )
}

async fn submit_contact(State(seen): State<Seen>) -> impl IntoResponse {
    seen.record("POST /api/contact".into());
    (
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": { "id": Uuid::new_v4(), "message": "Thank you for reaching out." }
        })),
    )
}

async fn client_reply(
    State(seen): State<Seen>,
    Json(body): Json<serde_json::Value>,
) -> impl IntoResponse {
    seen.record(format!("POST /api/client/messages {}", body["connectionId"].as_str().unwrap_or("-")));
    (
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": {
                "id": Uuid::new_v4(),
                "connectionId": body["connectionId"],
                "sender": "client",
                "body": body["body"],
                "createdAt": Utc::now(),
                "readAt": null
            }
        })),
    )
}

async fn dashboard() -> impl IntoResponse {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "success": false, "error": "Database error" })),
    )
}

async fn spawn_stub(seen: Seen) -> String {
    let app = Router::new()
        .route("/api/vendor/clients", get(list_clients))
        .route("/api/vendor/clients/:id", delete(delete_client))
        .route("/api/applicationManagement", get(list_applications))
        .route("/api/vendor/services", get(list_services))
        .route("/api/vendor/services/:id/popular", post(toggle_popular))
        .route("/api/loanManagement", post(request_loan))
        .route("/api/contact", post(submit_contact))
        .route("/api/client/messages", post(client_reply))
        .route("/api/dashboard/stats", get(dashboard))
        .with_state(seen);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn deleting_a_client_removes_exactly_that_record() {
    let seen = Seen {
        connections: vec![connection("Acme"), connection("Globex"), connection("Initech")],
        ..Default::default()
    };
    let base = spawn_stub(seen.clone()).await;
    let api = ApiClient::new(&base).unwrap().with_token("vendor-token");

    let mut view: ListView<ClientConnection> = ListView::new();
    view.load(api.list_clients(&ConnectionQuery::default())).await;
    assert_eq!(view.items.len(), 3);

    let target = view.items[1].id;
    assert!(view.delete_with(target, api.delete_client(target), "Client removed").await);

    let names: Vec<_> = view.items.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Acme", "Initech"]);
    assert_eq!(view.toast.as_ref().map(|t| t.kind), Some(ToastKind::Success));

    let deletes: Vec<_> = seen
        .calls()
        .into_iter()
        .filter(|c| c.starts_with("DELETE"))
        .collect();
    assert_eq!(deletes, vec![format!("DELETE /api/vendor/clients/{}", target)]);
}

#[tokio::test]
async fn invalid_loan_is_rejected_without_a_request() {
    let seen = Seen::default();
    let base = spawn_stub(seen.clone()).await;
    let api = ApiClient::new(&base).unwrap().with_token("employee-token");
    let mut view: ListView<LoanRequest> = ListView::new();

    for (amount, months) in [(Decimal::ZERO, 6), (Decimal::new(-50, 0), 6), (Decimal::new(1200, 0), 0)] {
        let payload = CreateLoanPayload {
            loan_type: "personal".into(),
            amount,
            purpose: "Laptop".into(),
            repayment_months: months,
        };
        let created = view.create_with(api.request_loan(&payload), "Loan requested").await;
        assert!(!created);
        assert_eq!(view.toast.as_ref().map(|t| t.kind), Some(ToastKind::Error));
        view.dismiss_toast();
    }

    assert!(view.items.is_empty());
    assert!(seen.calls().is_empty());
}

#[tokio::test]
async fn dashboard_failure_sets_error_state() {
    let base = spawn_stub(Seen::default()).await;
    let api = ApiClient::new(&base).unwrap().with_token("admin-token");

    let mut view = DashboardView::default();
    view.load(&api).await;

    assert!(!view.loading);
    assert_eq!(view.error.as_deref(), Some("Database error"));
    assert!(view.stats.is_none());
    assert!(view.recent_jobs.is_none());
    assert_eq!(view.stat_cards().total_jobs, 0);
    assert!(view.recent_job_titles().is_empty());
}

#[tokio::test]
async fn rejected_filter_shows_only_rejected_applications() {
    let seen = Seen {
        applications: vec![
            application("Amina", "Rejected"),
            application("Brian", "Under Review"),
            application("Carla", "Hired"),
            application("Dev", "Rejected"),
        ],
        ..Default::default()
    };
    let base = spawn_stub(seen).await;
    let api = ApiClient::new(&base).unwrap().with_token("admin-token");

    let mut view: ListView<Application> = ListView::new();
    view.load(api.list_applications(&ApplicationListQuery::default())).await;
    view.filter = ListFilter::new().with("status", "Rejected");

    let visible = view.visible();
    assert_eq!(visible.len(), 2);
    assert!(visible.iter().all(|a| a.status == "Rejected"));
}

#[tokio::test]
async fn toggling_popular_leaves_one_badge() {
    let seen = Seen {
        plans: vec![plan("Starter", true), plan("Growth", false), plan("Scale", false)],
        ..Default::default()
    };
    let base = spawn_stub(seen.clone()).await;
    let api = ApiClient::new(&base).unwrap().with_token("vendor-token");

    let mut view: ListView<PricingPlan> = ListView::new();
    view.load(api.list_services(&PlanQuery::default())).await;
    let growth = view.items[1].id;

    assert!(view.toggle_popular(&api, growth).await);
    assert_eq!(view.popular_count(), 1);
    assert!(view.items.iter().find(|p| p.id == growth).unwrap().popular);
}

#[tokio::test]
async fn contact_form_validates_locally_then_clears_on_success() {
    let seen = Seen::default();
    let base = spawn_stub(seen.clone()).await;
    let api = ApiClient::new(&base).unwrap();

    let mut form = ContactFormView::default();
    form.draft = ContactForm {
        name: "Jane Doe".into(),
        email: "not-an-email".into(),
        phone: None,
        subject: None,
        message: "We need three warehouse staff next month.".into(),
    };
    assert!(!form.submit(&api).await);
    assert!(form.errors.contains_key("email"));
    assert!(seen.calls().is_empty());

    form.draft.email = "jane@example.com".into();
    assert!(form.submit(&api).await);
    assert!(form.errors.is_empty());
    assert_eq!(form.draft, ContactForm::default());
    assert!(form.acknowledgement.is_some());
    assert_eq!(seen.calls(), vec!["POST /api/contact".to_string()]);
}

#[tokio::test]
async fn api_errors_carry_status_and_message() {
    let base = spawn_stub(Seen::default()).await;
    let api = ApiClient::new(&base).unwrap();
    match api.dashboard().await {
        Err(ClientError::Api { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "Database error");
        }
        other => panic!("expected api error, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn client_reply_is_posted_into_the_chosen_thread() {
    let seen = Seen::default();
    let base = spawn_stub(seen.clone()).await;
    let api = ApiClient::new(&base).unwrap().with_token("client-token");

    let connection_id = Uuid::new_v4();
    let message = api
        .reply(&ReplyPayload {
            connection_id,
            body: "Can we start Monday?".into(),
        })
        .await
        .unwrap();

    assert_eq!(message.sender, "client");
    assert_eq!(message.connection_id, connection_id);
    assert!(message.read_at.is_none());
    assert_eq!(
        seen.calls(),
        vec![format!("POST /api/client/messages {}", connection_id)]
    );
}
