use reqwest::{Client, Method, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value as JsonValue;
use url::Url;
use uuid::Uuid;

use super::{ClientError, ClientResult};
use crate::{
    dto::{
        application_dto::{
            ApplicationListQuery, ApplyPayload, ScheduleInterviewPayload, UpdateApplicationPayload,
        },
        auth_dto::{AuthResponse, LoginPayload, RegisterPayload, SessionResponse},
        contact_dto::ContactForm,
        dashboard_dto::DashboardResponse,
        envelope::{ApiResponse, Page},
        hr_dto::{
            AttendanceQuery, AttendanceStats, AttendanceStatsQuery, CheckPayload,
            CreateEmployeePayload, CreateLeavePayload, CreateLoanPayload, DecideLeavePayload,
            EmployeeQuery, EmployeeReport, LeaveQuery, LoanQuery, MarkAttendancePayload,
            UpdateEmployeePayload, UpdateLoanPayload,
        },
        job_dto::{CreateJobPayload, JobListQuery, UpdateJobPayload},
        project_dto::{
            CreatePaymentPayload, CreateProjectPayload, PaymentHistory, PaymentQuery,
            ProjectQuery, UpdateProjectPayload,
        },
        vendor_dto::{
            ConnectionQuery, CreateConnectionPayload, CreatePlanPayload, MessagesQuery, PlanQuery,
            PopularToggle, ProjectHistoryQuery, ReplyPayload, SendMessagePayload, ThreadQuery,
            UpdateConnectionPayload,
            UpdatePlanPayload,
        },
    },
    models::{
        application::Application,
        attendance::AttendanceRecord,
        client_connection::ClientConnection,
        employee::Employee,
        job::{Job, PostedJob},
        leave::LeaveRequest,
        loan::LoanRequest,
        message::Message,
        payment::Payment,
        pricing_plan::PricingPlan,
        project::Project,
    },
};

/// Body of the `{id}` acknowledgement returned by deletes.
#[derive(Debug, Clone, Deserialize)]
pub struct Deleted {
    pub id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContactReceipt {
    pub id: Uuid,
    pub message: String,
}

/// Thin wrapper over `reqwest` that speaks the `{success, data|error}`
/// envelope. `base_url` is the server origin or a mount point under it,
/// e.g. `http://127.0.0.1:8000` or `https://host/backend`.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base: Url,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let mut base = Url::parse(base_url)?;
        // Joining onto a path without the trailing slash would drop its last segment.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            http: Client::new(),
            base,
            token: None,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn request(&self, method: Method, path: &str) -> ClientResult<RequestBuilder> {
        let url = self.base.join(path.trim_start_matches('/'))?;
        let builder = self.http.request(method, url);
        Ok(match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ClientResult<T> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        let envelope = match serde_json::from_str::<ApiResponse<JsonValue>>(&body) {
            Ok(envelope) => envelope,
            Err(_) => {
                return Err(ClientError::Api {
                    status: status.as_u16(),
                    message: if body.trim().is_empty() {
                        status.to_string()
                    } else {
                        body
                    },
                })
            }
        };

        if !status.is_success() || !envelope.success {
            tracing::warn!(status = status.as_u16(), error = ?envelope.error, "api call failed");
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: envelope
                    .error
                    .or(envelope.message)
                    .unwrap_or_else(|| status.to_string()),
            });
        }

        Ok(serde_json::from_value(envelope.data.unwrap_or(JsonValue::Null))?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send(self.request(Method::GET, path)?).await
    }

    async fn get_query<T, Q>(&self, path: &str, query: &Q) -> ClientResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.send(self.request(Method::GET, path)?.query(query)).await
    }

    async fn with_body<T, B>(&self, method: Method, path: &str, body: &B) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(self.request(method, path)?.json(body)).await
    }

    async fn delete(&self, path: &str) -> ClientResult<Deleted> {
        self.send(self.request(Method::DELETE, path)?).await
    }

    // ---------- auth ----------

    pub async fn register(&self, payload: &RegisterPayload) -> ClientResult<AuthResponse> {
        self.with_body(Method::POST, "/api/auth/register", payload).await
    }

    pub async fn login(&self, payload: &LoginPayload) -> ClientResult<AuthResponse> {
        self.with_body(Method::POST, "/api/auth/login", payload).await
    }

    pub async fn session(&self) -> ClientResult<SessionResponse> {
        self.get("/api/auth/session").await
    }

    // ---------- marketing ----------

    /// Validates locally first; an invalid form never reaches the network.
    pub async fn submit_contact(&self, form: &ContactForm) -> ClientResult<ContactReceipt> {
        form.check().map_err(|e| ClientError::from_validation(&e))?;
        self.with_body(Method::POST, "/api/contact", form).await
    }

    // ---------- jobs ----------

    pub async fn list_jobs(&self, query: &JobListQuery) -> ClientResult<Page<Job>> {
        self.get_query("/api/jobs", query).await
    }

    pub async fn get_job(&self, id: Uuid) -> ClientResult<Job> {
        self.get(&format!("/api/jobs/{}", id)).await
    }

    pub async fn create_job(&self, payload: &CreateJobPayload) -> ClientResult<Job> {
        self.with_body(Method::POST, "/api/jobs", payload).await
    }

    pub async fn update_job(&self, id: Uuid, payload: &UpdateJobPayload) -> ClientResult<Job> {
        self.with_body(Method::PUT, &format!("/api/jobs/{}", id), payload).await
    }

    pub async fn delete_job(&self, id: Uuid) -> ClientResult<Deleted> {
        self.delete(&format!("/api/jobs/{}", id)).await
    }

    pub async fn posted_jobs(&self) -> ClientResult<Vec<PostedJob>> {
        self.get("/api/postedJobs").await
    }

    // ---------- applications ----------

    pub async fn list_applications(
        &self,
        query: &ApplicationListQuery,
    ) -> ClientResult<Vec<Application>> {
        self.get_query("/api/applicationManagement", query).await
    }

    pub async fn update_application(
        &self,
        id: Uuid,
        payload: &UpdateApplicationPayload,
    ) -> ClientResult<Application> {
        let path = format!("/api/applicationManagement/{}", id);
        self.with_body(Method::PUT, &path, payload).await
    }

    pub async fn delete_application(&self, id: Uuid) -> ClientResult<Deleted> {
        self.delete(&format!("/api/applicationManagement/{}", id)).await
    }

    pub async fn schedule_interview(
        &self,
        id: Uuid,
        payload: &ScheduleInterviewPayload,
    ) -> ClientResult<Application> {
        let path = format!("/api/applicationManagement/{}/interview", id);
        self.with_body(Method::POST, &path, payload).await
    }

    pub async fn applications_for_job(&self, job_id: Uuid) -> ClientResult<Vec<Application>> {
        self.get(&format!("/api/applicationManagementClient/{}", job_id)).await
    }

    pub async fn update_application_for_job(
        &self,
        job_id: Uuid,
        id: Uuid,
        payload: &UpdateApplicationPayload,
    ) -> ClientResult<Application> {
        let path = format!("/api/applicationManagementClient/{}/{}", job_id, id);
        self.with_body(Method::PUT, &path, payload).await
    }

    pub async fn my_applications(&self) -> ClientResult<Vec<Application>> {
        self.get("/api/employeeApplications").await
    }

    pub async fn apply(&self, payload: &ApplyPayload) -> ClientResult<Application> {
        self.with_body(Method::POST, "/api/employeeApplications", payload).await
    }

    // ---------- attendance ----------

    pub async fn list_attendance(
        &self,
        query: &AttendanceQuery,
    ) -> ClientResult<Vec<AttendanceRecord>> {
        self.get_query("/api/admin/attendance", query).await
    }

    pub async fn mark_attendance(
        &self,
        payload: &MarkAttendancePayload,
    ) -> ClientResult<AttendanceRecord> {
        self.with_body(Method::POST, "/api/admin/attendance", payload).await
    }

    pub async fn attendance_stats(
        &self,
        query: &AttendanceStatsQuery,
    ) -> ClientResult<AttendanceStats> {
        self.get_query("/api/admin/attendance/stats", query).await
    }

    pub async fn check_in(&self, payload: &CheckPayload) -> ClientResult<AttendanceRecord> {
        self.with_body(Method::POST, "/api/employee/attendance/check-in", payload).await
    }

    pub async fn check_out(&self, payload: &CheckPayload) -> ClientResult<AttendanceRecord> {
        self.with_body(Method::POST, "/api/employee/attendance/check-out", payload).await
    }

    // ---------- leave ----------

    pub async fn list_leaves(&self, query: &LeaveQuery) -> ClientResult<Vec<LeaveRequest>> {
        self.get_query("/api/admin/leaveManagement", query).await
    }

    pub async fn decide_leave(
        &self,
        id: Uuid,
        payload: &DecideLeavePayload,
    ) -> ClientResult<LeaveRequest> {
        let path = format!("/api/admin/leaveManagement/{}", id);
        self.with_body(Method::PUT, &path, payload).await
    }

    pub async fn my_leaves(&self, query: &LeaveQuery) -> ClientResult<Vec<LeaveRequest>> {
        self.get_query("/api/employee/leaves", query).await
    }

    pub async fn request_leave(&self, payload: &CreateLeavePayload) -> ClientResult<LeaveRequest> {
        self.with_body(Method::POST, "/api/employee/leaves", payload).await
    }

    // ---------- employees ----------

    pub async fn list_employees(&self, query: &EmployeeQuery) -> ClientResult<Vec<Employee>> {
        self.get_query("/api/employeeManagement", query).await
    }

    pub async fn create_employee(&self, payload: &CreateEmployeePayload) -> ClientResult<Employee> {
        self.with_body(Method::POST, "/api/employeeManagement", payload).await
    }

    pub async fn update_employee(
        &self,
        id: Uuid,
        payload: &UpdateEmployeePayload,
    ) -> ClientResult<Employee> {
        let path = format!("/api/employeeManagement/{}", id);
        self.with_body(Method::PUT, &path, payload).await
    }

    pub async fn delete_employee(&self, id: Uuid) -> ClientResult<Deleted> {
        self.delete(&format!("/api/employeeManagement/{}", id)).await
    }

    pub async fn employee_report(&self, month: Option<&str>) -> ClientResult<EmployeeReport> {
        match month {
            Some(month) => self.get_query("/api/employee/reports", &[("month", month)]).await,
            None => self.get("/api/employee/reports").await,
        }
    }

    // ---------- loans ----------

    pub async fn list_loans(&self, query: &LoanQuery) -> ClientResult<Vec<LoanRequest>> {
        self.get_query("/api/loanManagement", query).await
    }

    /// Amount and repayment period are checked before anything is sent.
    pub async fn request_loan(&self, payload: &CreateLoanPayload) -> ClientResult<LoanRequest> {
        payload.check().map_err(|e| ClientError::from_validation(&e))?;
        self.with_body(Method::POST, "/api/loanManagement", payload).await
    }

    pub async fn update_loan(&self, id: Uuid, payload: &UpdateLoanPayload) -> ClientResult<LoanRequest> {
        self.with_body(Method::PUT, &format!("/api/loanManagement/{}", id), payload).await
    }

    // ---------- vendor ----------

    pub async fn list_services(&self, query: &PlanQuery) -> ClientResult<Vec<PricingPlan>> {
        self.get_query("/api/vendor/services", query).await
    }

    pub async fn create_service(&self, payload: &CreatePlanPayload) -> ClientResult<PricingPlan> {
        self.with_body(Method::POST, "/api/vendor/services", payload).await
    }

    pub async fn update_service(
        &self,
        id: Uuid,
        payload: &UpdatePlanPayload,
    ) -> ClientResult<PricingPlan> {
        self.with_body(Method::PUT, &format!("/api/vendor/services/{}", id), payload).await
    }

    pub async fn delete_service(&self, id: Uuid) -> ClientResult<Deleted> {
        self.delete(&format!("/api/vendor/services/{}", id)).await
    }

    pub async fn toggle_popular(&self, id: Uuid) -> ClientResult<PopularToggle> {
        let path = format!("/api/vendor/services/{}/popular", id);
        self.send(self.request(Method::POST, &path)?).await
    }

    pub async fn list_clients(&self, query: &ConnectionQuery) -> ClientResult<Vec<ClientConnection>> {
        self.get_query("/api/vendor/clients", query).await
    }

    pub async fn create_client(
        &self,
        payload: &CreateConnectionPayload,
    ) -> ClientResult<ClientConnection> {
        self.with_body(Method::POST, "/api/vendor/clients", payload).await
    }

    pub async fn update_client(
        &self,
        id: Uuid,
        payload: &UpdateConnectionPayload,
    ) -> ClientResult<ClientConnection> {
        self.with_body(Method::PUT, &format!("/api/vendor/clients/{}", id), payload).await
    }

    pub async fn delete_client(&self, id: Uuid) -> ClientResult<Deleted> {
        self.delete(&format!("/api/vendor/clients/{}", id)).await
    }

    pub async fn messages(&self, client_id: Uuid) -> ClientResult<Vec<Message>> {
        self.get_query("/api/vendor/messages", &MessagesQuery { client_id }).await
    }

    pub async fn send_message(&self, payload: &SendMessagePayload) -> ClientResult<Message> {
        self.with_body(Method::POST, "/api/vendor/messages", payload).await
    }

    // ---------- client inbox ----------

    pub async fn conversations(&self) -> ClientResult<Vec<ClientConnection>> {
        self.get("/api/client/connections").await
    }

    pub async fn thread(&self, connection_id: Uuid) -> ClientResult<Vec<Message>> {
        self.get_query("/api/client/messages", &ThreadQuery { connection_id }).await
    }

    pub async fn reply(&self, payload: &ReplyPayload) -> ClientResult<Message> {
        self.with_body(Method::POST, "/api/client/messages", payload).await
    }

    pub async fn project_history(&self, query: &ProjectHistoryQuery) -> ClientResult<Vec<Project>> {
        self.get_query("/api/vendor/projects/history", query).await
    }

    // ---------- projects & payments ----------

    pub async fn list_projects(&self, query: &ProjectQuery) -> ClientResult<Vec<Project>> {
        self.get_query("/api/projects", query).await
    }

    pub async fn create_project(&self, payload: &CreateProjectPayload) -> ClientResult<Project> {
        self.with_body(Method::POST, "/api/projects", payload).await
    }

    pub async fn update_project(
        &self,
        id: Uuid,
        payload: &UpdateProjectPayload,
    ) -> ClientResult<Project> {
        self.with_body(Method::PUT, &format!("/api/projects/{}", id), payload).await
    }

    pub async fn delete_project(&self, id: Uuid) -> ClientResult<Deleted> {
        self.delete(&format!("/api/projects/{}", id)).await
    }

    pub async fn payment_history(&self, query: &PaymentQuery) -> ClientResult<PaymentHistory> {
        self.get_query("/api/paymentHistoryClient", query).await
    }

    pub async fn record_payment(&self, payload: &CreatePaymentPayload) -> ClientResult<Payment> {
        self.with_body(Method::POST, "/api/paymentHistoryClient", payload).await
    }

    // ---------- dashboard ----------

    pub async fn dashboard(&self) -> ClientResult<DashboardResponse> {
        self.get("/api/dashboard/stats").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unparseable_base_url() {
        assert!(matches!(ApiClient::new("not a url"), Err(ClientError::Url(_))));
    }

    fn url_of(client: &ApiClient, path: &str) -> String {
        client
            .request(Method::GET, path)
            .unwrap()
            .build()
            .unwrap()
            .url()
            .to_string()
    }

    #[test]
    fn base_path_prefix_is_kept() {
        let mounted = ApiClient::new("http://host/backend").unwrap();
        assert_eq!(url_of(&mounted, "/api/jobs"), "http://host/backend/api/jobs");

        let origin = ApiClient::new("http://127.0.0.1:8000").unwrap();
        assert_eq!(url_of(&origin, "/api/jobs"), "http://127.0.0.1:8000/api/jobs");
    }

    #[test]
    fn token_is_attached() {
        let client = ApiClient::new("http://127.0.0.1:1").unwrap().with_token("abc");
        assert_eq!(client.token(), Some("abc"));
    }
}
