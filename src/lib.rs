pub mod client;
pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod filter;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use crate::services::{
    application_service::ApplicationService, attendance_service::AttendanceService,
    audit_service::AuditService, connection_service::ConnectionService,
    contact_service::ContactService, employee_service::EmployeeService, job_service::JobService,
    leave_service::LeaveService, loan_service::LoanService, message_service::MessageService,
    payment_service::PaymentService, pricing_plan_service::PricingPlanService,
    project_service::ProjectService, report_service::ReportService, user_service::UserService,
};
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub user_service: UserService,
    pub job_service: JobService,
    pub application_service: ApplicationService,
    pub employee_service: EmployeeService,
    pub attendance_service: AttendanceService,
    pub leave_service: LeaveService,
    pub loan_service: LoanService,
    pub report_service: ReportService,
    pub project_service: ProjectService,
    pub payment_service: PaymentService,
    pub pricing_plan_service: PricingPlanService,
    pub connection_service: ConnectionService,
    pub message_service: MessageService,
    pub contact_service: ContactService,
    pub audit_service: AuditService,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        Self {
            user_service: UserService::new(pool.clone()),
            job_service: JobService::new(pool.clone()),
            application_service: ApplicationService::new(pool.clone()),
            employee_service: EmployeeService::new(pool.clone()),
            attendance_service: AttendanceService::new(pool.clone()),
            leave_service: LeaveService::new(pool.clone()),
            loan_service: LoanService::new(pool.clone()),
            report_service: ReportService::new(pool.clone()),
            project_service: ProjectService::new(pool.clone()),
            payment_service: PaymentService::new(pool.clone()),
            pricing_plan_service: PricingPlanService::new(pool.clone()),
            connection_service: ConnectionService::new(pool.clone()),
            message_service: MessageService::new(pool.clone()),
            contact_service: ContactService::new(pool.clone()),
            audit_service: AuditService::new(pool.clone()),
            pool,
        }
    }
}
