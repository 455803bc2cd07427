pub mod application_service;
pub mod attendance_service;
pub mod audit_service;
pub mod connection_service;
pub mod contact_service;
pub mod employee_service;
pub mod export_service;
pub mod job_service;
pub mod leave_service;
pub mod loan_service;
pub mod message_service;
pub mod payment_service;
pub mod pricing_plan_service;
pub mod project_service;
pub mod report_service;
pub mod user_service;
