pub mod application_dto;
pub mod auth_dto;
pub mod contact_dto;
pub mod dashboard_dto;
pub mod envelope;
pub mod hr_dto;
pub mod job_dto;
pub mod project_dto;
pub mod vendor_dto;
