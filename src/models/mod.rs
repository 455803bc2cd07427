pub mod application;
pub mod attendance;
pub mod audit_log;
pub mod client_connection;
pub mod contact;
pub mod employee;
pub mod job;
pub mod leave;
pub mod loan;
pub mod message;
pub mod payment;
pub mod pricing_plan;
pub mod project;
pub mod user;
