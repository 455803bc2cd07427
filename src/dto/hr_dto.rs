use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use crate::models::attendance::{AttendanceStatus, DailyAttendance};
use crate::models::employee::EMPLOYEE_STATUSES;
use crate::models::leave::LeaveStatus;
use crate::models::loan::LoanStatus;
use crate::utils::time::parse_time;
use crate::utils::validation::{is_blank, is_valid_phone, Checks};

pub const MAX_REPAYMENT_MONTHS: i32 = 60;

// ---------- attendance ----------

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MarkAttendancePayload {
    #[validate(email(message = "Please enter a valid employee email"))]
    pub employee_email: String,
    #[validate(length(min = 1, message = "Employee name is required"))]
    pub employee_name: String,
    pub department: Option<String>,
    pub date: NaiveDate,
    pub status: String,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
}

/// Parsed attendance mark, ready for the upsert.
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceMark {
    pub status: AttendanceStatus,
    pub check_in: Option<NaiveTime>,
    pub check_out: Option<NaiveTime>,
}

impl MarkAttendancePayload {
    pub fn check(&self) -> Result<AttendanceMark, ValidationErrors> {
        let status = self.status.parse::<AttendanceStatus>().ok();
        let check_in = self.check_in.as_deref().filter(|t| !is_blank(t)).map(parse_time);
        let check_out = self.check_out.as_deref().filter(|t| !is_blank(t)).map(parse_time);

        let mut checks = Checks::from_derive(self);
        checks
            .fail_if(status.is_none(), "status", "status", "Status must be present, absent or leave")
            .fail_if(check_in == Some(None), "checkIn", "time", "Check-in must be HH:MM")
            .fail_if(check_out == Some(None), "checkOut", "time", "Check-out must be HH:MM");
        if let (Some(Some(start)), Some(Some(end))) = (check_in, check_out) {
            checks.fail_if(end <= start, "checkOut", "order", "Check-out must be after check-in");
        }
        checks.finish()?;

        let status = status.unwrap_or(AttendanceStatus::Absent);
        let present = status == AttendanceStatus::Present;
        Ok(AttendanceMark {
            status,
            check_in: check_in.flatten().filter(|_| present),
            check_out: check_out.flatten().filter(|_| present),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct AttendanceQuery {
    pub date: Option<NaiveDate>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub status: Option<String>,
    pub department: Option<String>,
    pub search: Option<String>,
    pub employee_email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct AttendanceStatsQuery {
    pub days: Option<i64>,
    /// `YYYY-MM`; defaults to the current month.
    pub month: Option<String>,
}

impl AttendanceStatsQuery {
    pub fn window_days(&self) -> i64 {
        self.days.unwrap_or(7).clamp(1, 31)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSummary {
    pub present: i64,
    pub absent: i64,
    pub leave: i64,
    pub total: i64,
    pub rate: f64,
}

impl AttendanceSummary {
    pub fn from_days(days: &[DailyAttendance]) -> Self {
        let present = days.iter().map(|d| d.present).sum();
        let absent = days.iter().map(|d| d.absent).sum();
        let leave = days.iter().map(|d| d.leave).sum();
        let total = present + absent + leave;
        Self {
            present,
            absent,
            leave,
            total,
            rate: crate::models::attendance::attendance_rate(present, total),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceStats {
    pub today: AttendanceSummary,
    pub weekly: Vec<DailyAttendance>,
    pub monthly: AttendanceSummary,
    pub month: String,
    pub department_rates: Vec<DepartmentRate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentRate {
    pub department: String,
    pub present: i64,
    pub total: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct CheckPayload {
    /// Punch time; the server clock is used when absent.
    pub time: Option<String>,
}

// ---------- leave ----------

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLeavePayload {
    #[validate(length(min = 1, message = "Leave type is required"))]
    pub leave_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[validate(length(max = 1000, message = "Reason is too long"))]
    pub reason: Option<String>,
}

impl CreateLeavePayload {
    pub fn check(&self, today: NaiveDate) -> Result<(), ValidationErrors> {
        let mut checks = Checks::from_derive(self);
        checks
            .fail_if(is_blank(&self.leave_type), "leaveType", "required", "Leave type is required")
            .fail_if(
                self.end_date < self.start_date,
                "endDate",
                "order",
                "End date cannot be before start date",
            )
            .fail_if(self.start_date < today, "startDate", "past", "Leave cannot start in the past");
        checks.finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DecideLeavePayload {
    pub status: String,
    #[validate(length(max = 1000, message = "Rejection reason is too long"))]
    pub rejection_reason: Option<String>,
}

impl DecideLeavePayload {
    pub fn check(&self) -> Result<LeaveStatus, ValidationErrors> {
        let status = self.status.parse::<LeaveStatus>().ok();
        let reason_missing = self.rejection_reason.as_deref().map(is_blank).unwrap_or(true);
        let mut checks = Checks::from_derive(self);
        checks
            .fail_if(
                !matches!(status, Some(LeaveStatus::Approved) | Some(LeaveStatus::Rejected)),
                "status",
                "status",
                "Status must be approved or rejected",
            )
            .fail_if(
                status == Some(LeaveStatus::Rejected) && reason_missing,
                "rejectionReason",
                "required",
                "Please give a reason for the rejection",
            );
        checks.finish()?;
        Ok(status.unwrap_or(LeaveStatus::Pending))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct LeaveQuery {
    pub status: Option<String>,
    pub search: Option<String>,
}

// ---------- loans ----------

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLoanPayload {
    #[validate(length(min = 1, message = "Loan type is required"))]
    pub loan_type: String,
    pub amount: Decimal,
    #[validate(length(min = 1, max = 1000, message = "Purpose is required"))]
    pub purpose: String,
    pub repayment_months: i32,
}

impl CreateLoanPayload {
    pub fn check(&self) -> Result<(), ValidationErrors> {
        let mut checks = Checks::from_derive(self);
        checks
            .fail_if(
                self.amount <= Decimal::ZERO,
                "amount",
                "range",
                "Amount must be greater than 0",
            )
            .fail_if(
                self.repayment_months <= 0,
                "repaymentMonths",
                "range",
                "Repayment period must be at least one month",
            )
            .fail_if(
                self.repayment_months > MAX_REPAYMENT_MONTHS,
                "repaymentMonths",
                "range",
                "Repayment period cannot exceed 60 months",
            );
        checks.finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLoanPayload {
    pub status: String,
    #[validate(length(max = 1000, message = "Note is too long"))]
    pub admin_note: Option<String>,
}

impl UpdateLoanPayload {
    pub fn check(&self) -> Result<LoanStatus, ValidationErrors> {
        let status = self.status.parse::<LoanStatus>().ok();
        let mut checks = Checks::from_derive(self);
        checks.fail_if(
            status.is_none() || status == Some(LoanStatus::Pending),
            "status",
            "status",
            "Status must be approved, rejected or completed",
        );
        checks.finish()?;
        Ok(status.unwrap_or(LoanStatus::Pending))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct LoanQuery {
    pub status: Option<String>,
    pub search: Option<String>,
}

// ---------- employees ----------

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeePayload {
    #[validate(length(min = 1, max = 120, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    pub phone: Option<String>,
    #[validate(length(min = 1, message = "Department is required"))]
    pub department: String,
    #[validate(length(min = 1, message = "Position is required"))]
    pub position: String,
    pub salary: Option<Decimal>,
    pub join_date: Option<NaiveDate>,
    pub status: Option<String>,
}

impl CreateEmployeePayload {
    pub fn check(&self) -> Result<(), ValidationErrors> {
        let mut checks = Checks::from_derive(self);
        check_employee_fields(
            &mut checks,
            self.phone.as_deref(),
            self.salary,
            self.status.as_deref(),
        );
        checks.finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployeePayload {
    #[validate(length(min = 1, max = 120, message = "Name cannot be empty"))]
    pub name: Option<String>,
    pub phone: Option<String>,
    #[validate(length(min = 1, message = "Department cannot be empty"))]
    pub department: Option<String>,
    #[validate(length(min = 1, message = "Position cannot be empty"))]
    pub position: Option<String>,
    pub salary: Option<Decimal>,
    pub join_date: Option<NaiveDate>,
    pub status: Option<String>,
}

impl UpdateEmployeePayload {
    pub fn check(&self) -> Result<(), ValidationErrors> {
        let mut checks = Checks::from_derive(self);
        check_employee_fields(
            &mut checks,
            self.phone.as_deref(),
            self.salary,
            self.status.as_deref(),
        );
        checks.finish()
    }
}

fn check_employee_fields(
    checks: &mut Checks,
    phone: Option<&str>,
    salary: Option<Decimal>,
    status: Option<&str>,
) {
    checks
        .fail_if(
            phone.map(|p| !is_valid_phone(p)).unwrap_or(false),
            "phone",
            "phone",
            "Please enter a valid phone number",
        )
        .fail_if(
            salary.map(|s| s < Decimal::ZERO).unwrap_or(false),
            "salary",
            "range",
            "Salary cannot be negative",
        )
        .fail_if(
            status.map(|s| !EMPLOYEE_STATUSES.contains(&s)).unwrap_or(false),
            "status",
            "status",
            "Status must be active, inactive or on-leave",
        );
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct EmployeeQuery {
    pub department: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
}

/// Self-service summary shown on the employee reports page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeReport {
    pub email: String,
    pub month: String,
    pub attendance: AttendanceSummary,
    pub hours_worked: f64,
    pub leave_days_taken: i64,
    pub pending_leaves: i64,
    pub active_loans: i64,
    pub outstanding_loan_amount: Decimal,
    pub applications: i64,
}
