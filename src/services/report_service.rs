use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::dto::dashboard_dto::DashboardStats;
use crate::dto::hr_dto::{AttendanceSummary, EmployeeReport};
use crate::error::Result;
use crate::models::attendance::DailyAttendance;
use crate::models::leave::leave_days;
use crate::utils::time::month_bounds;

/// Aggregates computed from live records for the admin dashboard and the
/// employee self-service report.
#[derive(Clone)]
pub struct ReportService {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct LeaveRange {
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl ReportService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn dashboard_stats(&self, today: NaiveDate) -> Result<DashboardStats> {
        let (total_jobs, active_jobs): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COUNT(*) FILTER (WHERE status = 'Active') FROM jobs",
        )
        .fetch_one(&self.pool)
        .await?;

        let (total_applications, pending_applications, hired): (i64, i64, i64) = sqlx::query_as(
            "SELECT COUNT(*),
                    COUNT(*) FILTER (WHERE status = 'Under Review'),
                    COUNT(*) FILTER (WHERE status = 'hired')
             FROM applications",
        )
        .fetch_one(&self.pool)
        .await?;

        let total_employees: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM employees WHERE status <> 'inactive'")
                .fetch_one(&self.pool)
                .await?;

        let present_today: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM attendance_records WHERE date = $1 AND status = 'present'",
        )
        .bind(today)
        .fetch_one(&self.pool)
        .await?;

        let pending_leaves: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM leave_requests WHERE status = 'pending'")
                .fetch_one(&self.pool)
                .await?;
        let pending_loans: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM loan_requests WHERE status = 'pending'")
                .fetch_one(&self.pool)
                .await?;
        let active_projects: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM projects WHERE status IN ('planning', 'in-progress')",
        )
        .fetch_one(&self.pool)
        .await?;
        let revenue: Decimal = sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount), 0) FROM payments WHERE status = 'paid'",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(DashboardStats {
            total_jobs,
            active_jobs,
            total_applications,
            pending_applications,
            hired,
            total_employees,
            present_today,
            pending_leaves,
            pending_loans,
            active_projects,
            revenue,
        })
    }

    /// Monthly summary for one employee: attendance, hours, leave and loans.
    pub async fn employee_report(&self, email: &str, month: NaiveDate) -> Result<EmployeeReport> {
        let (from, to) = month_bounds(month);

        let day: DailyAttendance = sqlx::query_as(
            "SELECT $2::date AS date,
                    COUNT(*) FILTER (WHERE status = 'present') AS present,
                    COUNT(*) FILTER (WHERE status = 'absent') AS absent,
                    COUNT(*) FILTER (WHERE status = 'leave') AS \"leave\"
             FROM attendance_records
             WHERE employee_email = LOWER($1) AND date BETWEEN $2 AND $3",
        )
        .bind(email)
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;

        let minutes: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(EXTRACT(EPOCH FROM (check_out - check_in)) / 60), 0)::bigint
             FROM attendance_records
             WHERE employee_email = LOWER($1) AND date BETWEEN $2 AND $3
               AND check_in IS NOT NULL AND check_out IS NOT NULL AND check_out > check_in",
        )
        .bind(email)
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;

        let approved: Vec<LeaveRange> = sqlx::query_as(
            "SELECT start_date, end_date FROM leave_requests
             WHERE employee_email = LOWER($1) AND status = 'approved'
               AND start_date <= $3 AND end_date >= $2",
        )
        .bind(email)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        let leave_days_taken = approved
            .iter()
            .map(|r| leave_days(r.start_date.max(from), r.end_date.min(to)))
            .sum();

        let pending_leaves: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM leave_requests WHERE employee_email = LOWER($1) AND status = 'pending'",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        let (active_loans, outstanding): (i64, Decimal) = sqlx::query_as(
            "SELECT COUNT(*), COALESCE(SUM(amount), 0)
             FROM loan_requests WHERE employee_email = LOWER($1) AND status = 'approved'",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        let applications: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM applications WHERE applicant_email = LOWER($1)",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(EmployeeReport {
            email: email.to_lowercase(),
            month: from.format("%Y-%m").to_string(),
            attendance: AttendanceSummary::from_days(std::slice::from_ref(&day)),
            hours_worked: (minutes as f64 / 60.0 * 10.0).round() / 10.0,
            leave_days_taken,
            pending_leaves,
            active_loans,
            outstanding_loan_amount: outstanding,
            applications,
        })
    }
}
