use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::hr_dto::{CreateLeavePayload, LeaveQuery};
use crate::error::{Error, Result};
use crate::models::leave::{LeaveRequest, LeaveStatus};

const LEAVE_COLUMNS: &str = "id, employee_email, employee_name, leave_type, start_date, end_date, reason, status, rejection_reason, created_at, updated_at";

#[derive(Clone)]
pub struct LeaveService {
    pool: PgPool,
}

impl LeaveService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, payload: CreateLeavePayload, email: &str, name: &str) -> Result<LeaveRequest> {
        let overlapping: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM leave_requests
             WHERE employee_email = LOWER($1) AND status <> 'rejected'
               AND start_date <= $3 AND end_date >= $2",
        )
        .bind(email)
        .bind(payload.start_date)
        .bind(payload.end_date)
        .fetch_one(&self.pool)
        .await?;
        if overlapping > 0 {
            return Err(Error::Conflict("You already have leave booked in this period".into()));
        }

        let sql = format!(
            "INSERT INTO leave_requests (employee_email, employee_name, leave_type, start_date, end_date, reason)
             VALUES (LOWER($1), $2, $3, $4, $5, $6)
             RETURNING {}",
            LEAVE_COLUMNS
        );
        let request = sqlx::query_as::<_, LeaveRequest>(&sql)
            .bind(email)
            .bind(name)
            .bind(payload.leave_type.trim())
            .bind(payload.start_date)
            .bind(payload.end_date)
            .bind(payload.reason)
            .fetch_one(&self.pool)
            .await?;
        tracing::info!(leave_id = %request.id, email, days = request.days(), "leave requested");
        Ok(request)
    }

    pub async fn list(&self, query: LeaveQuery, employee_email: Option<&str>) -> Result<Vec<LeaveRequest>> {
        let mut filters = Vec::new();
        let mut args: Vec<String> = Vec::new();

        if let Some(email) = employee_email {
            filters.push(format!("employee_email = LOWER(${})", args.len() + 1));
            args.push(email.to_string());
        }
        if let Some(status) = query.status.filter(|s| !s.is_empty() && s != "all") {
            filters.push(format!("status = ${}", args.len() + 1));
            args.push(status);
        }
        if let Some(search) = query.search.filter(|s| !s.trim().is_empty()) {
            let n = args.len() + 1;
            filters.push(format!("(employee_name ILIKE ${n} OR employee_email ILIKE ${n})"));
            args.push(format!("%{}%", search.trim()));
        }

        let where_clause = if filters.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", filters.join(" AND "))
        };
        let sql = format!(
            "SELECT {} FROM leave_requests {} ORDER BY created_at DESC",
            LEAVE_COLUMNS, where_clause
        );
        let mut statement = sqlx::query_as::<_, LeaveRequest>(&sql);
        for value in &args {
            statement = statement.bind(value);
        }
        Ok(statement.fetch_all(&self.pool).await?)
    }

    /// Approving or rejecting a pending request. Approval also marks every
    /// day of the range as `leave` in attendance, in the same transaction.
    pub async fn decide(
        &self,
        id: Uuid,
        next: LeaveStatus,
        rejection_reason: Option<String>,
    ) -> Result<LeaveRequest> {
        let mut tx = self.pool.begin().await?;

        let sql = format!("SELECT {} FROM leave_requests WHERE id = $1 FOR UPDATE", LEAVE_COLUMNS);
        let current = sqlx::query_as::<_, LeaveRequest>(&sql)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| Error::NotFound("Leave request not found".into()))?;

        let current_status = current.status.parse::<LeaveStatus>().map_err(Error::Internal)?;
        if !current_status.can_become(next) {
            return Err(Error::BadRequest(format!(
                "A {} request cannot be {}",
                current_status.as_str(),
                next.as_str()
            )));
        }

        let sql = format!(
            "UPDATE leave_requests
             SET status = $2, rejection_reason = $3, updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            LEAVE_COLUMNS
        );
        let reason = if next == LeaveStatus::Rejected { rejection_reason } else { None };
        let updated = sqlx::query_as::<_, LeaveRequest>(&sql)
            .bind(id)
            .bind(next.as_str())
            .bind(reason)
            .fetch_one(&mut *tx)
            .await?;

        if next == LeaveStatus::Approved {
            sqlx::query(
                "INSERT INTO attendance_records (employee_email, employee_name, department, date, status)
                 SELECT $1, $2,
                        (SELECT department FROM employees WHERE email = $1),
                        d::date, 'leave'
                 FROM generate_series($3::date, $4::date, INTERVAL '1 day') AS d
                 ON CONFLICT (employee_email, date) DO UPDATE
                 SET status = 'leave', check_in = NULL, check_out = NULL, updated_at = NOW()",
            )
            .bind(&updated.employee_email)
            .bind(&updated.employee_name)
            .bind(updated.start_date)
            .bind(updated.end_date)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        tracing::info!(leave_id = %id, status = next.as_str(), "leave decided");
        Ok(updated)
    }
}
