use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::hr_dto::{CreateLoanPayload, LoanQuery};
use crate::error::{Error, Result};
use crate::models::loan::{monthly_installment, LoanRequest, LoanStatus};

const LOAN_COLUMNS: &str = "id, employee_email, employee_name, loan_type, amount, purpose, repayment_months, monthly_installment, status, admin_note, created_at, updated_at";

#[derive(Clone)]
pub struct LoanService {
    pool: PgPool,
}

impl LoanService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, payload: CreateLoanPayload, email: &str, name: &str) -> Result<LoanRequest> {
        let installment = monthly_installment(payload.amount, payload.repayment_months);
        let sql = format!(
            "INSERT INTO loan_requests (employee_email, employee_name, loan_type, amount, purpose, repayment_months, monthly_installment)
             VALUES (LOWER($1), $2, $3, $4, $5, $6, $7)
             RETURNING {}",
            LOAN_COLUMNS
        );
        let loan = sqlx::query_as::<_, LoanRequest>(&sql)
            .bind(email)
            .bind(name)
            .bind(payload.loan_type.trim())
            .bind(payload.amount)
            .bind(payload.purpose.trim())
            .bind(payload.repayment_months)
            .bind(installment)
            .fetch_one(&self.pool)
            .await?;
        tracing::info!(loan_id = %loan.id, email, amount = %loan.amount, "loan requested");
        Ok(loan)
    }

    pub async fn list(&self, query: LoanQuery, employee_email: Option<&str>) -> Result<Vec<LoanRequest>> {
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
            filters.push(format!(
                "(employee_name ILIKE ${n} OR employee_email ILIKE ${n} OR purpose ILIKE ${n})"
            ));
            args.push(format!("%{}%", search.trim()));
        }

        let where_clause = if filters.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", filters.join(" AND "))
        };
        let sql = format!(
            "SELECT {} FROM loan_requests {} ORDER BY created_at DESC",
            LOAN_COLUMNS, where_clause
        );
        let mut statement = sqlx::query_as::<_, LoanRequest>(&sql);
        for value in &args {
            statement = statement.bind(value);
        }
        Ok(statement.fetch_all(&self.pool).await?)
    }

    pub async fn update_status(&self, id: Uuid, next: LoanStatus, admin_note: Option<String>) -> Result<LoanRequest> {
        let mut tx = self.pool.begin().await?;
        let current: String = sqlx::query_scalar("SELECT status FROM loan_requests WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| Error::NotFound("Loan request not found".into()))?;
        let current = current.parse::<LoanStatus>().map_err(Error::Internal)?;
        if !current.can_become(next) {
            return Err(Error::BadRequest(format!(
                "A {} loan cannot become {}",
                current.as_str(),
                next.as_str()
            )));
        }

        let sql = format!(
            "UPDATE loan_requests
             SET status = $2, admin_note = COALESCE($3, admin_note), updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            LOAN_COLUMNS
        );
        let loan = sqlx::query_as::<_, LoanRequest>(&sql)
            .bind(id)
            .bind(next.as_str())
            .bind(admin_note)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        tracing::info!(loan_id = %id, status = next.as_str(), "loan status changed");
        Ok(loan)
    }
}
