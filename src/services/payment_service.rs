use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::dto::project_dto::{CreatePaymentPayload, PaymentHistory, PaymentQuery};
use crate::error::Result;
use crate::models::payment::Payment;

const PAYMENT_COLUMNS: &str =
    "id, client_email, project_id, description, amount, currency, method, status, reference, paid_at, created_at";

#[derive(Clone)]
pub struct PaymentService {
    pool: PgPool,
}

impl PaymentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn history(&self, client_email: &str, query: PaymentQuery) -> Result<PaymentHistory> {
        let mut filters = vec!["client_email = LOWER($1)".to_string()];
        let mut args: Vec<String> = vec![client_email.to_string()];

        if let Some(status) = query.status.filter(|s| !s.is_empty() && s != "all") {
            filters.push(format!("status = ${}", args.len() + 1));
            args.push(status);
        }
        if let Some(search) = query.search.filter(|s| !s.trim().is_empty()) {
            let n = args.len() + 1;
            filters.push(format!(
                "(description ILIKE ${n} OR reference ILIKE ${n} OR method ILIKE ${n})"
            ));
            args.push(format!("%{}%", search.trim()));
        }

        let sql = format!(
            "SELECT {} FROM payments WHERE {} ORDER BY COALESCE(paid_at, created_at) DESC",
            PAYMENT_COLUMNS,
            filters.join(" AND ")
        );
        let mut statement = sqlx::query_as::<_, Payment>(&sql);
        for value in &args {
            statement = statement.bind(value);
        }
        let payments = statement.fetch_all(&self.pool).await?;
        Ok(summarize(payments))
    }

    pub async fn create(&self, payload: CreatePaymentPayload) -> Result<Payment> {
        let sql = format!(
            "INSERT INTO payments (client_email, project_id, description, amount, currency, method, status, reference, paid_at)
             VALUES (LOWER($1), $2, $3, $4, COALESCE($5, 'USD'), $6, COALESCE($7, 'pending'), $8,
                     CASE WHEN COALESCE($7, 'pending') = 'paid' THEN COALESCE($9, NOW()) ELSE $9 END)
             RETURNING {}",
            PAYMENT_COLUMNS
        );
        let payment = sqlx::query_as::<_, Payment>(&sql)
            .bind(payload.client_email.trim())
            .bind(payload.project_id)
            .bind(payload.description)
            .bind(payload.amount)
            .bind(payload.currency)
            .bind(payload.method)
            .bind(payload.status)
            .bind(payload.reference)
            .bind(payload.paid_at)
            .fetch_one(&self.pool)
            .await?;
        tracing::info!(payment_id = %payment.id, amount = %payment.amount, "payment recorded");
        Ok(payment)
    }
}

fn summarize(payments: Vec<Payment>) -> PaymentHistory {
    let total = |status: &str| -> Decimal {
        payments
            .iter()
            .filter(|p| p.status == status)
            .map(|p| p.amount)
            .sum()
    };
    let total_paid = total("paid");
    let total_pending = total("pending");
    PaymentHistory {
        payments,
        total_paid,
        total_pending,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn payment(amount: i64, status: &str) -> Payment {
        Payment {
            id: Uuid::new_v4(),
            client_email: "client@acme.io".into(),
            project_id: None,
            description: None,
            amount: Decimal::new(amount, 2),
            currency: "USD".into(),
            method: "card".into(),
            status: status.into(),
            reference: None,
            paid_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn totals_split_by_status() {
        let history = summarize(vec![
            payment(10_000, "paid"),
            payment(2_550, "paid"),
            payment(5_000, "pending"),
            payment(9_999, "failed"),
        ]);
        assert_eq!(history.total_paid, Decimal::new(12_550, 2));
        assert_eq!(history.total_pending, Decimal::new(5_000, 2));
        assert_eq!(history.payments.len(), 4);
    }
}
