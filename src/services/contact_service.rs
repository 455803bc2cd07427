use sqlx::PgPool;

use crate::dto::contact_dto::ContactForm;
use crate::error::Result;
use crate::models::contact::ContactMessage;

const CONTACT_COLUMNS: &str = "id, name, email, phone, subject, message, created_at";

#[derive(Clone)]
pub struct ContactService {
    pool: PgPool,
}

impl ContactService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn submit(&self, form: ContactForm) -> Result<ContactMessage> {
        let sql = format!(
            "INSERT INTO contact_messages (name, email, phone, subject, message)
             VALUES ($1, LOWER($2), $3, $4, $5)
             RETURNING {}",
            CONTACT_COLUMNS
        );
        let message = sqlx::query_as::<_, ContactMessage>(&sql)
            .bind(form.name.trim())
            .bind(form.email.trim())
            .bind(form.phone.filter(|p| !p.trim().is_empty()))
            .bind(form.subject)
            .bind(form.message.trim())
            .fetch_one(&self.pool)
            .await?;
        tracing::info!(contact_id = %message.id, "contact message received");
        Ok(message)
    }

    pub async fn list(&self, limit: i64) -> Result<Vec<ContactMessage>> {
        let sql = format!(
            "SELECT {} FROM contact_messages ORDER BY created_at DESC LIMIT $1",
            CONTACT_COLUMNS
        );
        let items = sqlx::query_as::<_, ContactMessage>(&sql)
            .bind(limit.clamp(1, 500))
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }
}
