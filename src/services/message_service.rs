use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::message::{CreateMessage, Message, Sender};

#[derive(Clone)]
pub struct MessageService {
    pool: PgPool,
}

impl MessageService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, msg: CreateMessage) -> Result<Message> {
        let message = sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (connection_id, sender, body)
            VALUES ($1, $2, $3)
            RETURNING id, connection_id, sender, body, created_at, read_at
            "#,
        )
        .bind(msg.connection_id)
        .bind(msg.sender.as_str())
        .bind(msg.body.trim())
        .fetch_one(&self.pool)
        .await?;

        Ok(message)
    }

    pub async fn thread(&self, connection_id: Uuid) -> Result<Vec<Message>> {
        let messages = sqlx::query_as::<_, Message>(
            r#"
            SELECT id, connection_id, sender, body, created_at, read_at
            FROM messages
            WHERE connection_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(connection_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    /// Marks the other side's messages in a thread as read by `reader`.
    pub async fn mark_as_read(&self, connection_id: Uuid, reader: Sender) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE messages
            SET read_at = NOW()
            WHERE connection_id = $1 AND sender = $2 AND read_at IS NULL
            "#,
        )
        .bind(connection_id)
        .bind(reader.counterpart().as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
