use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::vendor_dto::{ConnectionQuery, CreateConnectionPayload, UpdateConnectionPayload};
use crate::error::{Error, Result};
use crate::models::client_connection::ClientConnection;
use crate::models::message::Sender;

/// Row columns, counting the unread messages `reader` has yet to open.
fn connection_columns(reader: Sender) -> String {
    format!(
        "c.id, c.vendor_email, c.name, c.email, c.company, c.phone, c.connection_type, c.notes,
    (SELECT COUNT(*) FROM messages m WHERE m.connection_id = c.id AND m.sender = '{}' AND m.read_at IS NULL) AS unread_messages,
    c.created_at, c.updated_at",
        reader.counterpart().as_str()
    )
}

#[derive(Clone)]
pub struct ConnectionService {
    pool: PgPool,
}

impl ConnectionService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, vendor_email: &str, query: ConnectionQuery) -> Result<Vec<ClientConnection>> {
        let mut filters = vec!["c.vendor_email = LOWER($1)".to_string()];
        let mut args: Vec<String> = vec![vendor_email.to_string()];

        if let Some(kind) = query.connection_type.filter(|s| !s.is_empty() && s != "all") {
            filters.push(format!("c.connection_type = ${}", args.len() + 1));
            args.push(kind);
        }
        if let Some(search) = query.search.filter(|s| !s.trim().is_empty()) {
            let n = args.len() + 1;
            filters.push(format!("(c.name ILIKE ${n} OR c.email ILIKE ${n} OR c.company ILIKE ${n})"));
            args.push(format!("%{}%", search.trim()));
        }

        let sql = format!(
            "SELECT {} FROM client_connections c WHERE {} ORDER BY c.name ASC",
            connection_columns(Sender::Vendor),
            filters.join(" AND ")
        );
        let mut statement = sqlx::query_as::<_, ClientConnection>(&sql);
        for value in &args {
            statement = statement.bind(value);
        }
        Ok(statement.fetch_all(&self.pool).await?)
    }

    pub async fn get(&self, vendor_email: &str, id: Uuid) -> Result<ClientConnection> {
        let sql = format!(
            "SELECT {} FROM client_connections c WHERE c.id = $1 AND c.vendor_email = LOWER($2)",
            connection_columns(Sender::Vendor)
        );
        sqlx::query_as::<_, ClientConnection>(&sql)
            .bind(id)
            .bind(vendor_email)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Client not found".into()))
    }

    /// Vendors that keep the signed-in client in their book.
    pub async fn for_client(&self, client_email: &str) -> Result<Vec<ClientConnection>> {
        let sql = format!(
            "SELECT {} FROM client_connections c WHERE c.email = LOWER($1) ORDER BY c.vendor_email ASC",
            connection_columns(Sender::Client)
        );
        Ok(sqlx::query_as::<_, ClientConnection>(&sql)
            .bind(client_email)
            .fetch_all(&self.pool)
            .await?)
    }

    pub async fn get_for_client(&self, client_email: &str, id: Uuid) -> Result<ClientConnection> {
        let sql = format!(
            "SELECT {} FROM client_connections c WHERE c.id = $1 AND c.email = LOWER($2)",
            connection_columns(Sender::Client)
        );
        sqlx::query_as::<_, ClientConnection>(&sql)
            .bind(id)
            .bind(client_email)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Conversation not found".into()))
    }

    pub async fn create(&self, vendor_email: &str, payload: CreateConnectionPayload) -> Result<ClientConnection> {
        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO client_connections (vendor_email, name, email, company, phone, connection_type, notes)
             VALUES (LOWER($1), $2, LOWER($3), $4, $5, COALESCE($6, 'client'), $7)
             RETURNING id",
        )
        .bind(vendor_email)
        .bind(payload.name.trim())
        .bind(payload.email.trim())
        .bind(payload.company)
        .bind(payload.phone)
        .bind(payload.connection_type)
        .bind(payload.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| match Error::from(err) {
            Error::Conflict(_) => Error::Conflict("This client is already in your list".into()),
            other => other,
        })?;
        self.get(vendor_email, id).await
    }

    pub async fn update(&self, vendor_email: &str, id: Uuid, payload: UpdateConnectionPayload) -> Result<ClientConnection> {
        let res = sqlx::query(
            "UPDATE client_connections
             SET name = COALESCE($3, name),
                 email = COALESCE(LOWER($4), email),
                 company = COALESCE($5, company),
                 phone = COALESCE($6, phone),
                 connection_type = COALESCE($7, connection_type),
                 notes = COALESCE($8, notes),
                 updated_at = NOW()
             WHERE id = $1 AND vendor_email = LOWER($2)",
        )
        .bind(id)
        .bind(vendor_email)
        .bind(payload.name)
        .bind(payload.email)
        .bind(payload.company)
        .bind(payload.phone)
        .bind(payload.connection_type)
        .bind(payload.notes)
        .execute(&self.pool)
        .await?;
        if res.rows_affected() == 0 {
            return Err(Error::NotFound("Client not found".into()));
        }
        self.get(vendor_email, id).await
    }

    pub async fn delete(&self, vendor_email: &str, id: Uuid) -> Result<()> {
        let res = sqlx::query("DELETE FROM client_connections WHERE id = $1 AND vendor_email = LOWER($2)")
            .bind(id)
            .bind(vendor_email)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(Error::NotFound("Client not found".into()));
        }
        tracing::info!(connection_id = %id, vendor = vendor_email, "client connection removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unread_counts_look_at_the_other_side() {
        assert!(connection_columns(Sender::Vendor).contains("m.sender = 'client'"));
        assert!(connection_columns(Sender::Client).contains("m.sender = 'vendor'"));
    }
}
