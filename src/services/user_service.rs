use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::auth_dto::{LoginPayload, RegisterPayload, UpdateProfilePayload};
use crate::error::{Error, Result};
use crate::models::user::{Role, User};
use crate::utils::crypto::{hash_password, verify_password};

const USER_COLUMNS: &str =
    "id, name, email, role, password_hash, phone, company, bio, avatar_url, created_at, updated_at";

#[derive(Clone)]
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn register(&self, payload: RegisterPayload, role: Role) -> Result<User> {
        let password_hash = hash_password(&payload.password)?;
        let sql = format!(
            "INSERT INTO users (name, email, role, password_hash, phone, company)
             VALUES ($1, LOWER($2), $3, $4, $5, $6)
             RETURNING {}",
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(payload.name.trim())
            .bind(payload.email.trim())
            .bind(role.as_str())
            .bind(password_hash)
            .bind(payload.phone)
            .bind(payload.company)
            .fetch_one(&self.pool)
            .await
            .map_err(|err| match Error::from(err) {
                Error::Conflict(_) => Error::Conflict("An account with this email already exists".into()),
                other => other,
            })?;

        tracing::info!(email = %user.email, role = %user.role, "user registered");
        Ok(user)
    }

    /// Unknown email and wrong password fail the same way.
    pub async fn login(&self, payload: &LoginPayload) -> Result<User> {
        let sql = format!("SELECT {} FROM users WHERE email = LOWER($1)", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(payload.email.trim())
            .fetch_optional(&self.pool)
            .await?;

        match user {
            Some(user) if verify_password(&payload.password, &user.password_hash) => Ok(user),
            _ => {
                tracing::warn!(email = %payload.email, "failed login");
                Err(Error::Unauthorized("Invalid email or password".into()))
            }
        }
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<User> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("User not found".into()))?;
        Ok(user)
    }

    pub async fn update_profile(&self, id: Uuid, payload: UpdateProfilePayload) -> Result<User> {
        let sql = format!(
            "UPDATE users
             SET name = COALESCE($2, name),
                 phone = COALESCE($3, phone),
                 company = COALESCE($4, company),
                 bio = COALESCE($5, bio),
                 avatar_url = COALESCE($6, avatar_url),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(payload.name)
            .bind(payload.phone)
            .bind(payload.company)
            .bind(payload.bio)
            .bind(payload.avatar_url)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("User not found".into()))?;
        Ok(user)
    }
}
