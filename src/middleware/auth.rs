use axum::{
    extract::Request,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{Error, Result};
use crate::models::user::Role;

/// Session identity carried by the bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: String,
    pub exp: usize,
}

impl Claims {
    pub fn role(&self) -> Option<Role> {
        self.role.parse().ok()
    }

    pub fn is(&self, role: Role) -> bool {
        self.role() == Some(role)
    }

    pub fn is_admin(&self) -> bool {
        self.is(Role::Admin)
    }

    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| self.email.clone())
    }

    /// Admins act on any record; everyone else only on their own.
    pub fn ensure_owner_or_admin(&self, owner_email: &str) -> Result<()> {
        if self.is_admin() || self.email.eq_ignore_ascii_case(owner_email) {
            Ok(())
        } else {
            Err(Error::Forbidden("You do not have access to this record".into()))
        }
    }
}

fn reject(status: StatusCode, code: &str) -> Response {
    (status, Json(json!({ "success": false, "error": code }))).into_response()
}

fn decode_bearer(headers: &HeaderMap) -> std::result::Result<Claims, Response> {
    let Some(auth_header) = headers.get(axum::http::header::AUTHORIZATION) else {
        return Err(reject(StatusCode::UNAUTHORIZED, "missing_authorization"));
    };
    let Ok(auth_str) = auth_header.to_str() else {
        return Err(reject(StatusCode::UNAUTHORIZED, "bad_authorization"));
    };
    let Some(token) = auth_str.strip_prefix("Bearer ") else {
        return Err(reject(StatusCode::UNAUTHORIZED, "unsupported_scheme"));
    };

    let config = crate::config::get_config();
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| reject(StatusCode::UNAUTHORIZED, "invalid_token"))
}

/// Claims for routes that serve anonymous visitors too.
pub fn optional_claims(headers: &HeaderMap) -> Option<Claims> {
    headers
        .contains_key(axum::http::header::AUTHORIZATION)
        .then(|| decode_bearer(headers).ok())
        .flatten()
}

pub async fn require_roles(mut req: Request, next: Next, allowed: &[Role]) -> Response {
    let claims = match decode_bearer(req.headers()) {
        Ok(claims) => claims,
        Err(resp) => return resp,
    };

    if !allowed.is_empty() && !claims.role().map(|r| allowed.contains(&r)).unwrap_or(false) {
        tracing::warn!(email = %claims.email, role = %claims.role, "role not allowed");
        return reject(StatusCode::FORBIDDEN, "forbidden");
    }
    req.extensions_mut().insert(claims);
    next.run(req).await
}

pub async fn require_session(req: Request, next: Next) -> Response {
    require_roles(req, next, &[]).await
}

pub async fn require_admin(req: Request, next: Next) -> Response {
    require_roles(req, next, &[Role::Admin]).await
}

pub async fn require_client_or_admin(req: Request, next: Next) -> Response {
    require_roles(req, next, &[Role::Client, Role::Admin]).await
}

pub async fn require_client(req: Request, next: Next) -> Response {
    require_roles(req, next, &[Role::Client]).await
}

pub async fn require_vendor(req: Request, next: Next) -> Response {
    require_roles(req, next, &[Role::Vendor]).await
}

pub async fn require_employee(req: Request, next: Next) -> Response {
    require_roles(req, next, &[Role::Employee]).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(role: &str, email: &str) -> Claims {
        Claims {
            sub: "1".into(),
            email: email.into(),
            name: None,
            role: role.into(),
            exp: 0,
        }
    }

    #[test]
    fn ownership_rules() {
        assert!(claims("admin", "root@staffing.io").ensure_owner_or_admin("x@y.io").is_ok());
        assert!(claims("client", "Acme@Client.io").ensure_owner_or_admin("acme@client.io").is_ok());
        assert!(claims("client", "other@client.io").ensure_owner_or_admin("acme@client.io").is_err());
    }

    #[test]
    fn display_name_falls_back_to_email() {
        let mut c = claims("employee", "dev@corp.io");
        assert_eq!(c.display_name(), "dev@corp.io");
        c.name = Some("Dev Patel".into());
        assert_eq!(c.display_name(), "Dev Patel");
    }
}
