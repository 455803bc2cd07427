use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};

use crate::middleware::auth::Claims;
use crate::models::user::User;

/// Signs an HS256 session token for `user`, valid for `ttl_hours`.
pub fn issue_session_token(
    user: &User,
    secret: &str,
    ttl_hours: i64,
) -> jsonwebtoken::errors::Result<String> {
    let exp = (Utc::now() + Duration::hours(ttl_hours)).timestamp() as usize;
    let claims = Claims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        name: Some(user.name.clone()),
        role: user.role.clone(),
        exp,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

    #[test]
    fn token_carries_identity_and_role() {
        let now = Utc::now();
        let user = User {
            id: uuid::Uuid::new_v4(),
            name: "Dev Patel".into(),
            email: "dev@corp.io".into(),
            role: "employee".into(),
            password_hash: String::new(),
            phone: None,
            company: None,
            bio: None,
            avatar_url: None,
            created_at: now,
            updated_at: now,
        };
        let token = issue_session_token(&user, "secret", 2).unwrap();
        let decoded = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"secret"),
            &Validation::new(Algorithm::HS256),
        )
        .unwrap();
        assert_eq!(decoded.claims.email, "dev@corp.io");
        assert_eq!(decoded.claims.role, "employee");
        assert_eq!(decoded.claims.sub, user.id.to_string());
    }
}
