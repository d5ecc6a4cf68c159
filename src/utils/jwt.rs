use anyhow::{Context, Result};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::models::role::Role;

/// Session claims issued by the site's auth provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (user id)
    pub role: Role,
    pub exp: usize, // Expiration time (as UTC timestamp)
    pub iat: usize, // Issued at (as UTC timestamp)
}

pub fn validate_token(token: &str, secret: &str) -> Result<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .context("Failed to decode JWT")?;

    Ok(token_data.claims)
}

#[cfg(test)]
pub fn create_token(subject: &str, role: Role, secret: &str, valid_for: chrono::Duration) -> String {
    use jsonwebtoken::{EncodingKey, Header, encode};

    let now = chrono::Utc::now();
    let claims = Claims {
        sub: subject.to_string(),
        role,
        exp: (now + valid_for).timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn accepts_token_signed_with_secret() {
        let token = create_token("user-1", Role::Admin, "s3cret", Duration::hours(1));
        let claims = validate_token(&token, "s3cret").unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.role, Role::Admin);
    }

    #[test]
    fn rejects_wrong_secret() {
        let token = create_token("user-1", Role::Admin, "s3cret", Duration::hours(1));
        assert!(validate_token(&token, "other").is_err());
    }

    #[test]
    fn rejects_expired_token() {
        let token = create_token("user-1", Role::Admin, "s3cret", Duration::days(-1));
        assert!(validate_token(&token, "s3cret").is_err());
    }
}
