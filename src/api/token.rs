use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

const TOKEN_LIFETIME_SECS: i64 = 30 * 24 * 60 * 60; // 30 days

/// Claims carried by every bearer token: the user id as subject plus the
/// standard issued-at/expiry pair.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, PartialEq)]
pub enum TokenError {
    Expired,
    Invalid,
}

pub fn jwt_secret() -> String {
    std::env::var("JWT_SECRET").expect("JWT_SECRET must be set")
}

/// Issue a signed HS256 token for a user, valid for 30 days.
pub fn issue_token(user_id: i32, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user_id.to_string(),
        iat: now,
        exp: now + TOKEN_LIFETIME_SECS,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Verify signature and expiry and return the claims.
pub fn decode_token(token: &str, secret: &str) -> Result<Claims, TokenError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_tokens_round_trip() {
        let token = issue_token(42, "test-secret").unwrap();
        let claims = decode_token(&token, "test-secret").unwrap();
        assert_eq!(claims.sub, "42");
        assert!(claims.exp - claims.iat == TOKEN_LIFETIME_SECS);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = issue_token(42, "test-secret").unwrap();
        assert!(matches!(
            decode_token(&token, "other-secret"),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(
            decode_token("not-a-token", "test-secret"),
            Err(TokenError::Invalid)
        ));
    }
}
