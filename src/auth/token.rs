use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::AuthError;

/// Identity assertion carried inside the signed token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub username: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(username: impl Into<String>, role: impl Into<String>, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            username: username.into(),
            role: role.into(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}

/// Signs identity tokens with the process-wide secret
pub struct TokenIssuer {
    key: EncodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            key: EncodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn issue(&self, username: &str, role: &str) -> Result<String, AuthError> {
        self.issue_at(username, role, Utc::now())
    }

    pub fn issue_at(&self, username: &str, role: &str, now: DateTime<Utc>) -> Result<String, AuthError> {
        let claims = Claims::new(username, role, now, self.ttl);
        encode(&Header::new(Algorithm::HS256), &claims, &self.key).map_err(AuthError::Signing)
    }
}

/// Checks signature and expiry of identity tokens.
///
/// Expiry is evaluated against an explicit clock instead of inside
/// `jsonwebtoken`, so every failure mode collapses into
/// [`AuthError::InvalidToken`] and tests can move time.
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        self.decode_at(token, Utc::now())
    }

    pub fn decode_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &self.key, &self.validation).map_err(|e| {
            tracing::debug!("Token rejected: {}", e);
            AuthError::InvalidToken
        })?;

        if data.claims.is_expired_at(now) {
            tracing::debug!("Token for '{}' expired", data.claims.username);
            return Err(AuthError::InvalidToken);
        }

        Ok(data.claims)
    }
}
