//! Bearer tokens: HS256 JWTs whose subject is the username.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use super::AuthError;

const MIN_SECRET_LEN: usize = 32;
const DEV_SECRET: &str = "questvault-dev-secret-not-for-production-use";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Username.
    pub sub: String,
    pub iat: u64,
    pub exp: u64,
}

/// Issues and verifies access tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    secret: String,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: impl Into<String>, ttl: Duration) -> Result<Self, AuthError> {
        let secret = secret.into();
        if secret.len() < MIN_SECRET_LEN {
            return Err(AuthError::Config(format!(
                "JWT secret must be at least {MIN_SECRET_LEN} characters"
            )));
        }
        Ok(Self { secret, ttl })
    }

    /// Fixed well-known secret for local development.
    pub fn new_dev(ttl: Duration) -> Self {
        Self {
            secret: DEV_SECRET.to_string(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, username: &str) -> Result<String, AuthError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| AuthError::Token(format!("system time error: {e}")))?
            .as_secs();

        let claims = Claims {
            sub: username.to_string(),
            iat: now,
            exp: now + self.ttl.as_secs(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AuthError::Token(e.to_string()))
    }

    /// Validate signature and expiry, returning the username.
    pub fn verify(&self, token: &str) -> Result<String, AuthError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| AuthError::Token(e.to_string()))?;

        Ok(data.claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_verifies() {
        let issuer = TokenIssuer::new_dev(Duration::from_secs(60));
        let token = issuer.issue("veteran").unwrap();
        assert_eq!(issuer.verify(&token).unwrap(), "veteran");
    }

    #[test]
    fn foreign_signature_rejected() {
        let ours = TokenIssuer::new_dev(Duration::from_secs(60));
        let theirs =
            TokenIssuer::new("another-secret-that-is-long-enough-123", Duration::from_secs(60))
                .unwrap();
        let token = theirs.issue("veteran").unwrap();
        assert!(ours.verify(&token).is_err());
    }

    #[test]
    fn short_secret_rejected() {
        assert!(matches!(
            TokenIssuer::new("short", Duration::from_secs(60)),
            Err(AuthError::Config(_))
        ));
    }
}
