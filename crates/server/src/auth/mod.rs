//! Authentication: password hashing, bearer tokens, and the current-user
//! extractor handlers use to resolve the caller.

pub mod password;
pub mod token;

use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, header, request::Parts};
use quest_core::User;

use crate::error::ApiError;
use crate::state::AppState;

pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenIssuer};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error("invalid token: {0}")]
    Token(String),

    #[error("auth configuration error: {0}")]
    Config(String),
}

/// Pull the token out of an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// The authenticated, enabled user making the request.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[axum::async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let token = bearer_token(&parts.headers).ok_or_else(ApiError::credentials)?;

        let username = state.tokens.verify(token).map_err(|e| {
            tracing::warn!("Rejected bearer token: {}", e);
            ApiError::credentials()
        })?;

        let subject = username.clone();
        let user = state
            .run(move |vault| vault.find_user(&subject))
            .await?
            .ok_or_else(|| {
                tracing::warn!("Token subject {} has no user record", username);
                ApiError::credentials()
            })?;

        if user.disabled {
            return Err(ApiError::Unauthorized("Inactive user".into()));
        }

        Ok(Self(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers), Some("abc.def"));
    }
}
