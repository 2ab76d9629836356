//! HTTP error mapping.

use axum::Json;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use quest_store::StoreError;
use serde_json::json;

use crate::auth::AuthError;

/// Errors surfaced to clients as `{"detail": "..."}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unprocessable(String),

    #[error("{0}")]
    Internal(String),

    /// A request body the extractor could not accept, with its status.
    #[error("{1}")]
    Rejected(StatusCode, String),
}

impl ApiError {
    /// The generic 401 for a missing, invalid, or orphaned token.
    pub fn credentials() -> Self {
        Self::Unauthorized("Could not validate credentials".into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Rejected(status, _) => *status,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { kind, .. } => {
                Self::NotFound(format!("{} not found", kind.label()))
            }
            StoreError::ValidationFailed { source, .. } => Self::Unprocessable(source.to_string()),
            StoreError::UsernameTaken(_) => Self::BadRequest("Username already registered".into()),
            other => {
                tracing::error!("Store failure: {}", other);
                Self::Internal("Internal storage error".into())
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Token(_) => Self::credentials(),
            other => {
                tracing::error!("Auth failure: {}", other);
                Self::Internal("Internal authentication error".into())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut response = (status, Json(json!({ "detail": self.to_string() }))).into_response();

        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}
