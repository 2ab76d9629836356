//! Registration and login.

use axum::extract::State;
use axum::Json;
use quest_core::{User, UserView};
use serde::{Deserialize, Serialize};

use crate::auth::{hash_password, verify_password};
use crate::error::ApiError;
use crate::extract::{ApiForm, ApiJson};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// OAuth2 password-grant form fields; extra fields such as `grant_type` are
/// ignored.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// POST /register
pub async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<Json<UserView>, ApiError> {
    let user = state
        .run(move |vault| -> Result<User, ApiError> {
            if vault.find_user(&request.username)?.is_some() {
                return Err(ApiError::BadRequest("Username already registered".into()));
            }
            let hashed = hash_password(&request.password)?;
            Ok(vault.register_user(User::new(request.username, request.display_name, hashed))?)
        })
        .await?;

    Ok(Json(user.view()))
}

/// POST /token
pub async fn login(
    State(state): State<AppState>,
    ApiForm(form): ApiForm<LoginForm>,
) -> Result<Json<TokenResponse>, ApiError> {
    let username = form.username.clone();
    let authenticated = state
        .run(move |vault| -> Result<bool, ApiError> {
            let Some(user) = vault.find_user(&form.username)? else {
                return Ok(false);
            };
            Ok(verify_password(&form.password, &user.hashed_password)?)
        })
        .await?;

    if !authenticated {
        tracing::warn!("Failed login for {}", username);
        return Err(ApiError::Unauthorized("Incorrect username or password".into()));
    }

    let access_token = state.tokens.issue(&username)?;
    tracing::info!("Issued access token for {}", username);

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".into(),
    }))
}
