use axum::Json;
use axum::extract::{Path, State};
use quest_core::{Achievement, Profile, PublicProfile};

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /profile
pub async fn own(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Profile>, ApiError> {
    let profile = state.run(move |vault| vault.profile(&user)).await?;
    Ok(Json(profile))
}

/// GET /public/profile/:username
pub async fn public(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<PublicProfile>, ApiError> {
    let profile = state
        .run(move |vault| vault.public_profile(&username))
        .await?;
    Ok(Json(profile))
}

/// GET /public/achievements/:id
pub async fn public_achievement(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Achievement>, ApiError> {
    let achievement = state
        .run(move |vault| vault.public_achievement(&id))
        .await?;
    Ok(Json(achievement))
}
