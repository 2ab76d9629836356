use axum::Json;
use axum::extract::{Path, State};
use quest_core::{Achievement, AchievementDraft, AchievementPatch};

use super::{Message, VisibilityUpdate};
use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::state::AppState;

/// GET /achievements
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Achievement>>, ApiError> {
    let achievements = state
        .run(move |vault| vault.list_entities::<Achievement>(Some(&user.id)))
        .await?;
    Ok(Json(achievements))
}

/// POST /achievements
///
/// Missing image, description, and reward are filled from the phrase pools.
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiJson(draft): ApiJson<AchievementDraft>,
) -> Result<Json<Achievement>, ApiError> {
    let achievement = state
        .run(move |vault| vault.create_achievement(&user.id, draft))
        .await?;
    Ok(Json(achievement))
}

/// POST /achievements/bulk-visibility
pub async fn bulk_visibility(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiJson(update): ApiJson<VisibilityUpdate>,
) -> Result<Json<Message>, ApiError> {
    let hidden = update.is_hidden;
    state
        .run(move |vault| vault.bulk_set_visibility::<Achievement>(&user.id, hidden))
        .await?;
    Ok(Json(Message::new(format!(
        "All achievements visibility set to {hidden}"
    ))))
}

/// GET /achievements/:id
pub async fn get(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Achievement>, ApiError> {
    let achievement = state
        .run(move |vault| vault.get_owned::<Achievement>(&id, &user.id))
        .await?;
    Ok(Json(achievement))
}

/// PATCH /achievements/:id
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<AchievementPatch>,
) -> Result<Json<Achievement>, ApiError> {
    let achievement = state
        .run(move |vault| vault.update_entity::<Achievement>(&id, patch, &user.id))
        .await?;
    Ok(Json(achievement))
}
