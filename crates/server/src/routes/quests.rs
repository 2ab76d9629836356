use axum::Json;
use axum::extract::{Path, State};
use quest_core::{Quest, QuestDraft, QuestPatch};

use super::{Message, VisibilityUpdate};
use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::state::AppState;

/// GET /quests
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Quest>>, ApiError> {
    let quests = state
        .run(move |vault| vault.list_entities::<Quest>(Some(&user.id)))
        .await?;
    Ok(Json(quests))
}

/// POST /quests
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiJson(draft): ApiJson<QuestDraft>,
) -> Result<Json<Quest>, ApiError> {
    let quest = state
        .run(move |vault| vault.create_quest(&user.id, draft))
        .await?;
    Ok(Json(quest))
}

/// POST /quests/bulk-visibility
pub async fn bulk_visibility(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiJson(update): ApiJson<VisibilityUpdate>,
) -> Result<Json<Message>, ApiError> {
    let hidden = update.is_hidden;
    state
        .run(move |vault| vault.bulk_set_visibility::<Quest>(&user.id, hidden))
        .await?;
    Ok(Json(Message::new(format!(
        "All quests visibility set to {hidden}"
    ))))
}

/// GET /quests/:id
pub async fn get(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Quest>, ApiError> {
    let quest = state
        .run(move |vault| vault.get_owned::<Quest>(&id, &user.id))
        .await?;
    Ok(Json(quest))
}

/// PATCH /quests/:id
///
/// Moving a quest into `completed` also records its achievement.
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<QuestPatch>,
) -> Result<Json<Quest>, ApiError> {
    let quest = state
        .run(move |vault| vault.update_entity::<Quest>(&id, patch, &user.id))
        .await?;
    Ok(Json(quest))
}

/// DELETE /quests/:id
pub async fn delete(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Message>, ApiError> {
    let deleted = state
        .run(move |vault| vault.delete_entity::<Quest>(&id, &user.id))
        .await?;

    if !deleted {
        return Err(ApiError::NotFound("Quest not found".into()));
    }
    Ok(Json(Message::new("Quest deleted successfully")))
}
