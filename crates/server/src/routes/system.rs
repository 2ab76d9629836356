use axum::Json;
use axum::extract::State;

use super::Message;
use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /
pub async fn root() -> Json<Message> {
    Json(Message::new("Welcome to QuestVault API"))
}

/// POST /reset
///
/// Removes the caller's quests and achievements; the account itself stays.
pub async fn reset(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Message>, ApiError> {
    state
        .run(move |vault| vault.reset_for_owner(&user.id))
        .await?;
    Ok(Json(Message::new("Your data has been reset.")))
}
