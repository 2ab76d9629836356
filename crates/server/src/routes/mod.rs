//! HTTP routes.

mod account;
mod achievements;
mod profile;
mod quests;
mod system;

use axum::Router;
use axum::routing::{get, post};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Body of both bulk-visibility endpoints.
#[derive(Debug, Deserialize)]
pub struct VisibilityUpdate {
    pub is_hidden: bool,
}

/// Plain acknowledgement body.
#[derive(Debug, Serialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Build the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(system::root))
        // Accounts
        .route("/register", post(account::register))
        .route("/token", post(account::login))
        // Quests
        .route("/quests", get(quests::list).post(quests::create))
        .route("/quests/bulk-visibility", post(quests::bulk_visibility))
        .route(
            "/quests/:id",
            get(quests::get).patch(quests::update).delete(quests::delete),
        )
        // Achievements
        .route("/achievements", get(achievements::list).post(achievements::create))
        .route("/achievements/bulk-visibility", post(achievements::bulk_visibility))
        .route(
            "/achievements/:id",
            get(achievements::get).patch(achievements::update),
        )
        // Profiles
        .route("/profile", get(profile::own))
        .route("/public/profile/:username", get(profile::public))
        .route("/public/achievements/:id", get(profile::public_achievement))
        // Maintenance
        .route("/reset", post(system::reset))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
