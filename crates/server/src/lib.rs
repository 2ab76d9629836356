//! HTTP surface for the quest tracker.
//!
//! Handlers stay thin: they resolve the caller from the bearer token, hand
//! the request to the [`quest_store::QuestVault`] on a blocking thread, and
//! map store errors to status codes.
pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod logging;
pub mod routes;
pub mod seed;
pub mod state;

pub use config::{Cli, Command, ServerConfig};
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;

use anyhow::Result;

/// Bind `config.bind` and serve until the process is stopped.
pub async fn serve(config: &ServerConfig, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    tracing::info!("QuestVault API listening on {}", listener.local_addr()?);

    axum::serve(listener, create_router(state)).await?;
    Ok(())
}
