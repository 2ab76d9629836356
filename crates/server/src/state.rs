//! Shared handler state.

use std::sync::Arc;

use quest_store::QuestVault;

use crate::auth::TokenIssuer;
use crate::error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub vault: Arc<QuestVault>,
    pub tokens: Arc<TokenIssuer>,
}

impl AppState {
    pub fn new(vault: QuestVault, tokens: TokenIssuer) -> Self {
        Self {
            vault: Arc::new(vault),
            tokens: Arc::new(tokens),
        }
    }

    /// Run blocking vault work (file I/O, password hashing) off the async
    /// executor.
    pub async fn run<T, E, F>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&QuestVault) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: Into<ApiError> + Send + 'static,
    {
        let vault = Arc::clone(&self.vault);
        tokio::task::spawn_blocking(move || f(&vault))
            .await
            .map_err(|e| ApiError::Internal(format!("store task failed: {e}")))?
            .map_err(Into::into)
    }
}
