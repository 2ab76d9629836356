//! Command line and environment configuration.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use quest_store::{CompletionPipeline, QuestVault, RecordStore};

use crate::auth::{AuthError, TokenIssuer};

/// QuestVault API server
#[derive(Debug, Parser)]
#[command(name = "questvault")]
#[command(about = "Quest tracker API backed by a single JSON file", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub config: ServerConfig,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Copy, Default, Subcommand)]
pub enum Command {
    /// Serve the HTTP API (default)
    #[default]
    Serve,

    /// Insert the demo users and the veteran's quests, then exit
    Seed,

    /// Wipe every collection in the data file, then exit
    ResetAll,
}

#[derive(Debug, Clone, Args)]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "QUESTVAULT_BIND", default_value = "127.0.0.1:8000")]
    pub bind: SocketAddr,

    /// Path of the JSON data file
    #[arg(long, env = "QUESTVAULT_DB_PATH", default_value = "local_db.json")]
    pub db_path: PathBuf,

    /// HS256 signing secret (at least 32 characters); a development secret
    /// is used when unset
    #[arg(long, env = "QUESTVAULT_JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: Option<String>,

    /// Access token lifetime in minutes
    #[arg(long, env = "QUESTVAULT_TOKEN_TTL_MINUTES", default_value_t = 30)]
    pub token_ttl_minutes: u64,

    /// Seed demo data before serving
    #[arg(long, env = "QUESTVAULT_SEED")]
    pub seed: bool,
}

impl ServerConfig {
    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_minutes * 60)
    }

    pub fn token_issuer(&self) -> Result<TokenIssuer, AuthError> {
        match &self.jwt_secret {
            Some(secret) => TokenIssuer::new(secret.clone(), self.token_ttl()),
            None => {
                tracing::warn!("QUESTVAULT_JWT_SECRET not set; using the development secret");
                Ok(TokenIssuer::new_dev(self.token_ttl()))
            }
        }
    }

    /// Open the data file and wire the vault with random flavor text.
    pub fn open_vault(&self) -> quest_store::Result<QuestVault> {
        let store = RecordStore::open(&self.db_path)?;
        tracing::info!("Opened data file {}", self.db_path.display());
        Ok(QuestVault::new(Arc::new(store), CompletionPipeline::random()))
    }
}
