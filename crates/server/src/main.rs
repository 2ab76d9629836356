//! QuestVault server entry point.

use anyhow::Result;
use clap::Parser;
use questvault_server::{AppState, Cli, Command, logging, seed};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    logging::init();

    let config = cli.config;
    let vault = config.open_vault()?;

    match cli.command.unwrap_or_default() {
        Command::Serve => {
            if config.seed {
                seed::seed(&vault)?;
            }
            let state = AppState::new(vault, config.token_issuer()?);
            questvault_server::serve(&config, state).await
        }
        Command::Seed => {
            seed::seed(&vault)?;
            Ok(())
        }
        Command::ResetAll => {
            vault.clear_all()?;
            tracing::info!("Cleared {}", config.db_path.display());
            Ok(())
        }
    }
}
