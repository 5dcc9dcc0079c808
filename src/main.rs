mod config;
mod server;

use std::sync::Arc;

use config::Config;
use openai_api::{AssistantSessionClient, FileStore, SessionState};
use tracing::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    info!(
        "Starting... CARGO_PKG_NAME={}, CARGO_PKG_VERSION={}, version={}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        option_env!("version").unwrap_or("(not defined at compile)")
    );

    let config = Config::from_env()?;
    info!(
        "state_dir={}, model={}, poll={}x{:?}",
        config.state_dir.display(),
        config.openai.model,
        config.retry.max_attempts,
        config.retry.interval
    );

    let store = Arc::new(FileStore::new(&config.state_dir));
    let session = SessionState::new(store, config.fingerprint_mode);
    let client = AssistantSessionClient::new(config.openai, session, config.retry);

    if client.ensure_credential_consistency().await? {
        info!("Cached assistant and thread were created with another API key, starting fresh");
    }

    server::serve(config.bind_addr, Arc::new(client)).await?;
    Ok(())
}
