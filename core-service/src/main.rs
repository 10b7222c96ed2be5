use anyhow::{Context, Result};
use core_runtime::config::WebhookConfig;
use core_runtime::logging::init_logging;
use core_service::AppState;
use provider_dropbox::DropboxEndpoints;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let config = WebhookConfig::from_env().context("Failed to load configuration")?;
    init_logging(config.logging_config()).context("Failed to initialize logging")?;

    info!(?config, "Starting Dropbox webhook service");
    if !config.has_credentials() {
        warn!("Dropbox credentials incomplete; listings will fail with ConfigurationError");
    }

    let bind_addr = config.bind_addr;
    let state = AppState::from_config(config, DropboxEndpoints::default())
        .context("Failed to build service state")?;

    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;

    core_service::serve(listener, state)
        .await
        .context("Webhook service stopped")?;

    Ok(())
}
