//! Webhook service façade and bootstrap helpers.
//!
//! This crate wires the desktop HTTP bridge and the Dropbox provider into an
//! axum router exposing:
//!
//! - `/api/webhooks/test-dropbox`: lists the configured folder and reports
//!   the entry names, or a categorized error
//! - `GET /api/webhooks/dropbox`: Dropbox webhook URL verification
//! - `POST /api/webhooks/dropbox`: Dropbox change notifications
//! - `GET /api/webhooks/debug-config`: configuration diagnostics
//!
//! Handlers receive their configuration and storage provider through
//! [`AppState`]; nothing is read from the environment at request time.

pub mod error;
pub mod handlers;
pub mod response;
pub mod state;

pub use error::{CoreError, Result};
pub use response::ListingResponse;
pub use state::AppState;

use axum::routing::{any, get};
use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

pub const TEST_DROPBOX_ROUTE: &str = "/api/webhooks/test-dropbox";
pub const DROPBOX_WEBHOOK_ROUTE: &str = "/api/webhooks/dropbox";
pub const DEBUG_CONFIG_ROUTE: &str = "/api/webhooks/debug-config";

/// Build the service router around the shared state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(TEST_DROPBOX_ROUTE, any(handlers::test_dropbox))
        .route(
            DROPBOX_WEBHOOK_ROUTE,
            get(handlers::verify_webhook).post(handlers::receive_notification),
        )
        .route(DEBUG_CONFIG_ROUTE, get(handlers::debug_config))
        .with_state(state)
}

/// Serve the router on an already bound listener until the process stops.
pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    let addr = listener.local_addr()?;
    info!("Webhook service listening on http://{}", addr);

    axum::serve(listener, router(state)).await?;
    Ok(())
}
