//! Shared handler state.

use std::sync::Arc;

use bridge_desktop::ReqwestHttpClient;
use bridge_traits::http::HttpClient;
use bridge_traits::storage::StorageProvider;
use core_auth::RefreshCredentials;
use core_runtime::config::WebhookConfig;
use provider_dropbox::{DropboxConnector, DropboxEndpoints};

use crate::error::Result;

/// Read-only state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<WebhookConfig>,
    pub storage: Arc<dyn StorageProvider>,
}

impl AppState {
    /// Construct the state from an explicit storage provider.
    pub fn new(config: WebhookConfig, storage: Arc<dyn StorageProvider>) -> Self {
        Self {
            config: Arc::new(config),
            storage,
        }
    }

    /// Construct the production state: a reqwest-backed Dropbox connector
    /// holding the credentials from `config`.
    ///
    /// Incomplete credentials do not fail here; they surface as
    /// configuration errors on each listing.
    pub fn from_config(config: WebhookConfig, endpoints: DropboxEndpoints) -> Result<Self> {
        let http_client: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new()?);
        let credentials = RefreshCredentials::new(
            config.app_key.as_str(),
            config.app_secret.as_str(),
            config.refresh_token.as_str(),
        );
        let connector = DropboxConnector::with_endpoints(http_client, credentials, endpoints);

        Ok(Self::new(config, Arc::new(connector)))
    }
}
