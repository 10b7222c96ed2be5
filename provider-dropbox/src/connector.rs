//! Dropbox API connector implementation
//!
//! Implements the `StorageProvider` trait for the Dropbox API v2.

use async_trait::async_trait;
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use bridge_traits::storage::{FolderListing, StorageError, StorageProvider, StorageResult};
use core_auth::{OAuthConfig, OAuthFlowManager, ProviderKind, RefreshCredentials};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::error::{DropboxError, Result};
use crate::types::{ApiErrorBody, ListFolderArg, ListFolderResult};

/// Dropbox RPC endpoint base URL
const DROPBOX_API_BASE: &str = "https://api.dropboxapi.com/2";

/// Base URLs the connector talks to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropboxEndpoints {
    /// OAuth 2.0 token endpoint
    pub token_url: String,
    /// RPC base, without trailing slash
    pub api_base: String,
}

impl Default for DropboxEndpoints {
    fn default() -> Self {
        Self {
            token_url: ProviderKind::Dropbox.token_url().to_string(),
            api_base: DROPBOX_API_BASE.to_string(),
        }
    }
}

impl DropboxEndpoints {
    /// Endpoints rooted at another host, laid out like `api.dropboxapi.com`
    ///
    /// ```
    /// use provider_dropbox::DropboxEndpoints;
    ///
    /// let endpoints = DropboxEndpoints::with_base_url("http://127.0.0.1:8080/");
    /// assert_eq!(endpoints.token_url, "http://127.0.0.1:8080/oauth2/token");
    /// assert_eq!(endpoints.api_base, "http://127.0.0.1:8080/2");
    /// ```
    pub fn with_base_url(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            token_url: format!("{}/oauth2/token", base),
            api_base: format!("{}/2", base),
        }
    }
}

/// Dropbox API connector
///
/// Implements `StorageProvider` for the Dropbox API v2.
///
/// Construction never fails. Credentials are checked on every call, so a
/// connector built from an incomplete configuration answers each listing
/// with [`StorageError::Configuration`].
///
/// A fresh access token is obtained from the refresh token for every
/// listing; tokens are not cached between calls.
///
/// # Example
///
/// ```no_run
/// use provider_dropbox::DropboxConnector;
/// use bridge_traits::storage::StorageProvider;
/// use core_auth::RefreshCredentials;
///
/// # async fn example(
/// #     http_client: std::sync::Arc<dyn bridge_traits::http::HttpClient>,
/// # ) -> bridge_traits::storage::StorageResult<()> {
/// let credentials = RefreshCredentials::new("app-key", "app-secret", "refresh-token");
/// let connector = DropboxConnector::new(http_client, credentials);
/// let listing = connector.list_folder("").await?;
/// println!("{:?}", listing.names());
/// # Ok(())
/// # }
/// ```
pub struct DropboxConnector {
    http_client: Arc<dyn HttpClient>,
    credentials: RefreshCredentials,
    endpoints: DropboxEndpoints,
    oauth: OAuthFlowManager,
}

impl DropboxConnector {
    /// Create a connector against the public Dropbox endpoints
    pub fn new(http_client: Arc<dyn HttpClient>, credentials: RefreshCredentials) -> Self {
        Self::with_endpoints(http_client, credentials, DropboxEndpoints::default())
    }

    /// Create a connector against custom endpoints
    pub fn with_endpoints(
        http_client: Arc<dyn HttpClient>,
        credentials: RefreshCredentials,
        endpoints: DropboxEndpoints,
    ) -> Self {
        let oauth_config = OAuthConfig::for_provider(
            ProviderKind::Dropbox,
            credentials.client_id(),
            Some(credentials.client_secret()),
        )
        .with_token_url(endpoints.token_url.clone());

        let oauth = OAuthFlowManager::new(oauth_config, Arc::clone(&http_client));

        Self {
            http_client,
            credentials,
            endpoints,
            oauth,
        }
    }

    async fn fetch_listing(&self, path: &str, recursive: bool) -> Result<FolderListing> {
        let missing = self.credentials.missing_fields();
        if !missing.is_empty() {
            warn!(missing = ?missing, "Dropbox credentials incomplete");
            return Err(DropboxError::MissingCredentials(missing.join(", ")));
        }

        let tokens = self
            .oauth
            .refresh_access_token(self.credentials.refresh_token())
            .await?;
        debug!(expires_in = tokens.expires_in, "Obtained Dropbox access token");

        let request = HttpRequest::new(
            HttpMethod::Post,
            format!("{}/files/list_folder", self.endpoints.api_base),
        )
        .bearer_token(&tokens.access_token)
        .header("Accept", "application/json")
        .json(&ListFolderArg::new(path).with_recursive(recursive))?;

        let response = self.http_client.execute(request).await?;

        if !response.is_success() {
            return Err(Self::classify_failure(&response));
        }

        let result: ListFolderResult = response
            .json()
            .map_err(|e| DropboxError::ParseError(e.to_string()))?;

        if result.has_more {
            debug!("Listing has more entries; only the first page is returned");
        }

        Ok(result.into_listing())
    }

    /// Map a non-2xx answer onto an error category
    fn classify_failure(response: &HttpResponse) -> DropboxError {
        let status = response.status;
        let body = String::from_utf8_lossy(&response.body).trim().to_string();
        let summary = serde_json::from_str::<ApiErrorBody>(&body)
            .map(|parsed| parsed.error_summary)
            .unwrap_or(body);
        let summary = if summary.trim().is_empty() {
            format!("HTTP {}", status)
        } else {
            summary
        };

        warn!(status = status, summary = %summary, "Dropbox API request failed");

        match status {
            400 => DropboxError::BadInput(summary),
            401 => DropboxError::Unauthorized(summary),
            429 => DropboxError::RateLimitExceeded {
                retry_after_seconds: response
                    .header("Retry-After")
                    .and_then(|value| value.trim().parse().ok())
                    .unwrap_or(0),
            },
            500..=599 => DropboxError::ServerError {
                status,
                message: summary,
            },
            _ => DropboxError::ApiError { status, summary },
        }
    }
}

#[async_trait]
impl StorageProvider for DropboxConnector {
    #[instrument(skip(self), fields(provider = "dropbox"))]
    async fn list_folder(&self, path: &str) -> StorageResult<FolderListing> {
        info!("Listing Dropbox folder");

        let listing = self
            .fetch_listing(path, false)
            .await
            .map_err(StorageError::from)?;

        info!(entries = listing.entries.len(), "Dropbox folder listed");
        Ok(listing)
    }

    #[instrument(skip(self), fields(provider = "dropbox"))]
    async fn list_folder_recursive(&self, path: &str) -> StorageResult<FolderListing> {
        info!("Listing Dropbox folder tree");

        let listing = self
            .fetch_listing(path, true)
            .await
            .map_err(StorageError::from)?;

        info!(entries = listing.entries.len(), "Dropbox folder tree listed");
        Ok(listing)
    }

    fn is_configured(&self) -> bool {
        self.credentials.is_complete()
    }
}
