//! OAuth 2.0 Refresh-Token Flow
//!
//! This module implements the refresh-token grant of RFC 6749 §6 against a
//! provider's token endpoint.
//!
//! # Overview
//!
//! The flow manager:
//! - Encodes the `grant_type=refresh_token` form request with client credentials
//! - Issues it exactly once (no retry)
//! - Decodes the token response, or the OAuth error body on rejection
//!
//! # Security
//!
//! - Never logs sensitive values (tokens, client secret)
//!
//! # Example
//!
//! ```no_run
//! use core_auth::oauth::{OAuthFlowManager, OAuthConfig};
//! use core_auth::ProviderKind;
//! use std::sync::Arc;
//!
//! # async fn example() -> core_auth::Result<()> {
//! # use bridge_traits::http::HttpClient;
//! # let http_client: Arc<dyn HttpClient> = todo!();
//! let config = OAuthConfig::for_provider(ProviderKind::Dropbox, "app-key", Some("app-secret"));
//!
//! let flow_manager = OAuthFlowManager::new(config, http_client);
//! let tokens = flow_manager.refresh_access_token("refresh-token").await?;
//! # Ok(())
//! # }
//! ```

use crate::error::{AuthError, Result};
use crate::types::{OAuthTokens, ProviderKind};
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// OAuth 2.0 provider configuration.
#[derive(Clone)]
pub struct OAuthConfig {
    /// The provider kind
    pub provider: ProviderKind,
    /// OAuth client ID (the application key)
    pub client_id: String,
    /// OAuth client secret (optional for public clients)
    pub client_secret: Option<String>,
    /// Token endpoint URL
    pub token_url: String,
}

impl OAuthConfig {
    /// Configuration using the provider's default token endpoint
    pub fn for_provider(
        provider: ProviderKind,
        client_id: impl Into<String>,
        client_secret: Option<impl Into<String>>,
    ) -> Self {
        Self {
            provider,
            client_id: client_id.into(),
            client_secret: client_secret.map(Into::into),
            token_url: provider.token_url().to_string(),
        }
    }

    /// Override the token endpoint
    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }
}

impl std::fmt::Debug for OAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthConfig")
            .field("provider", &self.provider)
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .field("token_url", &self.token_url)
            .finish()
    }
}

/// OAuth 2.0 flow manager.
///
/// Exchanges refresh tokens for access tokens at the configured endpoint.
pub struct OAuthFlowManager {
    config: OAuthConfig,
    http_client: Arc<dyn HttpClient>,
}

impl OAuthFlowManager {
    /// Create a new OAuth flow manager with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - OAuth provider configuration
    /// * `http_client` - HTTP client for making token requests
    pub fn new(config: OAuthConfig, http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            config,
            http_client,
        }
    }

    /// Refresh an access token using a refresh token.
    ///
    /// The request is sent once. The returned token set carries the refresh
    /// token the provider handed back, or the one supplied when the provider
    /// did not rotate it.
    ///
    /// # Errors
    ///
    /// - [`AuthError::TokenRejected`] when the endpoint returns an OAuth error
    ///   body (e.g. `invalid_grant` for a revoked or malformed token)
    /// - [`AuthError::TokenRefreshFailed`] for other 4xx answers, including
    ///   OAuth bodies whose `error` code is blank
    /// - [`AuthError::ProviderUnavailable`] for 5xx answers
    /// - [`AuthError::NetworkError`] when the endpoint cannot be reached
    /// - [`AuthError::InvalidResponse`] when a 2xx body cannot be decoded
    #[instrument(skip(self, refresh_token), fields(provider = %self.config.provider))]
    pub async fn refresh_access_token(&self, refresh_token: &str) -> Result<OAuthTokens> {
        let mut params = vec![
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", self.config.client_id.as_str()),
        ];

        if let Some(ref client_secret) = self.config.client_secret {
            params.push(("client_secret", client_secret.as_str()));
        }

        debug!("Refreshing access token");

        let encoded_body = serde_urlencoded::to_string(&params)
            .map_err(|e| AuthError::Other(format!("Failed to encode token request: {}", e)))?;

        let request = HttpRequest::new(HttpMethod::Post, self.config.token_url.clone())
            .header("Content-Type", "application/x-www-form-urlencoded")
            .header("Accept", "application/json")
            .body(Bytes::from(encoded_body));

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|e| AuthError::NetworkError(e.to_string()))?;

        if response.is_success() {
            let token_response: TokenResponse = response.json().map_err(|e| {
                AuthError::InvalidResponse(format!("Failed to parse token response: {}", e))
            })?;

            info!(
                "Successfully refreshed token (expires in {}s)",
                token_response.expires_in
            );

            return Ok(OAuthTokens::new(
                token_response.access_token,
                token_response
                    .refresh_token
                    .unwrap_or_else(|| refresh_token.to_string()),
                token_response.expires_in,
            ));
        }

        let status = response.status;
        let error_body = response
            .text()
            .unwrap_or_else(|_| "Unable to read error response".to_string());

        if response.is_server_error() {
            warn!(status = status, "Token endpoint unavailable");
            return Err(AuthError::ProviderUnavailable {
                status,
                message: error_body,
            });
        }

        match serde_json::from_str::<OAuthErrorResponse>(&error_body) {
            Ok(oauth_error) if !oauth_error.error.trim().is_empty() => {
                warn!(
                    status = status,
                    error = %oauth_error.error,
                    "Token refresh rejected"
                );
                Err(AuthError::TokenRejected {
                    status,
                    error: oauth_error.error,
                    description: oauth_error.error_description,
                })
            }
            _ => {
                warn!(status = status, error = %error_body, "Token refresh failed");
                let detail = if error_body.trim().is_empty() {
                    "empty response body"
                } else {
                    error_body.trim()
                };
                Err(AuthError::TokenRefreshFailed(format!(
                    "Token endpoint returned {}: {}",
                    status, detail
                )))
            }
        }
    }
}

/// Token response from the OAuth provider.
#[derive(Debug, Deserialize, Serialize)]
struct TokenResponse {
    access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    token_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scope: Option<String>,
}

fn default_expires_in() -> i64 {
    // Dropbox short-lived tokens last four hours
    14_400
}

/// Error body defined by RFC 6749 §5.2
#[derive(Debug, Deserialize)]
struct OAuthErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::error::{BridgeError, Result as BridgeResult};
    use bridge_traits::http::HttpResponse;
    use mockall::mock;
    use std::collections::HashMap;

    mock! {
        HttpClient {}

        #[async_trait::async_trait]
        impl HttpClient for HttpClient {
            async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
        }
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: HashMap::new(),
            body: Bytes::from(body.to_string()),
        }
    }

    fn manager(mock_http: MockHttpClient) -> OAuthFlowManager {
        let config = OAuthConfig::for_provider(ProviderKind::Dropbox, "app-key", Some("app-secret"))
            .with_token_url("https://auth.example.com/token");
        OAuthFlowManager::new(config, Arc::new(mock_http))
    }

    #[tokio::test]
    async fn test_refresh_success_keeps_refresh_token() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .times(1)
            .returning(|request| {
                assert_eq!(request.url, "https://auth.example.com/token");
                let body = String::from_utf8(request.body.unwrap().to_vec()).unwrap();
                assert!(body.contains("grant_type=refresh_token"));
                assert!(body.contains("refresh_token=stored-token"));
                assert!(body.contains("client_id=app-key"));
                assert!(body.contains("client_secret=app-secret"));
                Ok(response(
                    200,
                    r#"{"access_token":"sl.fresh","token_type":"bearer","expires_in":14400}"#,
                ))
            });

        let tokens = manager(mock_http)
            .refresh_access_token("stored-token")
            .await
            .unwrap();

        assert_eq!(tokens.access_token, "sl.fresh");
        assert_eq!(tokens.refresh_token, "stored-token");
        assert_eq!(tokens.expires_in, 14_400);
    }

    #[tokio::test]
    async fn test_refresh_rejected_with_oauth_error() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().times(1).returning(|_| {
            Ok(response(
                400,
                r#"{"error":"invalid_grant","error_description":"refresh token is malformed"}"#,
            ))
        });

        let error = manager(mock_http)
            .refresh_access_token("bad")
            .await
            .unwrap_err();

        assert_eq!(error.to_string(), "invalid_grant");
        assert!(matches!(
            error,
            AuthError::TokenRejected { status: 400, ref description, .. }
                if description.as_deref() == Some("refresh token is malformed")
        ));
    }

    #[tokio::test]
    async fn test_refresh_failed_with_plain_body() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .times(1)
            .returning(|_| Ok(response(401, "unauthorized")));

        let error = manager(mock_http)
            .refresh_access_token("bad")
            .await
            .unwrap_err();

        assert_eq!(
            error,
            AuthError::TokenRefreshFailed("Token endpoint returned 401: unauthorized".to_string())
        );
    }

    #[tokio::test]
    async fn test_refresh_with_blank_oauth_error_code_keeps_a_message() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .times(1)
            .returning(|_| Ok(response(400, r#"{"error":""}"#)));

        let error = manager(mock_http)
            .refresh_access_token("bad")
            .await
            .unwrap_err();

        assert_eq!(
            error,
            AuthError::TokenRefreshFailed(r#"Token endpoint returned 400: {"error":""}"#.to_string())
        );
        assert!(!error.to_string().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_with_empty_body_names_the_status() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .times(1)
            .returning(|_| Ok(response(401, "")));

        let error = manager(mock_http)
            .refresh_access_token("bad")
            .await
            .unwrap_err();

        assert_eq!(
            error.to_string(),
            "Token refresh failed: Token endpoint returned 401: empty response body"
        );
    }

    #[tokio::test]
    async fn test_refresh_server_error_is_not_retried() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .times(1)
            .returning(|_| Ok(response(503, "maintenance")));

        let error = manager(mock_http)
            .refresh_access_token("token")
            .await
            .unwrap_err();

        assert!(matches!(error, AuthError::ProviderUnavailable { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_refresh_network_error() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().times(1).returning(|_| {
            Err(BridgeError::ConnectionFailed("dns failure".to_string()))
        });

        let error = manager(mock_http)
            .refresh_access_token("token")
            .await
            .unwrap_err();

        assert!(matches!(error, AuthError::NetworkError(msg) if msg.contains("dns failure")));
    }

    #[tokio::test]
    async fn test_refresh_unparseable_success_body() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .times(1)
            .returning(|_| Ok(response(200, "<html>")));

        let error = manager(mock_http)
            .refresh_access_token("token")
            .await
            .unwrap_err();

        assert!(matches!(error, AuthError::InvalidResponse(_)));
    }

    #[test]
    fn test_oauth_config_debug_redacts_secret() {
        let config = OAuthConfig::for_provider(ProviderKind::Dropbox, "key", Some("hidden"));
        let debug = format!("{:?}", config);
        assert!(debug.contains("key"));
        assert!(!debug.contains("hidden"));
        assert_eq!(config.token_url, "https://api.dropboxapi.com/oauth2/token");
    }

    #[test]
    fn test_token_response_deserialization_minimal() {
        let json = r#"{
            "access_token": "token"
        }"#;

        let response: TokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.access_token, "token");
        assert_eq!(response.refresh_token, None);
        assert_eq!(response.expires_in, 14_400);
    }
}
