use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported cloud storage providers.
///
/// Each provider has its own OAuth 2.0 token endpoint.
///
/// # Examples
///
/// ```
/// use core_auth::ProviderKind;
///
/// let provider = ProviderKind::Dropbox;
/// assert_eq!(provider.display_name(), "Dropbox");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderKind {
    /// Dropbox cloud storage (API v2)
    Dropbox,
}

impl ProviderKind {
    /// Get the human-readable display name for this provider
    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::Dropbox => "Dropbox",
        }
    }

    /// Default OAuth 2.0 token endpoint
    pub fn token_url(&self) -> &'static str {
        match self {
            ProviderKind::Dropbox => "https://api.dropboxapi.com/oauth2/token",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Application credentials plus a long-lived refresh token.
///
/// Values are trimmed on construction. Construction never fails; check
/// [`RefreshCredentials::missing_fields`] before exchanging the token.
///
/// # Examples
///
/// ```
/// use core_auth::RefreshCredentials;
///
/// let credentials = RefreshCredentials::new(" app-key ", "app-secret", "");
/// assert_eq!(credentials.client_id(), "app-key");
/// assert_eq!(credentials.missing_fields(), vec!["refresh_token"]);
/// assert!(!credentials.is_complete());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct RefreshCredentials {
    client_id: String,
    client_secret: String,
    refresh_token: String,
}

impl RefreshCredentials {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into().trim().to_string(),
            client_secret: client_secret.into().trim().to_string(),
            refresh_token: refresh_token.into().trim().to_string(),
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }

    /// Names of the credentials that are empty
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.client_id.is_empty() {
            missing.push("client_id");
        }
        if self.client_secret.is_empty() {
            missing.push("client_secret");
        }
        if self.refresh_token.is_empty() {
            missing.push("refresh_token");
        }
        missing
    }

    /// Whether every credential is present
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

impl fmt::Debug for RefreshCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}

/// OAuth 2.0 token set.
///
/// Contains the access token, the refresh token it was minted from, and the
/// lifetime the provider granted.
///
/// # Security
///
/// Tokens should never be logged. The `Debug` implementation
/// redacts sensitive information.
///
/// # Examples
///
/// ```
/// use core_auth::OAuthTokens;
///
/// let tokens = OAuthTokens::new("sl.u.abc".to_string(), "9F6-...".to_string(), 14_400);
///
/// assert_eq!(tokens.expires_in, 14_400);
/// assert!(!format!("{:?}", tokens).contains("sl.u.abc"));
/// ```
#[derive(Clone, Serialize, Deserialize)]
pub struct OAuthTokens {
    /// The access token used for API requests
    pub access_token: String,
    /// The refresh token used to obtain new access tokens
    pub refresh_token: String,
    /// Seconds until the access token expires, as granted by the provider
    pub expires_in: i64,
}

impl OAuthTokens {
    pub fn new(access_token: String, refresh_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            refresh_token,
            expires_in,
        }
    }
}

// Custom Debug implementation to avoid logging tokens
impl fmt::Debug for OAuthTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthTokens")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}
