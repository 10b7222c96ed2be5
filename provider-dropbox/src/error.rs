//! Error types for Dropbox provider

use bridge_traits::error::BridgeError;
use bridge_traits::storage::StorageError;
use core_auth::AuthError;
use thiserror::Error;

/// Dropbox provider errors
#[derive(Error, Debug)]
pub enum DropboxError {
    /// App key, app secret or refresh token is empty
    #[error("Missing Dropbox credentials: {0}")]
    MissingCredentials(String),

    /// Refreshing the access token failed
    #[error(transparent)]
    TokenRefresh(#[from] AuthError),

    /// Dropbox rejected the access token (HTTP 401)
    #[error("{0}")]
    Unauthorized(String),

    /// Dropbox rejected the request arguments (HTTP 400)
    #[error("Bad input: {0}")]
    BadInput(String),

    /// Endpoint-specific error, e.g. `path/not_found/..` (HTTP 409)
    #[error("{summary}")]
    ApiError { status: u16, summary: String },

    /// Rate limit exceeded
    #[error("Rate limit exceeded, retry after {retry_after_seconds} seconds")]
    RateLimitExceeded { retry_after_seconds: u64 },

    /// Dropbox answered with a 5xx status
    #[error("Dropbox server error (status {status}): {message}")]
    ServerError { status: u16, message: String },

    /// Failed to parse API response
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Transport failure
    #[error(transparent)]
    BridgeError(#[from] BridgeError),
}

/// Result type for Dropbox operations
pub type Result<T> = std::result::Result<T, DropboxError>;

impl From<DropboxError> for StorageError {
    fn from(error: DropboxError) -> Self {
        match error {
            DropboxError::MissingCredentials(fields) => StorageError::Configuration(fields),
            DropboxError::TokenRefresh(auth_error) => match auth_error {
                AuthError::ProviderUnavailable { status, message } => {
                    StorageError::InternalServer { status, message }
                }
                AuthError::NetworkError(msg) => StorageError::Network(msg),
                AuthError::InvalidResponse(msg) => StorageError::Parse(msg),
                other => StorageError::Auth(other.to_string()),
            },
            DropboxError::Unauthorized(msg) => StorageError::Auth(msg),
            DropboxError::BadInput(msg) => StorageError::BadInput(msg),
            DropboxError::ApiError { status, summary } => StorageError::Api { status, summary },
            DropboxError::RateLimitExceeded {
                retry_after_seconds,
            } => StorageError::RateLimit {
                retry_after_seconds,
            },
            DropboxError::ServerError { status, message } => {
                StorageError::InternalServer { status, message }
            }
            DropboxError::ParseError(msg) => StorageError::Parse(msg),
            DropboxError::BridgeError(e) => StorageError::Network(e.to_string()),
        }
    }
}
