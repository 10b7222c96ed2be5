use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The token endpoint answered with an OAuth error code (e.g. `invalid_grant`)
    #[error("{error}")]
    TokenRejected {
        status: u16,
        error: String,
        description: Option<String>,
    },

    #[error("Token refresh failed: {0}")]
    TokenRefreshFailed(String),

    #[error("Token endpoint unavailable (status {status}): {message}")]
    ProviderUnavailable { status: u16, message: String },

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Invalid token response: {0}")]
    InvalidResponse(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, AuthError>;
