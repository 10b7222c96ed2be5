//! # Authentication Module
//!
//! OAuth 2.0 refresh-token credentials for cloud storage providers.
//!
//! ## Overview
//!
//! This module turns a long-lived refresh token (plus the application's client
//! id and secret) into a short-lived access token by calling the provider's
//! token endpoint. Tokens are minted on demand and never persisted.
//!
//! ## Features
//!
//! - Refresh-token grant (RFC 6749 §6)
//! - Credential completeness checks with whitespace trimming
//! - OAuth error bodies (`{"error": "invalid_grant", ...}`) decoded into [`AuthError`]
//! - Redacted `Debug` output for every type carrying a secret

pub mod error;
pub mod oauth;
pub mod types;

pub use error::{AuthError, Result};
pub use oauth::{OAuthConfig, OAuthFlowManager};
pub use types::{OAuthTokens, ProviderKind, RefreshCredentials};
