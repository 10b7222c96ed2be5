//! # Service Configuration Module
//!
//! Provides configuration management for the webhook service.
//!
//! ## Overview
//!
//! The configuration is built once at process start, either from the
//! environment ([`WebhookConfig::from_env`]) or through the builder, and is
//! then injected read-only into the request handlers. Nothing reads the
//! environment at request time.
//!
//! ## Environment
//!
//! | Variable | Meaning | Default |
//! |---|---|---|
//! | `DROPBOX_APP_KEY` | OAuth client id | empty |
//! | `DROPBOX_APP_SECRET` | OAuth client secret | empty |
//! | `DROPBOX_REFRESH_TOKEN` | long-lived refresh token | empty |
//! | `DROPBOX_FOLDER_PATH` | folder to list | empty (root) |
//! | `WEBHOOK_BIND_ADDR` | listen address | `0.0.0.0:3000` |
//! | `LOG_LEVEL` | minimum log level | `info` |
//! | `LOG_FORMAT` | `pretty`, `json` or `compact` | build dependent |
//! | `RUST_LOG` | full filter override | unset |
//!
//! Missing credentials are not a configuration error: the service still
//! starts and every listing attempt fails with a configuration category.
//!
//! ## Usage
//!
//! ```
//! use core_runtime::config::WebhookConfig;
//!
//! let config = WebhookConfig::builder()
//!     .app_key("app-key")
//!     .app_secret("app-secret")
//!     .refresh_token("refresh-token")
//!     .folder_path("Invoices")
//!     .build()
//!     .expect("valid config");
//!
//! assert_eq!(config.folder_path, "/Invoices");
//! assert!(config.has_credentials());
//! ```

use crate::error::{Error, Result};
use crate::logging::{LogFormat, LogLevel, LoggingConfig};
use std::net::SocketAddr;

pub const ENV_APP_KEY: &str = "DROPBOX_APP_KEY";
pub const ENV_APP_SECRET: &str = "DROPBOX_APP_SECRET";
pub const ENV_REFRESH_TOKEN: &str = "DROPBOX_REFRESH_TOKEN";
pub const ENV_FOLDER_PATH: &str = "DROPBOX_FOLDER_PATH";
pub const ENV_BIND_ADDR: &str = "WEBHOOK_BIND_ADDR";
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";
pub const ENV_LOG_FILTER: &str = "RUST_LOG";

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Number of leading characters shown by [`describe_secret`]
const SECRET_PREFIX_CHARS: usize = 10;

/// Configuration for the webhook service.
///
/// Use [`WebhookConfigBuilder`] or [`WebhookConfig::from_env`] to construct
/// instances; both trim credentials and normalize the folder path.
#[derive(Clone, PartialEq, Eq)]
pub struct WebhookConfig {
    /// Dropbox application key (OAuth client id)
    pub app_key: String,

    /// Dropbox application secret (OAuth client secret)
    pub app_secret: String,

    /// Long-lived refresh token
    pub refresh_token: String,

    /// Folder to list, normalized; empty string is the root folder
    pub folder_path: String,

    /// Address the HTTP server binds to
    pub bind_addr: SocketAddr,

    pub log_level: LogLevel,
    pub log_format: LogFormat,
    /// Full `EnvFilter` override
    pub log_filter: Option<String>,
}

impl std::fmt::Debug for WebhookConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookConfig")
            .field("app_key", &describe_secret(&self.app_key))
            .field("app_secret", &describe_presence(&self.app_secret))
            .field("refresh_token", &describe_presence(&self.refresh_token))
            .field("folder_path", &self.folder_path)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("log_format", &self.log_format)
            .field("log_filter", &self.log_filter)
            .finish()
    }
}

impl WebhookConfig {
    /// Creates a new builder for constructing a `WebhookConfig`.
    pub fn builder() -> WebhookConfigBuilder {
        WebhookConfigBuilder::default()
    }

    /// Load the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load the configuration through an arbitrary variable lookup.
    ///
    /// Empty values for the server and logging variables count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the bind address, log level or log
    /// format cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let mut builder = Self::builder()
            .app_key(lookup(ENV_APP_KEY).unwrap_or_default())
            .app_secret(lookup(ENV_APP_SECRET).unwrap_or_default())
            .refresh_token(lookup(ENV_REFRESH_TOKEN).unwrap_or_default())
            .folder_path(lookup(ENV_FOLDER_PATH).unwrap_or_default());

        if let Some(addr) = non_empty(ENV_BIND_ADDR) {
            builder = builder.bind_addr(addr.trim().parse().map_err(|e| {
                Error::Config(format!("{} is not a socket address: {}", ENV_BIND_ADDR, e))
            })?);
        }

        if let Some(level) = non_empty(ENV_LOG_LEVEL) {
            builder = builder.log_level(level.parse()?);
        }

        if let Some(format) = non_empty(ENV_LOG_FORMAT) {
            builder = builder.log_format(format.parse()?);
        }

        if let Some(filter) = non_empty(ENV_LOG_FILTER) {
            builder = builder.log_filter(filter);
        }

        builder.build()
    }

    /// Whether the three Dropbox credentials are all present
    pub fn has_credentials(&self) -> bool {
        !self.app_key.is_empty() && !self.app_secret.is_empty() && !self.refresh_token.is_empty()
    }

    /// Logging settings derived from this configuration
    pub fn logging_config(&self) -> LoggingConfig {
        let config = LoggingConfig::default()
            .with_level(self.log_level)
            .with_format(self.log_format);

        match &self.log_filter {
            Some(filter) => config.with_filter(filter.clone()),
            None => config,
        }
    }
}

/// Normalize a Dropbox folder path.
///
/// `""`, `"/"` and `"."` all denote the root, which the Dropbox API spells as
/// the empty string. Other paths get a leading `/` when it is missing.
///
/// ```
/// use core_runtime::config::normalize_folder_path;
///
/// assert_eq!(normalize_folder_path("/"), "");
/// assert_eq!(normalize_folder_path("Scans/2024"), "/Scans/2024");
/// assert_eq!(normalize_folder_path("/Scans"), "/Scans");
/// ```
pub fn normalize_folder_path(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed {
        "" | "/" | "." => String::new(),
        path if path.starts_with('/') => path.to_string(),
        path => format!("/{}", path),
    }
}

/// Describe a secret without revealing it.
///
/// Returns `"missing"` for an empty value, otherwise the first ten characters
/// and the total length, enough to tell token kinds apart.
///
/// ```
/// use core_runtime::config::describe_secret;
///
/// assert_eq!(describe_secret(""), "missing");
/// assert_eq!(
///     describe_secret("sl.u.ABCDEFGHIJ"),
///     "set (prefix: sl.u.ABCDE..., len: 15)"
/// );
/// ```
pub fn describe_secret(value: &str) -> String {
    if value.is_empty() {
        return "missing".to_string();
    }
    let prefix: String = value.chars().take(SECRET_PREFIX_CHARS).collect();
    format!("set (prefix: {}..., len: {})", prefix, value.chars().count())
}

fn describe_presence(value: &str) -> &'static str {
    if value.is_empty() {
        "missing"
    } else {
        "[REDACTED]"
    }
}

/// Builder for constructing [`WebhookConfig`] instances.
#[derive(Default)]
pub struct WebhookConfigBuilder {
    app_key: Option<String>,
    app_secret: Option<String>,
    refresh_token: Option<String>,
    folder_path: Option<String>,
    bind_addr: Option<SocketAddr>,
    log_level: Option<LogLevel>,
    log_format: Option<LogFormat>,
    log_filter: Option<String>,
}

impl WebhookConfigBuilder {
    pub fn app_key(mut self, value: impl Into<String>) -> Self {
        self.app_key = Some(value.into());
        self
    }

    pub fn app_secret(mut self, value: impl Into<String>) -> Self {
        self.app_secret = Some(value.into());
        self
    }

    pub fn refresh_token(mut self, value: impl Into<String>) -> Self {
        self.refresh_token = Some(value.into());
        self
    }

    /// Sets the folder to list. Normalized on build.
    pub fn folder_path(mut self, value: impl Into<String>) -> Self {
        self.folder_path = Some(value.into());
        self
    }

    pub fn bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = Some(addr);
        self
    }

    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.log_level = Some(level);
        self
    }

    pub fn log_format(mut self, format: LogFormat) -> Self {
        self.log_format = Some(format);
        self
    }

    pub fn log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = Some(filter.into());
        self
    }

    /// Builds the final `WebhookConfig` instance.
    ///
    /// Every field is optional; credentials default to empty strings and the
    /// folder path to the root.
    pub fn build(self) -> Result<WebhookConfig> {
        let bind_addr = match self.bind_addr {
            Some(addr) => addr,
            None => DEFAULT_BIND_ADDR
                .parse()
                .map_err(|e| Error::Internal(format!("Invalid default bind address: {}", e)))?,
        };

        let trimmed = |value: Option<String>| value.unwrap_or_default().trim().to_string();

        Ok(WebhookConfig {
            app_key: trimmed(self.app_key),
            app_secret: trimmed(self.app_secret),
            refresh_token: trimmed(self.refresh_token),
            folder_path: normalize_folder_path(&self.folder_path.unwrap_or_default()),
            bind_addr,
            log_level: self.log_level.unwrap_or_default(),
            log_format: self.log_format.unwrap_or_default(),
            log_filter: self.log_filter,
        })
    }
}
