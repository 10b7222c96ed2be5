//! Remote Storage Abstractions
//!
//! Provides the provider-agnostic folder listing contract implemented by
//! cloud storage connectors, together with the tagged failure taxonomy that
//! callers surface to their own clients.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kind of a remote entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Folder,
    /// Tombstone reported for an entry that was removed
    Deleted,
}

/// A file or folder reported by a storage provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEntry {
    /// Entry name (last path component)
    pub name: String,
    pub kind: EntryKind,
    /// Provider identifier (absent for deleted entries)
    pub id: Option<String>,
    /// Lower-cased full path, as reported by the provider
    pub path_lower: Option<String>,
    /// Full path with original casing
    pub path_display: Option<String>,
}

impl RemoteEntry {
    pub fn new(name: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            kind,
            id: None,
            path_lower: None,
            path_display: None,
        }
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    pub fn is_folder(&self) -> bool {
        self.kind == EntryKind::Folder
    }
}

/// One page of a folder listing, entries in provider order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderListing {
    pub entries: Vec<RemoteEntry>,
    /// Opaque provider cursor for the listing
    pub cursor: Option<String>,
    /// Whether the provider holds more entries beyond this page
    pub has_more: bool,
}

impl FolderListing {
    pub fn new(entries: Vec<RemoteEntry>) -> Self {
        Self {
            entries,
            cursor: None,
            has_more: false,
        }
    }

    /// Entry names, preserving provider order
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.name.clone()).collect()
    }
}

/// Failure of a remote storage operation
///
/// Every variant maps to a stable category name via [`StorageError::error_type`],
/// which is what callers expose to their own clients.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Credentials are missing or unusable before any request is made
    #[error("Storage client not configured: {0}")]
    Configuration(String),

    /// The provider rejected the credentials or the access token
    #[error("{0}")]
    Auth(String),

    /// The provider rejected the request arguments
    #[error("Bad input: {0}")]
    BadInput(String),

    /// Endpoint-specific failure reported by the provider (e.g. path not found)
    #[error("{summary}")]
    Api { status: u16, summary: String },

    #[error("Rate limit exceeded, retry after {retry_after_seconds} seconds")]
    RateLimit { retry_after_seconds: u64 },

    #[error("Provider internal error (status {status}): {message}")]
    InternalServer { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to parse provider response: {0}")]
    Parse(String),
}

impl StorageError {
    /// Stable category name of this failure
    pub fn error_type(&self) -> &'static str {
        match self {
            StorageError::Configuration(_) => "ConfigurationError",
            StorageError::Auth(_) => "AuthError",
            StorageError::BadInput(_) => "BadInputError",
            StorageError::Api { .. } => "ApiError",
            StorageError::RateLimit { .. } => "RateLimitError",
            StorageError::InternalServer { .. } => "InternalServerError",
            StorageError::Network(_) => "NetworkError",
            StorageError::Parse(_) => "ParseError",
        }
    }

    /// Whether the provider reported that the requested path does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::Api { summary, .. } if summary.to_lowercase().contains("not_found"))
    }
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Cloud storage provider trait
///
/// Implemented by each provider connector (e.g. Dropbox). Connectors own
/// their credentials and obtain access tokens on their own.
///
/// # Example
///
/// ```no_run
/// use bridge_traits::storage::{StorageProvider, StorageResult};
///
/// async fn print_root(provider: &dyn StorageProvider) -> StorageResult<()> {
///     let listing = provider.list_folder("").await?;
///     for name in listing.names() {
///         println!("{}", name);
///     }
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait StorageProvider: Send + Sync {
    /// List the entries directly under `path`
    ///
    /// The path format is provider-specific; for Dropbox the empty string
    /// denotes the root folder. Only the first page is returned.
    async fn list_folder(&self, path: &str) -> StorageResult<FolderListing>;

    /// List every entry below `path`, descending into subfolders
    ///
    /// Entries keep the provider's order; `path_lower` locates each one in
    /// the tree. Only the first page is returned.
    async fn list_folder_recursive(&self, path: &str) -> StorageResult<FolderListing>;

    /// Whether the connector holds every credential it needs
    fn is_configured(&self) -> bool {
        true
    }
}
