//! # Host Bridge Traits
//!
//! Abstraction traits shared by the webhook service and its providers.
//!
//! ## Overview
//!
//! This crate defines the contract between the service core and the concrete
//! adapters it runs on. Each trait represents a capability that the core
//! requires but that is implemented elsewhere (reqwest in production, mocks
//! in tests).
//!
//! ## Traits
//!
//! - [`HttpClient`](http::HttpClient) - Async single-attempt HTTP operations
//! - [`StorageProvider`](storage::StorageProvider) - Remote folder listing
//!
//! ## Error Handling
//!
//! Transport adapters report [`BridgeError`](error::BridgeError). Storage
//! providers report the tagged [`StorageError`](storage::StorageError), whose
//! `error_type()` gives a stable category name for every failure.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` bounds to support safe concurrent usage
//! across async tasks. Implementations must ensure thread safety.

pub mod error;
pub mod http;
pub mod storage;

pub use error::BridgeError;

// Re-export commonly used types
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use storage::{
    EntryKind, FolderListing, RemoteEntry, StorageError, StorageProvider, StorageResult,
};
