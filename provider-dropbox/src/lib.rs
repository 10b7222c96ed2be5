//! # Dropbox Provider
//!
//! Implements `StorageProvider` trait for the Dropbox API v2.
//!
//! ## Overview
//!
//! This module provides:
//! - Access token refresh from long-lived app credentials
//! - Folder listing via `files/list_folder` (first page only)
//! - Mapping of Dropbox failures onto the `StorageError` categories
//!
//! Requests are issued once; nothing is retried.

pub mod connector;
pub mod error;
pub mod types;

pub use connector::{DropboxConnector, DropboxEndpoints};
pub use error::{DropboxError, Result};
