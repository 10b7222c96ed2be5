//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for server and desktop hosts
//! (Linux, macOS, Windows).
//!
//! ## Overview
//!
//! This crate provides the production `HttpClient` using `reqwest`, with
//! connection pooling, rustls TLS and transport timeouts.
//!
//! ## Usage
//!
//! ```no_run
//! use bridge_desktop::ReqwestHttpClient;
//! use bridge_traits::HttpClient;
//! use std::sync::Arc;
//!
//! # fn main() -> bridge_traits::error::Result<()> {
//! let http_client: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new()?);
//! # let _ = http_client;
//! # Ok(())
//! # }
//! ```

mod http;

pub use http::ReqwestHttpClient;
