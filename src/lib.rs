//! Workspace placeholder crate.
//!
//! This crate exists to expose a single `server` feature that pulls in the
//! webhook service (`core-service`) together with the Dropbox provider
//! (`provider-dropbox`). Deployments can depend on
//! `dropbox-webhooks-workspace` without wiring each crate individually.

#[cfg(feature = "server")]
pub use core_service;
#[cfg(feature = "server")]
pub use provider_dropbox;
