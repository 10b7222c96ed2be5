//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the webhook service:
//! - Logging and tracing infrastructure
//! - Configuration management
//!
//! ## Overview
//!
//! This crate contains the runtime utilities that other modules depend on.
//! It establishes the configuration shape injected into request handlers and
//! the logging conventions used throughout the workspace.

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
