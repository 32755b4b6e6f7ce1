//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the gateway:
//! - Logging and tracing infrastructure
//! - Configuration management
//!
//! ## Overview
//!
//! Every other crate reads its settings from [`config::GatewayConfig`] and logs
//! through the subscriber installed by [`logging::init_logging`].

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
