//! # Logging & Tracing Infrastructure
//!
//! Provides structured logging with `tracing` crate, supporting:
//! - JSON, compact and pretty-print output formats
//! - Module-level filtering (`RUST_LOG` overrides the built-in default)
//! - Redaction helpers for secrets and tokens
//! - Span close events for request timing
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::logging::{LoggingConfig, LogFormat, init_logging};
//! use bridge_traits::time::LogLevel;
//!
//! let config = LoggingConfig::default()
//!     .with_format(LogFormat::Json)
//!     .with_level(LogLevel::Debug);
//!
//! init_logging(config)?;
//! tracing::info!("Gateway started");
//! ```

use crate::error::{Error, Result};
use bridge_traits::time::LogLevel;
use std::io;
use std::str::FromStr;
use tracing_subscriber::{filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Crates whose events are shown at the configured level by default
const WORKSPACE_TARGETS: &[&str] = &[
    "graph_sheets_gateway",
    "core_runtime",
    "core_auth",
    "core_service",
    "provider_onedrive",
    "bridge_desktop",
];

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable pretty format with colors
    Pretty,
    /// Structured JSON format for machine parsing
    Json,
    /// Compact format for production
    Compact,
}

impl Default for LogFormat {
    fn default() -> Self {
        #[cfg(debug_assertions)]
        return Self::Pretty;

        #[cfg(not(debug_assertions))]
        return Self::Json;
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            other => Err(format!(
                "unknown log format '{}' (expected pretty, json or compact)",
                other
            )),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Output format
    pub format: LogFormat,
    /// Level applied to the workspace crates when `RUST_LOG` is unset
    pub level: LogLevel,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            level: LogLevel::Info,
        }
    }
}

impl LoggingConfig {
    /// Set log format
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set minimum log level
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }
}

/// Initialize the logging system
///
/// This should be called once during application startup. Subsequent calls
/// will return an error.
///
/// # Errors
///
/// Returns an error if:
/// - Logging is already initialized
/// - The filter string is invalid
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(&config, rust_log.as_deref())?;

    let registry = tracing_subscriber::registry().with(filter);
    let span_events = tracing_subscriber::fmt::format::FmtSpan::CLOSE;

    let result = match config.format {
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_target(true)
                    .with_span_events(span_events)
                    .with_writer(io::stdout),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_target(true)
                    .with_writer(io::stdout),
            )
            .try_init(),
        LogFormat::Compact => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_target(true)
                    .with_span_events(span_events)
                    .with_writer(io::stdout),
            )
            .try_init(),
    };

    result.map_err(|e| Error::Config(format!("Failed to initialize logging: {}", e)))
}

/// `rust_log` (the `RUST_LOG` value) wins over the level-based default.
fn build_filter(config: &LoggingConfig, rust_log: Option<&str>) -> Result<EnvFilter> {
    let filter_string = match rust_log {
        Some(from_env) if !from_env.trim().is_empty() => from_env.to_string(),
        _ => default_filter(config.level),
    };

    EnvFilter::try_new(&filter_string)
        .map_err(|e| Error::Config(format!("Invalid log filter '{}': {}", filter_string, e)))
}

/// Our crates at `level`, noisy dependencies at warn.
fn default_filter(level: LogLevel) -> String {
    let level = level.as_str();
    let mut directives: Vec<String> = WORKSPACE_TARGETS
        .iter()
        .map(|target| format!("{}={}", target, level))
        .collect();
    directives.extend(
        ["h2=warn", "hyper=warn", "reqwest=warn", "rustls=warn"]
            .iter()
            .map(|d| d.to_string()),
    );
    directives.join(",")
}

/// Helper function to redact sensitive field values
///
/// This should be used when logging values that might carry credentials:
///
/// ```
/// use core_runtime::logging::redact_if_sensitive;
///
/// assert_eq!(redact_if_sensitive("client_secret", "abc"), "[REDACTED]");
/// assert_eq!(redact_if_sensitive("range", "A2:A3"), "A2:A3");
/// ```
pub fn redact_if_sensitive(field_name: &str, value: &str) -> String {
    const SENSITIVE_FIELDS: &[&str] = &[
        "token",
        "secret",
        "password",
        "api_key",
        "authorization",
        "bearer",
        "assertion",
    ];

    let field_lower = field_name.to_lowercase();
    if SENSITIVE_FIELDS.iter().any(|&f| field_lower.contains(f)) {
        "[REDACTED]".to_string()
    } else if value.contains('@') && value.contains('.') {
        // Likely an email - redact domain but keep first char
        match value.find('@') {
            Some(at_pos) => format!("{}***@[REDACTED]", &value[..1.min(at_pos)]),
            None => value.to_string(),
        }
    } else {
        value.to_string()
    }
}
