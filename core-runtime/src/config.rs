//! # Gateway Configuration Module
//!
//! Provides configuration management for the Graph Sheets Gateway.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a
//! [`GatewayConfig`] instance holding the credential, Graph and server
//! settings. The process environment is read exactly once at startup through
//! [`GatewayConfig::from_env`]; the resulting value is shared read-only by all
//! request handlers.
//!
//! ## Required Settings
//!
//! Credential settings (`GRAPH_CLIENT_ID`, `GRAPH_CLIENT_SECRET`, authority)
//! and the drive root are *not* checked when the configuration is built. A
//! missing value fails the first request that needs it, so the server can still
//! start and answer health checks.
//!
//! Settings that cannot be parsed (bind address, timeout, log format, log level) fail the
//! build immediately.
//!
//! ## Usage
//!
//! ### From the environment
//!
//! ```ignore
//! use core_runtime::config::GatewayConfig;
//!
//! let config = GatewayConfig::from_env()?;
//! ```
//!
//! ### Explicit builder
//!
//! ```
//! use core_runtime::config::GatewayConfig;
//!
//! let config = GatewayConfig::builder()
//!     .client_id("app-id")
//!     .client_secret("app-secret")
//!     .tenant_id("contoso.onmicrosoft.com")
//!     .drive_root("users/ops@contoso.com/drive")
//!     .build()
//!     .expect("valid configuration");
//!
//! assert_eq!(
//!     config.graph.drive_root().unwrap(),
//!     "https://graph.microsoft.com/v1.0/users/ops@contoso.com/drive"
//! );
//! ```

use crate::error::{Error, Result};
use crate::logging::LogFormat;
use bridge_traits::time::LogLevel;
use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

/// Default downstream API root, also used to derive the default scope
pub const DEFAULT_API_ROOT: &str = "https://graph.microsoft.com";

/// Identity provider host used when only a tenant id is configured
pub const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";

/// Worksheet addressed when a request does not name one
pub const DEFAULT_SHEET: &str = "Sheet1";

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:7071";

pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable names read by [`GatewayConfig::from_env`].
pub mod env_keys {
    pub const CLIENT_ID: &str = "GRAPH_CLIENT_ID";
    pub const CLIENT_SECRET: &str = "GRAPH_CLIENT_SECRET";
    pub const AUTHORITY: &str = "GRAPH_AUTHORITY";
    pub const TENANT_ID: &str = "GRAPH_TENANT_ID";
    pub const API_ROOT: &str = "GRAPH_API_ROOT";
    pub const SCOPES: &str = "GRAPH_SCOPES";
    pub const DRIVE_ROOT: &str = "GRAPH_DRIVE_ROOT";
    pub const WORKBOOK_ID: &str = "GRAPH_WORKBOOK_ID";
    pub const DEFAULT_SHEET: &str = "GRAPH_DEFAULT_SHEET";
    pub const BIND_ADDR: &str = "GATEWAY_BIND_ADDR";
    pub const HTTP_TIMEOUT_SECS: &str = "GATEWAY_HTTP_TIMEOUT_SECS";
    pub const LOG_FORMAT: &str = "GATEWAY_LOG_FORMAT";
    pub const LOG_LEVEL: &str = "GATEWAY_LOG_LEVEL";
}

/// Client-credential settings as found in the environment.
///
/// Fields stay optional here; the credential provider resolves them into a
/// complete client configuration on first use.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CredentialSettings {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub authority_url: Option<String>,
    pub scopes: Vec<String>,
}

impl CredentialSettings {
    /// Whether every field required for a token request is present
    pub fn is_complete(&self) -> bool {
        self.client_id.is_some()
            && self.client_secret.is_some()
            && self.authority_url.is_some()
            && !self.scopes.is_empty()
    }
}

impl fmt::Debug for CredentialSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialSettings")
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .field("authority_url", &self.authority_url)
            .field("scopes", &self.scopes)
            .finish()
    }
}

/// Downstream Graph addressing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphSettings {
    /// API root without version segment, e.g. `https://graph.microsoft.com`
    pub api_root: String,
    /// Absolute URL of the drive resource, e.g. `.../v1.0/users/{id}/drive`
    pub drive_root: Option<String>,
    /// File used by update-range when the request carries no file id
    pub default_workbook: Option<String>,
    pub default_sheet: String,
}

impl GraphSettings {
    /// The configured drive root.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingSetting`] when `GRAPH_DRIVE_ROOT` was not set.
    pub fn drive_root(&self) -> Result<&str> {
        self.drive_root
            .as_deref()
            .ok_or(Error::MissingSetting(env_keys::DRIVE_ROOT))
    }
}

/// Inbound server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub bind_addr: SocketAddr,
    /// Timeout applied by the outbound HTTP client
    pub http_timeout: Duration,
    /// Explicit log format; `None` keeps the build-dependent default
    pub log_format: Option<LogFormat>,
    /// Level for the workspace crates when `RUST_LOG` is unset
    pub log_level: Option<LogLevel>,
}

/// Process-wide gateway configuration.
///
/// Use [`GatewayConfig::builder`] or [`GatewayConfig::from_env`] to construct
/// instances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub credentials: CredentialSettings,
    pub graph: GraphSettings,
    pub server: ServerSettings,
}

impl GatewayConfig {
    /// Creates a new builder for constructing a `GatewayConfig`.
    pub fn builder() -> GatewayConfigBuilder {
        GatewayConfigBuilder::default()
    }

    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary key lookup.
    ///
    /// Empty or whitespace-only values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut builder = Self::builder();

        if let Some(value) = get(env_keys::CLIENT_ID) {
            builder = builder.client_id(value);
        }
        if let Some(value) = get(env_keys::CLIENT_SECRET) {
            builder = builder.client_secret(value);
        }
        if let Some(value) = get(env_keys::AUTHORITY) {
            builder = builder.authority(value);
        }
        if let Some(value) = get(env_keys::TENANT_ID) {
            builder = builder.tenant_id(value);
        }
        if let Some(value) = get(env_keys::API_ROOT) {
            builder = builder.api_root(value);
        }
        if let Some(value) = get(env_keys::SCOPES) {
            builder = builder.scopes(parse_scopes(&value));
        }
        if let Some(value) = get(env_keys::DRIVE_ROOT) {
            builder = builder.drive_root(value);
        }
        if let Some(value) = get(env_keys::WORKBOOK_ID) {
            builder = builder.default_workbook(value);
        }
        if let Some(value) = get(env_keys::DEFAULT_SHEET) {
            builder = builder.default_sheet(value);
        }
        if let Some(value) = get(env_keys::BIND_ADDR) {
            builder = builder.bind_addr(value);
        }
        if let Some(value) = get(env_keys::HTTP_TIMEOUT_SECS) {
            let secs: u64 = value.parse().map_err(|_| {
                Error::Config(format!(
                    "{} must be a whole number of seconds, got '{}'",
                    env_keys::HTTP_TIMEOUT_SECS,
                    value
                ))
            })?;
            builder = builder.http_timeout(Duration::from_secs(secs));
        }
        if let Some(value) = get(env_keys::LOG_FORMAT) {
            let format = value.parse::<LogFormat>().map_err(|e| {
                Error::Config(format!("{}: {}", env_keys::LOG_FORMAT, e))
            })?;
            builder = builder.log_format(format);
        }
        if let Some(value) = get(env_keys::LOG_LEVEL) {
            let level = value.parse::<LogLevel>().map_err(|e| {
                Error::Config(format!("{}: {}", env_keys::LOG_LEVEL, e))
            })?;
            builder = builder.log_level(level);
        }

        builder.build()
    }
}

/// Split a scope list on commas and whitespace, dropping empty entries.
pub fn parse_scopes(raw: &str) -> Vec<String> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|scope| !scope.is_empty())
        .map(str::to_string)
        .collect()
}

/// Builder for [`GatewayConfig`].
#[derive(Debug, Default)]
pub struct GatewayConfigBuilder {
    client_id: Option<String>,
    client_secret: Option<String>,
    authority: Option<String>,
    tenant_id: Option<String>,
    api_root: Option<String>,
    scopes: Option<Vec<String>>,
    drive_root: Option<String>,
    default_workbook: Option<String>,
    default_sheet: Option<String>,
    bind_addr: Option<String>,
    http_timeout: Option<Duration>,
    log_format: Option<LogFormat>,
    log_level: Option<LogLevel>,
}

impl GatewayConfigBuilder {
    pub fn client_id(mut self, value: impl Into<String>) -> Self {
        self.client_id = Some(value.into());
        self
    }

    pub fn client_secret(mut self, value: impl Into<String>) -> Self {
        self.client_secret = Some(value.into());
        self
    }

    /// Full authority URL. Takes precedence over [`tenant_id`](Self::tenant_id).
    pub fn authority(mut self, value: impl Into<String>) -> Self {
        self.authority = Some(value.into());
        self
    }

    pub fn tenant_id(mut self, value: impl Into<String>) -> Self {
        self.tenant_id = Some(value.into());
        self
    }

    pub fn api_root(mut self, value: impl Into<String>) -> Self {
        self.api_root = Some(value.into());
        self
    }

    pub fn scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = Some(scopes.into_iter().map(Into::into).collect());
        self
    }

    /// Absolute drive URL, or a path relative to `{api_root}/v1.0`.
    pub fn drive_root(mut self, value: impl Into<String>) -> Self {
        self.drive_root = Some(value.into());
        self
    }

    pub fn default_workbook(mut self, value: impl Into<String>) -> Self {
        self.default_workbook = Some(value.into());
        self
    }

    pub fn default_sheet(mut self, value: impl Into<String>) -> Self {
        self.default_sheet = Some(value.into());
        self
    }

    pub fn bind_addr(mut self, value: impl Into<String>) -> Self {
        self.bind_addr = Some(value.into());
        self
    }

    pub fn http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = Some(timeout);
        self
    }

    pub fn log_format(mut self, format: LogFormat) -> Self {
        self.log_format = Some(format);
        self
    }

    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.log_level = Some(level);
        self
    }

    /// Build the configuration.
    ///
    /// # Errors
    ///
    /// Fails when the bind address cannot be parsed or the timeout is zero.
    /// Missing credentials or drive root are deferred to first use.
    pub fn build(self) -> Result<GatewayConfig> {
        let api_root = self
            .api_root
            .unwrap_or_else(|| DEFAULT_API_ROOT.to_string())
            .trim_end_matches('/')
            .to_string();

        let authority_url = self
            .authority
            .map(|authority| authority.trim_end_matches('/').to_string())
            .or_else(|| {
                self.tenant_id
                    .map(|tenant| format!("{}/{}", DEFAULT_AUTHORITY_HOST, tenant))
            });

        let scopes = match self.scopes {
            Some(scopes) if !scopes.is_empty() => scopes,
            _ => vec![format!("{}/.default", api_root)],
        };

        let drive_root = self
            .drive_root
            .map(|root| normalize_drive_root(&api_root, &root));

        let bind_raw = self
            .bind_addr
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_raw.parse().map_err(|e| {
            Error::Config(format!("Invalid bind address '{}': {}", bind_raw, e))
        })?;

        let http_timeout = self.http_timeout.unwrap_or(DEFAULT_HTTP_TIMEOUT);
        if http_timeout.is_zero() {
            return Err(Error::Config(
                "HTTP timeout must be greater than zero".to_string(),
            ));
        }

        Ok(GatewayConfig {
            credentials: CredentialSettings {
                client_id: self.client_id,
                client_secret: self.client_secret,
                authority_url,
                scopes,
            },
            graph: GraphSettings {
                api_root,
                drive_root,
                default_workbook: self.default_workbook,
                default_sheet: self
                    .default_sheet
                    .unwrap_or_else(|| DEFAULT_SHEET.to_string()),
            },
            server: ServerSettings {
                bind_addr,
                http_timeout,
                log_format: self.log_format,
                log_level: self.log_level,
            },
        })
    }
}

fn normalize_drive_root(api_root: &str, root: &str) -> String {
    let root = root.trim().trim_end_matches('/');
    if root.starts_with("http://") || root.starts_with("https://") {
        root.to_string()
    } else {
        format!("{}/v1.0/{}", api_root, root.trim_start_matches('/'))
    }
}
