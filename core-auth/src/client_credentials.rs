//! OAuth 2.0 Client-Credential Provider
//!
//! Acquires application tokens for the downstream API.
//!
//! # Overview
//!
//! [`ClientCredentialProvider::acquire`] first tries a silent lookup in the
//! provider's [`TokenCache`]. On a miss (or an expired entry) it performs a
//! full client-credential request:
//!
//! ```text
//! POST {authority}/oauth2/v2.0/token
//! Content-Type: application/x-www-form-urlencoded
//!
//! client_id=...&client_secret=...&scope=...&grant_type=client_credentials
//! ```
//!
//! The response body decides the outcome, not the HTTP status: a body carrying
//! `access_token` is a success, anything else is reported as
//! [`AuthError::TokenRejected`] with the raw payload.
//!
//! # Security
//!
//! - The client secret and issued tokens are never logged
//! - `Debug` output of [`AccessToken`] and [`ClientConfig`] is redacted
//!
//! # Example
//!
//! ```no_run
//! use core_auth::{ClientCredentialProvider, TokenProvider};
//! use core_runtime::config::GatewayConfig;
//! use std::sync::Arc;
//!
//! # async fn example() -> core_auth::Result<()> {
//! # use bridge_traits::http::HttpClient;
//! # let http_client: Arc<dyn HttpClient> = todo!();
//! let config = GatewayConfig::from_env().expect("configuration");
//! let provider = ClientCredentialProvider::new(config.credentials, http_client);
//!
//! let token = provider.acquire().await?;
//! # Ok(())
//! # }
//! ```

use crate::error::{AuthError, Result};
use crate::token_cache::TokenCache;
use crate::types::{AccessToken, ClientConfig};
use async_trait::async_trait;
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest};
use bridge_traits::time::{Clock, SystemClock};
use chrono::Duration;
use core_runtime::config::CredentialSettings;
use core_runtime::logging::redact_if_sensitive;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Lifetime assumed when the token response omits `expires_in`
const DEFAULT_EXPIRES_IN_SECS: i64 = 3600;

/// Tokens this close to expiry are treated as expired (5 minutes)
const TOKEN_REFRESH_BUFFER_SECS: i64 = 300;

/// Source of bearer tokens for downstream calls.
///
/// The returned token is valid at hand-off time.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn acquire(&self) -> Result<AccessToken>;
}

/// Client-credential token provider with a process-local cache.
pub struct ClientCredentialProvider {
    settings: CredentialSettings,
    http_client: Arc<dyn HttpClient>,
    clock: Arc<dyn Clock>,
    cache: TokenCache,
    refresh_buffer: Duration,
}

impl ClientCredentialProvider {
    /// Create a provider using the system clock.
    ///
    /// Settings are not validated here; missing values fail the first
    /// [`acquire`](TokenProvider::acquire).
    pub fn new(settings: CredentialSettings, http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            settings,
            http_client,
            clock: Arc::new(SystemClock),
            cache: TokenCache::new(),
            refresh_buffer: Duration::seconds(TOKEN_REFRESH_BUFFER_SECS),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_refresh_buffer(mut self, buffer: Duration) -> Self {
        self.refresh_buffer = buffer;
        self
    }

    pub fn cache(&self) -> &TokenCache {
        &self.cache
    }

    /// Perform the client-credential round-trip.
    #[instrument(skip(self, config), fields(client_id = %config.client_id))]
    async fn request_token(&self, config: &ClientConfig) -> Result<AccessToken> {
        let scope = config.scope_param();
        let form = [
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.as_str()),
            ("scope", scope.as_str()),
            ("grant_type", "client_credentials"),
        ];

        let request = HttpRequest::new(HttpMethod::Post, config.token_endpoint())
            .header("Accept", "application/json")
            .form(&form)
            .map_err(|e| AuthError::InvalidRequest(e.to_string()))?;

        let issued_at = self.clock.now();
        let response = self.http_client.execute(request).await.map_err(|e| {
            warn!(error = %e, "Token endpoint unreachable");
            AuthError::Unreachable(e.to_string())
        })?;

        let raw = String::from_utf8_lossy(&response.body).into_owned();

        match serde_json::from_str::<TokenResponse>(&raw) {
            Ok(token) if !token.access_token.is_empty() => {
                let expires_in = token
                    .expires_in
                    .map(ExpiresIn::seconds)
                    .unwrap_or(DEFAULT_EXPIRES_IN_SECS);

                debug!(
                    access_token = %redact_if_sensitive("access_token", &token.access_token),
                    token_type = token.token_type.as_deref().unwrap_or("Bearer"),
                    "Token response accepted"
                );

                match AccessToken::from_expires_in(token.access_token, issued_at, expires_in) {
                    Some(access_token) => {
                        info!(expires_in, "Acquired client-credential token");
                        Ok(access_token)
                    }
                    None => {
                        warn!(expires_in, "Token endpoint returned an unusable lifetime");
                        Err(AuthError::TokenRejected(raw))
                    }
                }
            }
            _ => {
                warn!(
                    status = response.status,
                    "Token endpoint returned no access token"
                );
                Err(AuthError::TokenRejected(raw))
            }
        }
    }
}

#[async_trait]
impl TokenProvider for ClientCredentialProvider {
    #[instrument(skip(self))]
    async fn acquire(&self) -> Result<AccessToken> {
        let config = ClientConfig::try_from(&self.settings)?;
        let key = config.cache_key();

        if let Some(token) = self
            .cache
            .lookup(&key, self.clock.now(), self.refresh_buffer)
            .await
        {
            debug!("Using cached token");
            return Ok(token);
        }

        info!("No suitable token in cache, requesting a new one");
        let token = self.request_token(&config).await?;
        self.cache.store(key, token.clone()).await;

        Ok(token)
    }
}

/// Successful body of the token endpoint.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<ExpiresIn>,
    #[serde(default)]
    token_type: Option<String>,
}

/// Some identity providers encode `expires_in` as a string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ExpiresIn {
    Seconds(i64),
    Text(String),
}

impl ExpiresIn {
    fn seconds(self) -> i64 {
        match self {
            ExpiresIn::Seconds(secs) => secs,
            ExpiresIn::Text(text) => text.trim().parse().unwrap_or(DEFAULT_EXPIRES_IN_SECS),
        }
    }
}
