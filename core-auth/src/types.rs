use crate::error::{AuthError, Result};
use chrono::{DateTime, Duration, Utc};
use core_runtime::config::{env_keys, CredentialSettings};
use std::collections::BTreeSet;
use std::fmt;

/// Bearer credential for the downstream API.
///
/// Tokens are replaced, never mutated. The `Debug` implementation redacts the
/// token value.
///
/// # Examples
///
/// ```
/// use core_auth::AccessToken;
/// use chrono::{Duration, Utc};
///
/// let now = Utc::now();
/// let token = AccessToken::new("eyJ0eXAi...", now + Duration::hours(1));
///
/// assert!(!token.is_expired_at(now, Duration::minutes(5)));
/// assert!(token.is_expired_at(now + Duration::minutes(56), Duration::minutes(5)));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    /// The bearer value sent in the `Authorization` header
    pub access_token: String,
    /// When the token stops being accepted (UTC)
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    pub fn new(access_token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            access_token: access_token.into(),
            expires_at,
        }
    }

    /// Build a token from an `expires_in` relative to `issued_at`.
    ///
    /// Returns `None` when `expires_in` is not positive or the expiry does not
    /// fit in a timestamp.
    pub fn from_expires_in(
        access_token: impl Into<String>,
        issued_at: DateTime<Utc>,
        expires_in: i64,
    ) -> Option<Self> {
        if expires_in <= 0 {
            return None;
        }
        let expires_at = Duration::try_seconds(expires_in)
            .and_then(|lifetime| issued_at.checked_add_signed(lifetime))?;
        Some(Self::new(access_token, expires_at))
    }

    /// The raw bearer value.
    pub fn secret(&self) -> &str {
        &self.access_token
    }

    /// Whether the token is expired at `now`, or will be within `buffer`.
    pub fn is_expired_at(&self, now: DateTime<Utc>, buffer: Duration) -> bool {
        now + buffer >= self.expires_at
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Fully resolved client-credential configuration.
///
/// Built from [`CredentialSettings`] on first use; every field is required.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub client_id: String,
    pub authority_url: String,
    pub client_secret: String,
    pub scopes: BTreeSet<String>,
}

impl ClientConfig {
    /// OAuth 2.0 v2 token endpoint under the configured authority
    pub fn token_endpoint(&self) -> String {
        format!(
            "{}/oauth2/v2.0/token",
            self.authority_url.trim_end_matches('/')
        )
    }

    /// Scopes joined for the `scope` form field
    pub fn scope_param(&self) -> String {
        self.scopes.iter().cloned().collect::<Vec<_>>().join(" ")
    }

    pub fn cache_key(&self) -> CacheKey {
        CacheKey {
            client_id: self.client_id.clone(),
            scopes: self.scopes.clone(),
        }
    }
}

impl TryFrom<&CredentialSettings> for ClientConfig {
    type Error = AuthError;

    fn try_from(settings: &CredentialSettings) -> Result<Self> {
        let client_id = settings
            .client_id
            .clone()
            .ok_or(AuthError::MissingConfiguration(env_keys::CLIENT_ID))?;
        let client_secret = settings
            .client_secret
            .clone()
            .ok_or(AuthError::MissingConfiguration(env_keys::CLIENT_SECRET))?;
        let authority_url = settings
            .authority_url
            .clone()
            .ok_or(AuthError::MissingConfiguration(env_keys::AUTHORITY))?;

        let scopes: BTreeSet<String> = settings.scopes.iter().cloned().collect();
        if scopes.is_empty() {
            return Err(AuthError::MissingConfiguration(env_keys::SCOPES));
        }

        Ok(Self {
            client_id,
            authority_url,
            client_secret,
            scopes,
        })
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("client_id", &self.client_id)
            .field("authority_url", &self.authority_url)
            .field("client_secret", &"[REDACTED]")
            .field("scopes", &self.scopes)
            .finish()
    }
}

/// Cache identity of a client-only token: no account is involved.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub client_id: String,
    pub scopes: BTreeSet<String>,
}
