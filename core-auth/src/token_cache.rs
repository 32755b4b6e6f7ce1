//! Process-local token cache
//!
//! Holds at most one token per [`CacheKey`]. Entries are replaced wholesale
//! when a new token is issued and are never invalidated from outside; an
//! expired entry is simply ignored by [`TokenCache::lookup`].
//!
//! No lock is held while a token request is in flight. Two requests that miss
//! at the same time both fetch a token and the later write wins, which is
//! harmless under the client-credential grant.

use crate::types::{AccessToken, CacheKey};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Default)]
pub struct TokenCache {
    entries: RwLock<HashMap<CacheKey, AccessToken>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached token for `key` if it is still valid at `now + buffer`.
    pub async fn lookup(
        &self,
        key: &CacheKey,
        now: DateTime<Utc>,
        buffer: Duration,
    ) -> Option<AccessToken> {
        let entries = self.entries.read().await;
        match entries.get(key) {
            Some(token) if !token.is_expired_at(now, buffer) => Some(token.clone()),
            Some(_) => {
                debug!(client_id = %key.client_id, "Cached token expired");
                None
            }
            None => None,
        }
    }

    /// Store `token` under `key`, replacing any previous entry.
    pub async fn store(&self, key: CacheKey, token: AccessToken) {
        self.entries.write().await.insert(key, token);
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
