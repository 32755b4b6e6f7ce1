//! # Authentication Module
//!
//! Client-credential token acquisition for the downstream Graph API.
//!
//! ## Overview
//!
//! The gateway authenticates as an application, never as a user. Every token
//! comes from the OAuth 2.0 client-credential grant: there is no account
//! binding and no refresh token, so a fresh round-trip simply issues a new
//! application token.
//!
//! ## Features
//!
//! - Silent lookup in a process-local cache keyed by client id and scope set
//! - Full token request against `{authority}/oauth2/v2.0/token` on a miss
//! - Expiry checks through an injectable [`Clock`](bridge_traits::time::Clock)
//! - Identity-provider error payloads surfaced verbatim

pub mod client_credentials;
pub mod error;
pub mod token_cache;
pub mod types;

pub use client_credentials::{ClientCredentialProvider, TokenProvider};
pub use error::{AuthError, Result};
pub use token_cache::TokenCache;
pub use types::{AccessToken, CacheKey, ClientConfig};
