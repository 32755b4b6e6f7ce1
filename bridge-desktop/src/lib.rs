//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for server and desktop hosts.
//!
//! ## Overview
//!
//! - `HttpClient` using `reqwest`, one attempt per request
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::ReqwestHttpClient;
//! use std::time::Duration;
//!
//! let http_client = ReqwestHttpClient::with_timeout(Duration::from_secs(30))?;
//! ```

mod http;

pub use http::ReqwestHttpClient;
