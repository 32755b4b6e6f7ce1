//! # Host Bridge Traits
//!
//! Transport and time abstractions shared by the gateway crates.
//!
//! ## Overview
//!
//! The credential provider and the Graph connectors never talk to `reqwest`
//! directly. They depend on the traits in this crate so the outbound transport
//! and the time source can be swapped for scripted fakes in tests.
//!
//! ## Traits
//!
//! - [`HttpClient`](http::HttpClient) - Async HTTP operations, one attempt per call
//! - [`Clock`](time::Clock) - Time source used for token expiry checks
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type. Concrete
//! implementations should convert their native errors into it and keep the
//! message actionable (URL, timeout, connection state).
//!
//! ## Thread Safety
//!
//! Every trait requires `Send + Sync` so a single instance can be shared across
//! request handlers behind an `Arc`.
//!
//! ## Examples
//!
//! ### Implementing HttpClient
//!
//! ```ignore
//! use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
//! use bridge_traits::error::Result;
//! use async_trait::async_trait;
//!
//! pub struct MyHttpClient {
//!     client: reqwest::Client,
//! }
//!
//! #[async_trait]
//! impl HttpClient for MyHttpClient {
//!     async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
//!         // Implementation
//!         todo!()
//!     }
//! }
//! ```

pub mod error;
pub mod http;
pub mod time;

pub use error::BridgeError;

pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use time::{Clock, LogLevel, SystemClock};
