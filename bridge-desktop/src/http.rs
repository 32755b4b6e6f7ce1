//! HTTP Client Implementation using Reqwest

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    http::{HttpClient, HttpMethod, HttpRequest, HttpResponse},
};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// Reqwest-based HTTP client implementation
///
/// Provides HTTP operations with:
/// - Connection pooling via reqwest
/// - TLS support by default
/// - A client-wide timeout
///
/// Every call is a single attempt. Failures surface to the caller unchanged.
#[derive(Clone)]
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    /// Create a new HTTP client with custom timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(10)
            .user_agent(concat!("graph-sheets-gateway/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BridgeError::NotAvailable(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Convert bridge HttpMethod to reqwest Method
    fn convert_method(method: HttpMethod) -> reqwest::Method {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
            HttpMethod::Head => reqwest::Method::HEAD,
        }
    }

    /// Build reqwest request from bridge request
    fn build_request(&self, request: HttpRequest) -> reqwest::RequestBuilder {
        let method = Self::convert_method(request.method);
        let mut req = self.client.request(method, &request.url);

        for (key, value) in request.headers {
            req = req.header(key, value);
        }

        if let Some(body) = request.body {
            req = req.body(body);
        }

        req
    }

    fn convert_error(error: reqwest::Error) -> BridgeError {
        if error.is_timeout() {
            BridgeError::Timeout(error.to_string())
        } else if error.is_connect() {
            BridgeError::Connection(error.to_string())
        } else {
            BridgeError::OperationFailed(error.to_string())
        }
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        debug!(method = %request.method, url = %request.url, "Executing HTTP request");

        let response = self
            .build_request(request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "HTTP request failed");
                Self::convert_error(e)
            })?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(Self::convert_error)?;

        debug!(status, bytes = body.len(), "HTTP response received");

        Ok(HttpResponse { status, body })
    }
}
