//! HTTP Client Abstraction
//!
//! Provides async HTTP operations used for the token endpoint and the Graph API.

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use crate::error::{BridgeError, Result};

/// HTTP method types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// HTTP request builder
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Option<Bytes>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn bearer_token(self, token: impl Into<String>) -> Self {
        self.header("Authorization", format!("Bearer {}", token.into()))
    }

    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self> {
        let json = serde_json::to_vec(body).map_err(|e| {
            BridgeError::OperationFailed(format!("JSON serialization failed: {}", e))
        })?;
        self.body = Some(Bytes::from(json));
        self.headers
            .insert("Content-Type".to_string(), "application/json".to_string());
        Ok(self)
    }

    /// Encode `pairs` as an `application/x-www-form-urlencoded` body
    pub fn form<T: Serialize>(mut self, pairs: &T) -> Result<Self> {
        let encoded = serde_urlencoded::to_string(pairs).map_err(|e| {
            BridgeError::OperationFailed(format!("Form encoding failed: {}", e))
        })?;
        self.body = Some(Bytes::from(encoded));
        self.headers.insert(
            "Content-Type".to_string(),
            "application/x-www-form-urlencoded".to_string(),
        );
        Ok(self)
    }
}

/// HTTP response
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Check if response status is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Async HTTP client trait
///
/// This trait abstracts HTTP operations so the gateway can run against
/// `reqwest` in production and a scripted client in tests.
///
/// Implementations must issue exactly one attempt per call. Timeouts belong to
/// the implementation's own configuration.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::http::{HttpClient, HttpRequest, HttpMethod};
///
/// async fn fetch_status(client: &dyn HttpClient) -> Result<u16> {
///     let request = HttpRequest::new(HttpMethod::Get, "https://api.example.com/data")
///         .bearer_token("token");
///
///     let response = client.execute(request).await?;
///     Ok(response.status)
/// }
/// ```
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Execute an HTTP request
    ///
    /// A non-2xx status is not an error at this layer; callers inspect
    /// [`HttpResponse::status`] themselves.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Network connection fails
    /// - TLS validation fails
    /// - Request times out
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_request_builder() {
        let request = HttpRequest::new(HttpMethod::Get, "https://example.com")
            .header("User-Agent", "test")
            .bearer_token("secret");

        assert_eq!(request.url, "https://example.com");
        assert_eq!(request.headers.get("User-Agent"), Some(&"test".to_string()));
        assert_eq!(
            request.headers.get("Authorization"),
            Some(&"Bearer secret".to_string())
        );
    }

    #[test]
    fn test_json_body_sets_content_type() {
        let request = HttpRequest::new(HttpMethod::Patch, "https://example.com")
            .json(&serde_json::json!({"values": [[1]]}))
            .unwrap();

        assert_eq!(
            request.headers.get("Content-Type"),
            Some(&"application/json".to_string())
        );
        assert_eq!(request.body.unwrap(), Bytes::from(r#"{"values":[[1]]}"#));
    }

    #[test]
    fn test_form_body_encoding() {
        let request = HttpRequest::new(HttpMethod::Post, "https://example.com/token")
            .form(&[("grant_type", "client_credentials"), ("scope", "a b")])
            .unwrap();

        assert_eq!(
            request.headers.get("Content-Type"),
            Some(&"application/x-www-form-urlencoded".to_string())
        );
        assert_eq!(
            request.body.unwrap(),
            Bytes::from("grant_type=client_credentials&scope=a+b")
        );
    }

    #[test]
    fn test_http_response_status_checks() {
        let response = HttpResponse::new(200, "test");

        assert!(response.is_success());
        assert!(!HttpResponse::new(404, "missing").is_success());
        assert!(!HttpResponse::new(199, "").is_success());
    }

    #[test]
    fn test_method_display() {
        assert_eq!(HttpMethod::Patch.to_string(), "PATCH");
        assert_eq!(HttpMethod::Delete.as_str(), "DELETE");
    }
}
