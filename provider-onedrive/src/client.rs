//! Authenticated Graph request dispatch

use crate::error::{GraphError, Result};
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Methods the gateway is allowed to send to Graph.
///
/// Anything else is rejected while parsing, before a request is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiMethod {
    Get,
    Post,
    Put,
    Patch,
}

impl ApiMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiMethod::Get => "GET",
            ApiMethod::Post => "POST",
            ApiMethod::Put => "PUT",
            ApiMethod::Patch => "PATCH",
        }
    }
}

impl fmt::Display for ApiMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiMethod {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(ApiMethod::Get),
            "POST" => Ok(ApiMethod::Post),
            "PUT" => Ok(ApiMethod::Put),
            "PATCH" => Ok(ApiMethod::Patch),
            _ => Err(GraphError::UnsupportedMethod(s.trim().to_string())),
        }
    }
}

impl TryFrom<HttpMethod> for ApiMethod {
    type Error = GraphError;

    fn try_from(method: HttpMethod) -> Result<Self> {
        match method {
            HttpMethod::Get => Ok(ApiMethod::Get),
            HttpMethod::Post => Ok(ApiMethod::Post),
            HttpMethod::Put => Ok(ApiMethod::Put),
            HttpMethod::Patch => Ok(ApiMethod::Patch),
            other => Err(GraphError::UnsupportedMethod(other.as_str().to_string())),
        }
    }
}

impl From<ApiMethod> for HttpMethod {
    fn from(method: ApiMethod) -> Self {
        match method {
            ApiMethod::Get => HttpMethod::Get,
            ApiMethod::Post => HttpMethod::Post,
            ApiMethod::Put => HttpMethod::Put,
            ApiMethod::Patch => HttpMethod::Patch,
        }
    }
}

/// Status and decoded body of a Graph call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Thin JSON client over an [`HttpClient`].
///
/// Every request carries the bearer token and a JSON content type. Bodies are
/// only attached to non-GET requests.
///
/// # Example
///
/// ```ignore
/// let client = GraphClient::new(http_client);
/// let drive = client
///     .request(token.secret(), &drive_root, ApiMethod::Get, None)
///     .await?;
/// ```
#[derive(Clone)]
pub struct GraphClient {
    http_client: Arc<dyn HttpClient>,
}

impl GraphClient {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self { http_client }
    }

    /// Send the request and return the raw transport response.
    #[instrument(skip(self, token, body), fields(method = %method))]
    pub async fn execute(
        &self,
        token: &str,
        endpoint: &str,
        method: ApiMethod,
        body: Option<&Value>,
    ) -> Result<HttpResponse> {
        let mut request = HttpRequest::new(method.into(), endpoint)
            .bearer_token(token)
            .header("Content-Type", "application/json");

        if method != ApiMethod::Get {
            if let Some(body) = body {
                request = request.json(body)?;
            }
        }

        let response = self.http_client.execute(request).await?;
        debug!(endpoint, status = response.status, "Graph call completed");
        Ok(response)
    }

    /// Send the request and decode the body, keeping the status.
    pub async fn send(
        &self,
        token: &str,
        endpoint: &str,
        method: ApiMethod,
        body: Option<&Value>,
    ) -> Result<ApiResponse> {
        let response = self.execute(token, endpoint, method, body).await?;
        Ok(ApiResponse {
            status: response.status,
            body: decode_body(&response)?,
        })
    }

    /// Send the request and return the decoded JSON body, whatever the status.
    ///
    /// Callers decide whether the payload describes an error; see
    /// [`crate::GraphPayload::classify`].
    pub async fn request(
        &self,
        token: &str,
        endpoint: &str,
        method: ApiMethod,
        body: Option<&Value>,
    ) -> Result<Value> {
        Ok(self.send(token, endpoint, method, body).await?.body)
    }

    /// String-facing entry point: the method name is validated before any I/O.
    pub async fn dispatch(
        &self,
        token: &str,
        endpoint: &str,
        method: &str,
        body: Option<&Value>,
    ) -> Result<Value> {
        let method: ApiMethod = method.parse()?;
        self.request(token, endpoint, method, body).await
    }
}

/// Empty bodies decode to `null`.
pub(crate) fn decode_body(response: &HttpResponse) -> Result<Value> {
    if response.body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(&response.body).map_err(|e| {
        GraphError::InvalidResponse(format!(
            "status {}: {} ({})",
            response.status,
            e,
            String::from_utf8_lossy(&response.body)
        ))
    })
}
