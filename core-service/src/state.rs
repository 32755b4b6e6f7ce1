//! Shared handler state and bootstrap.

use std::sync::Arc;

use bridge_traits::http::HttpClient;
use core_auth::{ClientCredentialProvider, TokenProvider};
use core_runtime::config::{GatewayConfig, GraphSettings};
use provider_onedrive::{DriveBrowser, GraphClient, RangeGateway};

#[cfg(feature = "desktop-shims")]
use crate::error::{Result, ServiceError};

/// Everything a handler needs, cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<dyn TokenProvider>,
    pub ranges: RangeGateway,
    pub drive: DriveBrowser,
}

impl AppState {
    /// Assemble state from an explicit token provider and HTTP client.
    pub fn new(
        tokens: Arc<dyn TokenProvider>,
        http_client: Arc<dyn HttpClient>,
        graph: GraphSettings,
    ) -> Self {
        let client = GraphClient::new(http_client);
        Self {
            tokens,
            ranges: RangeGateway::new(client.clone(), graph.clone()),
            drive: DriveBrowser::new(client, graph),
        }
    }

    /// Wire the client-credential provider and Graph components onto one
    /// shared HTTP client.
    pub fn from_config(config: &GatewayConfig, http_client: Arc<dyn HttpClient>) -> Self {
        let tokens = Arc::new(ClientCredentialProvider::new(
            config.credentials.clone(),
            http_client.clone(),
        ));
        Self::new(tokens, http_client, config.graph.clone())
    }

    pub fn graph_settings(&self) -> &GraphSettings {
        self.ranges.settings()
    }
}

/// Build state backed by the reqwest client, honouring the configured timeout.
#[cfg(feature = "desktop-shims")]
pub fn build_state(config: &GatewayConfig) -> Result<AppState> {
    let http_client = bridge_desktop::ReqwestHttpClient::with_timeout(config.server.http_timeout)
        .map_err(|e| ServiceError::Initialization(e.to_string()))?;
    Ok(AppState::from_config(config, Arc::new(http_client)))
}
