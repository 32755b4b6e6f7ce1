//! # Workbook Range Gateway
//!
//! Turns `(file id, sheet, A1 range, values)` into Graph workbook range
//! reads and updates.
//!
//! Range addresses are forwarded verbatim; Graph is the only validator.
//!
//! Reads check the HTTP status before decoding and fail with
//! [`GraphError::RemoteRead`]. Writes decode the body and fail with
//! [`GraphError::RemoteWrite`] when it carries an `error` object, even on a
//! 200 response.

use crate::client::{decode_body, ApiMethod, GraphClient};
use crate::error::{GraphError, Result};
use crate::types::{GraphPayload, WorkbookRange};
use core_runtime::config::{GraphSettings, DEFAULT_SHEET};
use serde_json::{json, Value};
use tracing::{info, instrument, warn};

/// One range operation, built per inbound request.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeRequest {
    pub file_id: String,
    pub sheet_name: String,
    pub range_address: String,
    pub values: Option<Vec<Vec<Value>>>,
}

impl RangeRequest {
    pub fn new(file_id: impl Into<String>, range_address: impl Into<String>) -> Self {
        Self {
            file_id: file_id.into(),
            sheet_name: DEFAULT_SHEET.to_string(),
            range_address: range_address.into(),
            values: None,
        }
    }

    pub fn with_sheet(mut self, sheet_name: impl Into<String>) -> Self {
        self.sheet_name = sheet_name.into();
        self
    }

    pub fn with_values(mut self, values: Vec<Vec<Value>>) -> Self {
        self.values = Some(values);
        self
    }
}

/// Range sub-resource URL for `request` under `drive_root`.
pub fn range_url(drive_root: &str, request: &RangeRequest) -> String {
    format!(
        "{}/items/{}/workbook/worksheets/{}/range(address='{}')",
        drive_root.trim_end_matches('/'),
        request.file_id,
        request.sheet_name,
        request.range_address
    )
}

#[derive(Clone)]
pub struct RangeGateway {
    client: GraphClient,
    settings: GraphSettings,
}

impl RangeGateway {
    pub fn new(client: GraphClient, settings: GraphSettings) -> Self {
        Self { client, settings }
    }

    pub fn settings(&self) -> &GraphSettings {
        &self.settings
    }

    /// Read the range and return the full range object.
    #[instrument(skip(self, token, request), fields(file_id = %request.file_id, range = %request.range_address))]
    pub async fn read_range(&self, token: &str, request: &RangeRequest) -> Result<WorkbookRange> {
        let url = range_url(self.settings.drive_root()?, request);
        let response = self.client.execute(token, &url, ApiMethod::Get, None).await?;

        if !response.is_success() {
            let body = String::from_utf8_lossy(&response.body).into_owned();
            warn!(status = response.status, "Range read rejected");
            return Err(GraphError::RemoteRead {
                status: response.status,
                body,
            });
        }

        let body = decode_body(&response)?;
        serde_json::from_value(body)
            .map_err(|e| GraphError::InvalidResponse(format!("workbookRange: {}", e)))
    }

    /// Replace the range's values; returns the downstream acknowledgement.
    #[instrument(skip(self, token, request), fields(file_id = %request.file_id, range = %request.range_address))]
    pub async fn write_range(&self, token: &str, request: &RangeRequest) -> Result<Value> {
        let values = request
            .values
            .as_ref()
            .ok_or_else(|| GraphError::InvalidRequest("values are required".to_string()))?;

        let url = range_url(self.settings.drive_root()?, request);
        let body = json!({ "values": values });
        let response = self
            .client
            .request(token, &url, ApiMethod::Patch, Some(&body))
            .await?;

        match GraphPayload::classify(response).into_result() {
            Ok(ack) => {
                info!(rows = values.len(), "Range updated");
                Ok(ack)
            }
            Err(api_error) => {
                warn!(error = %api_error, "Range update rejected");
                Err(GraphError::RemoteWrite(api_error.to_string()))
            }
        }
    }
}
