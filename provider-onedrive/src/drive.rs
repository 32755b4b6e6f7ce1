//! Drive metadata and listings

use crate::client::{ApiMethod, ApiResponse, GraphClient};
use crate::error::{GraphError, Result};
use crate::types::{DriveItem, DriveItemCollection, GraphPayload};
use core_runtime::config::GraphSettings;
use serde_json::Value;
use tracing::{debug, info, instrument};

/// MIME type Graph reports for `.xlsx` workbooks
pub const SPREADSHEET_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const SPREADSHEET_SEARCH: &str = "root/search(q='.xlsx')";
const ROOT_CHILDREN: &str = "root/children";

/// Read-only view of the configured drive.
///
/// Only the first page of each listing is returned.
#[derive(Clone)]
pub struct DriveBrowser {
    client: GraphClient,
    settings: GraphSettings,
}

impl DriveBrowser {
    pub fn new(client: GraphClient, settings: GraphSettings) -> Self {
        Self { client, settings }
    }

    /// Drive resource metadata as returned by Graph
    #[instrument(skip(self, token))]
    pub async fn drive_info(&self, token: &str) -> Result<Value> {
        let url = self.settings.drive_root()?.trim_end_matches('/').to_string();
        self.get_checked(token, &url).await
    }

    /// Items directly under the drive root, in the order Graph returns them.
    #[instrument(skip(self, token))]
    pub async fn list_root_items(&self, token: &str) -> Result<Vec<DriveItem>> {
        let items = self.list(token, ROOT_CHILDREN).await?;
        info!(count = items.len(), "Listed root items");
        Ok(items)
    }

    /// `.xlsx` search results whose MIME type is the spreadsheet type.
    ///
    /// The name search alone also matches folders and mislabelled files.
    #[instrument(skip(self, token))]
    pub async fn list_spreadsheet_files(&self, token: &str) -> Result<Vec<DriveItem>> {
        let files: Vec<DriveItem> = self
            .list(token, SPREADSHEET_SEARCH)
            .await?
            .into_iter()
            .filter(|item| item.mime_type.as_deref() == Some(SPREADSHEET_MIME_TYPE))
            .collect();
        info!(count = files.len(), "Listed spreadsheet files");
        Ok(files)
    }

    async fn list(&self, token: &str, path: &str) -> Result<Vec<DriveItem>> {
        let url = format!(
            "{}/{}",
            self.settings.drive_root()?.trim_end_matches('/'),
            path
        );
        let body = self.get_checked(token, &url).await?;
        let collection: DriveItemCollection = serde_json::from_value(body)
            .map_err(|e| GraphError::InvalidResponse(format!("driveItem collection: {}", e)))?;

        if collection.next_link.is_some() {
            debug!(path, "More results available; returning first page only");
        }
        Ok(collection.value.into_iter().map(DriveItem::from).collect())
    }

    /// GET `url` and trust the payload's own `error` object.
    async fn get_checked(&self, token: &str, url: &str) -> Result<Value> {
        let ApiResponse { status, body } = self.client.send(token, url, ApiMethod::Get, None).await?;
        GraphPayload::classify(body)
            .into_result()
            .map_err(|api_error| GraphError::RemoteRead {
                status,
                body: api_error.to_string(),
            })
    }
}
