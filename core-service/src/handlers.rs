//! Route handlers.
//!
//! Handlers validate their input, fetch a token, call one Graph component and
//! shape the result. Request bodies are read as raw bytes and decoded here so
//! that malformed input maps to the gateway's own 400 messages.

use axum::body::Bytes;
use axum::extract::{RawQuery, State};
use axum::Json;
use provider_onedrive::{RangeRequest, WorkbookRange};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, instrument};

use crate::error::{Result, ServiceError};
use crate::state::AppState;

pub const MSG_RANGE_AND_VALUES: &str = "Invalid request: range and values are required.";
pub const MSG_FILE_AND_RANGE: &str = "Invalid request: fileId and range are required.";
pub const MSG_INVALID_JSON: &str = "Invalid request: request body must be valid JSON.";
pub const MSG_FILE_ID: &str = "Invalid request: fileId is required.";

#[derive(Debug, Default)]
struct RangeParams {
    file_id: Option<String>,
    range: Option<String>,
    sheet: Option<String>,
}

impl RangeParams {
    /// First non-blank value of each key wins; unknown keys are ignored.
    fn from_pairs(pairs: Vec<(String, String)>) -> RangeParams {
        let mut params = RangeParams::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "fileId" => &mut params.file_id,
                "range" => &mut params.range,
                "sheet" => &mut params.sheet,
                _ => continue,
            };
            if slot.is_none() {
                *slot = non_empty(Some(value));
            }
        }
        params
    }

    fn from_json(body: &Value) -> RangeParams {
        RangeParams {
            file_id: string_field(body, "fileId"),
            range: string_field(body, "range"),
            sheet: string_field(body, "sheet"),
        }
    }

    fn is_complete(&self) -> bool {
        self.file_id.is_some() && self.range.is_some()
    }

    /// Fill the gaps in `self` from `other`.
    fn or(self, other: RangeParams) -> RangeParams {
        RangeParams {
            file_id: self.file_id.or(other.file_id),
            range: self.range.or(other.range),
            sheet: self.sheet.or(other.sheet),
        }
    }
}

/// Entry of the spreadsheet listing
#[derive(Debug, Serialize)]
pub struct FileSummary {
    pub name: String,
    pub id: String,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// A non-blank string field; any other JSON type counts as missing.
fn string_field(body: &Value, key: &str) -> Option<String> {
    non_empty(body.get(key).and_then(Value::as_str).map(str::to_string))
}

/// An empty body decodes as `{}`.
fn parse_body(body: &Bytes) -> Result<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Default::default()));
    }
    serde_json::from_slice(body).map_err(|_| ServiceError::InvalidInput(MSG_INVALID_JSON.into()))
}

/// Rows of cells; anything else is treated as missing.
fn value_rows(values: Option<&Value>) -> Option<Vec<Vec<Value>>> {
    values.and_then(|v| Vec::<Vec<Value>>::deserialize(v).ok())
}

/// `POST /api/update-range`
#[instrument(skip_all)]
pub async fn update_range(State(state): State<AppState>, body: Bytes) -> Result<Json<Value>> {
    let body = parse_body(&body)?;

    let (range, values) = match (string_field(&body, "range"), value_rows(body.get("values"))) {
        (Some(range), Some(values)) => (range, values),
        _ => return Err(ServiceError::InvalidInput(MSG_RANGE_AND_VALUES.into())),
    };

    let settings = state.graph_settings();
    let file_id = match body.get("fileId") {
        None | Some(Value::Null) => None,
        Some(Value::String(file_id)) => non_empty(Some(file_id.clone())),
        Some(_) => return Err(ServiceError::InvalidInput(MSG_FILE_ID.into())),
    };
    let file_id = file_id
        .or_else(|| settings.default_workbook.clone())
        .ok_or_else(|| ServiceError::InvalidInput(MSG_FILE_ID.into()))?;
    let sheet = string_field(&body, "sheet").unwrap_or_else(|| settings.default_sheet.clone());

    let request = RangeRequest::new(file_id, range)
        .with_sheet(sheet)
        .with_values(values);

    let token = state.tokens.acquire().await?;
    let ack = state.ranges.write_range(token.secret(), &request).await?;
    Ok(Json(ack))
}

/// `GET /api/get-range`; query parameters win over body fields.
#[instrument(skip_all)]
pub async fn get_range(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> Result<Json<WorkbookRange>> {
    let pairs: Vec<(String, String)> = query
        .as_deref()
        .and_then(|q| serde_urlencoded::from_str(q).ok())
        .unwrap_or_default();
    let mut params = RangeParams::from_pairs(pairs);

    if !params.is_complete() {
        params = params.or(RangeParams::from_json(&parse_body(&body)?));
    }

    let (file_id, range) = match (params.file_id, params.range) {
        (Some(file_id), Some(range)) => (file_id, range),
        _ => return Err(ServiceError::InvalidInput(MSG_FILE_AND_RANGE.into())),
    };
    let sheet = params
        .sheet
        .unwrap_or_else(|| state.graph_settings().default_sheet.clone());
    debug!(%file_id, %range, %sheet, "Reading range");

    let token = state.tokens.acquire().await?;
    let range = state
        .ranges
        .read_range(token.secret(), &RangeRequest::new(file_id, range).with_sheet(sheet))
        .await?;
    Ok(Json(range))
}

/// `GET /api/get-drive-info`
#[instrument(skip_all)]
pub async fn get_drive_info(State(state): State<AppState>) -> Result<Json<Value>> {
    let token = state.tokens.acquire().await?;
    Ok(Json(state.drive.drive_info(token.secret()).await?))
}

/// `GET /api/list-root-items`: item names only.
#[instrument(skip_all)]
pub async fn list_root_items(State(state): State<AppState>) -> Result<Json<Vec<String>>> {
    let token = state.tokens.acquire().await?;
    let items = state.drive.list_root_items(token.secret()).await?;
    Ok(Json(items.into_iter().map(|item| item.name).collect()))
}

/// `GET /api/list-spreadsheet-files`
#[instrument(skip_all)]
pub async fn list_spreadsheet_files(
    State(state): State<AppState>,
) -> Result<Json<Vec<FileSummary>>> {
    let token = state.tokens.acquire().await?;
    let files = state.drive.list_spreadsheet_files(token.secret()).await?;
    Ok(Json(
        files
            .into_iter()
            .map(|item| FileSummary {
                name: item.name,
                id: item.id,
            })
            .collect(),
    ))
}

/// `GET /api/health`
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
