//! Graph API payload types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Error object Graph embeds under the top-level `error` key.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GraphApiError {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
    /// `innerError` and anything else Graph attaches
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl fmt::Display for GraphApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.code.is_empty(), self.message.is_empty()) {
            (false, false) => write!(f, "{}: {}", self.code, self.message),
            (false, true) => f.write_str(&self.code),
            (true, false) => f.write_str(&self.message),
            (true, true) => write!(f, "{}", Value::Object(self.details.clone())),
        }
    }
}

/// A decoded Graph body, split on whether it carries an `error` object.
///
/// Graph may answer a request with a 2xx status and still describe a failure
/// in the body, so payloads are classified before use.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphPayload {
    Ok(Value),
    Err(GraphApiError),
}

impl GraphPayload {
    pub fn classify(body: Value) -> Self {
        match body.get("error") {
            None | Some(Value::Null) => GraphPayload::Ok(body),
            Some(Value::Object(_)) => {
                let error = body["error"].clone();
                match serde_json::from_value::<GraphApiError>(error.clone()) {
                    Ok(api_error) => GraphPayload::Err(api_error),
                    Err(_) => GraphPayload::Err(GraphApiError {
                        code: String::new(),
                        message: error.to_string(),
                        details: Map::new(),
                    }),
                }
            }
            Some(Value::String(message)) => GraphPayload::Err(GraphApiError {
                code: String::new(),
                message: message.clone(),
                details: Map::new(),
            }),
            Some(other) => GraphPayload::Err(GraphApiError {
                code: String::new(),
                message: other.to_string(),
                details: Map::new(),
            }),
        }
    }

    pub fn into_result(self) -> std::result::Result<Value, GraphApiError> {
        match self {
            GraphPayload::Ok(value) => Ok(value),
            GraphPayload::Err(error) => Err(error),
        }
    }
}

/// `workbookRange` resource.
///
/// Only `address` and `values` are typed; every other property Graph returns
/// (`formulas`, `numberFormat`, `rowCount`, ...) is kept in `properties` so the
/// full object can be echoed back.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct WorkbookRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default)]
    pub values: Vec<Vec<Value>>,
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

/// Projection of a drive listing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DriveItem {
    pub name: String,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl DriveItem {
    /// Whether the entry carries a file facet (folders and packages do not)
    pub fn is_file(&self) -> bool {
        self.mime_type.is_some()
    }
}

/// Raw `driveItem` as returned in collection responses
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct DriveItemDto {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub file: Option<FileFacet>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FileFacet {
    #[serde(default)]
    pub mime_type: Option<String>,
}

impl From<DriveItemDto> for DriveItem {
    fn from(dto: DriveItemDto) -> Self {
        DriveItem {
            name: dto.name.unwrap_or_default(),
            id: dto.id.unwrap_or_default(),
            mime_type: dto.file.and_then(|file| file.mime_type),
        }
    }
}

/// OData collection wrapper (`{"value": [...]}`)
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct DriveItemCollection {
    #[serde(default)]
    pub value: Vec<DriveItemDto>,
    #[serde(rename = "@odata.nextLink", default)]
    pub next_link: Option<String>,
}
