//! # OneDrive / Graph Provider
//!
//! Client-side of the Microsoft Graph API used by the gateway.
//!
//! ## Overview
//!
//! This module provides:
//! - [`GraphClient`]: authenticated GET/POST/PUT/PATCH requests returning JSON
//! - [`RangeGateway`]: workbook range reads and writes addressed by A1 ranges
//! - [`DriveBrowser`]: drive metadata, root listing and spreadsheet search
//!
//! ## Status handling
//!
//! Range reads check the HTTP status before decoding the body. Writes and
//! drive listings decode first and trust the payload's own `error` object,
//! since Graph can answer 200 with an error payload on those paths.

pub mod client;
pub mod drive;
pub mod error;
pub mod types;
pub mod workbook;

pub use client::{ApiMethod, ApiResponse, GraphClient};
pub use drive::{DriveBrowser, SPREADSHEET_MIME_TYPE};
pub use error::{GraphError, Result};
pub use types::{DriveItem, GraphApiError, GraphPayload, WorkbookRange};
pub use workbook::{RangeGateway, RangeRequest};
