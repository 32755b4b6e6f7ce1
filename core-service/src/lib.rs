//! HTTP surface of the gateway.
//!
//! Routes are mounted under `/api`:
//!
//! | Route | Method |
//! |---|---|
//! | `/api/update-range` | POST |
//! | `/api/get-range` | GET |
//! | `/api/get-drive-info` | GET |
//! | `/api/list-root-items` | GET |
//! | `/api/list-spreadsheet-files` | GET |
//! | `/api/health` | GET |
//!
//! Input validation failures answer 400 with a plain-text message; every
//! other failure answers 500. Desktop builds enable the `desktop-shims`
//! feature, which provides [`build_state`] on top of `bridge-desktop`.

pub mod error;
pub mod handlers;
pub mod state;

pub use error::{Result, ServiceError};
#[cfg(feature = "desktop-shims")]
pub use state::build_state;
pub use state::AppState;

use axum::routing::{get, post};
use axum::Router;

/// Build the gateway router over `state`.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/update-range", post(handlers::update_range))
        .route("/get-range", get(handlers::get_range))
        .route("/get-drive-info", get(handlers::get_drive_info))
        .route("/list-root-items", get(handlers::list_root_items))
        .route("/list-spreadsheet-files", get(handlers::list_spreadsheet_files))
        .route("/health", get(handlers::health));

    Router::new().nest("/api", api).with_state(state)
}
