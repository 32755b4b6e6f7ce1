use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use provider_onedrive::GraphError;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Error, Debug)]
pub enum ServiceError {
    /// Caller sent an incomplete or malformed request
    #[error("{0}")]
    InvalidInput(String),

    #[error(transparent)]
    Auth(#[from] core_auth::AuthError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("Service initialization failed: {0}")]
    Initialization(String),
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ServiceError::Graph(GraphError::InvalidRequest(_)) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();
        if status.is_client_error() {
            warn!(status = status.as_u16(), %message, "Request rejected");
        } else {
            error!(status = status.as_u16(), %message, "Request failed");
        }
        (status, message).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
