//! Error types for the Graph provider

use bridge_traits::error::BridgeError;
use thiserror::Error;

/// Graph provider errors
#[derive(Error, Debug)]
pub enum GraphError {
    /// Requested HTTP method is outside GET/POST/PUT/PATCH; raised before any I/O
    #[error("HTTP method not supported: {0}")]
    UnsupportedMethod(String),

    /// A read returned a non-2xx status, or a listing payload carried an error
    #[error("Graph read failed (status {status}): {body}")]
    RemoteRead { status: u16, body: String },

    /// The write response body carried an `error` object
    #[error("Failed to update excel sheet: {0}")]
    RemoteWrite(String),

    /// The operation was called without the data it needs
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Response body could not be decoded
    #[error("Invalid response from Graph: {0}")]
    InvalidResponse(String),

    /// Network-level failure
    #[error("Graph transport error: {0}")]
    Transport(#[from] BridgeError),

    /// Required setting missing at first use
    #[error(transparent)]
    Config(#[from] core_runtime::Error),
}

/// Result type for Graph operations
pub type Result<T> = std::result::Result<T, GraphError>;
