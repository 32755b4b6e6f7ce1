use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// A setting required for the token request was never configured
    #[error("Missing configuration: {0} is not set")]
    MissingConfiguration(&'static str),

    /// The identity provider answered without an access token; carries the raw payload
    #[error("Error acquiring token: {0}")]
    TokenRejected(String),

    #[error("Identity provider unreachable: {0}")]
    Unreachable(String),

    #[error("Token request could not be built: {0}")]
    InvalidRequest(String),
}

pub type Result<T> = std::result::Result<T, AuthError>;
