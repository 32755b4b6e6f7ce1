use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing configuration: {0} is not set")]
    MissingSetting(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
