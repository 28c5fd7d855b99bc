use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("snapshot error: {0}")]
    Snapshot(String),

    #[error("upstream failure: {0}")]
    Upstream(String),

    #[error("upstream timeout: {0}")]
    Timeout(String),
}

pub type Result<T> = std::result::Result<T, Error>;
