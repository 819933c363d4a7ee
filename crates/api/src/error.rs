#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Watcher error: {0}")]
    Watch(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
