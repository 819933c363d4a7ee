use layoutgen_api::ApiError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LayoutsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid glob pattern: {0}")]
    Pattern(String),
    #[error("Watcher error: {0}")]
    Watch(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ignore::Error> for LayoutsError {
    fn from(err: ignore::Error) -> Self {
        LayoutsError::Pattern(err.to_string())
    }
}

impl From<notify::Error> for LayoutsError {
    fn from(err: notify::Error) -> Self {
        LayoutsError::Watch(err.to_string())
    }
}

impl From<tokio::task::JoinError> for LayoutsError {
    fn from(err: tokio::task::JoinError) -> Self {
        LayoutsError::Internal(err.to_string())
    }
}

impl From<LayoutsError> for ApiError {
    fn from(err: LayoutsError) -> Self {
        match err {
            LayoutsError::Pattern(msg) => ApiError::InvalidConfig(msg),
            LayoutsError::Json(e) => ApiError::InvalidConfig(e.to_string()),
            LayoutsError::Watch(msg) => ApiError::Watch(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, LayoutsError>;
