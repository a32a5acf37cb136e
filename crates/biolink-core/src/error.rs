use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("internal error: {0}")]
    Internal(String),
}
