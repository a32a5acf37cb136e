use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status: {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),
    #[error("no value stored under {0}")]
    MissingKey(&'static str),
    #[error("{0} answered with an unreadable document: {1}")]
    Unreadable(&'static str, serde_json::Error),
    #[error("no config source succeeded ({})", .0.join("; "))]
    NoSource(Vec<String>),
    #[error("invalid document: {0}")]
    Validation(String),
}
