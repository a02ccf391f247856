use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid payment endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
    #[error("payment request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed payment payload: {0}")]
    Payload(#[from] serde_json::Error),
}
