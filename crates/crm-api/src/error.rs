use crm_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },
    #[error("unexpected response body: {0}")]
    Decode(String),
    #[error("invalid customer data: {0}")]
    Core(#[from] CoreError),
}

pub type Result<T> = std::result::Result<T, ApiError>;
