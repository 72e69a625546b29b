use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The server rejected the token. The session has already been cleared.
    #[error("session expired or invalid, please log in again")]
    Unauthorized,

    #[error("request failed with status {status}: {message}")]
    Status { status: StatusCode, message: String },

    /// HTTP 2xx with `success: false`.
    #[error("{0}")]
    Rejected(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
