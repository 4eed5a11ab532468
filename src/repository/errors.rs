use reqwest::StatusCode;
use thiserror::Error;

/// Message shown when the server gives no usable explanation.
pub const GENERIC_SERVER_MESSAGE: &str = "Something went wrong!";

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found")]
    NotFound,

    #[error("You must be logged in to continue.")]
    Unauthorized,

    #[error("{message}")]
    ServerError { status: u16, message: String },

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Unexpected response: {0}")]
    DecodeError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl RepositoryError {
    /// Maps a non-success response to an error, preferring the `message`
    /// field of a JSON body.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RepositoryError::Unauthorized,
            StatusCode::NOT_FOUND => RepositoryError::NotFound,
            _ => RepositoryError::ServerError {
                status: status.as_u16(),
                message: server_message(body)
                    .unwrap_or_else(|| GENERIC_SERVER_MESSAGE.to_string()),
            },
        }
    }
}

/// Extracts a non-blank `message` from a JSON error body.
pub fn server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(|message| message.as_str())
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}

impl From<reqwest::Error> for RepositoryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RepositoryError::Timeout
        } else if err.is_decode() {
            RepositoryError::DecodeError(err.to_string())
        } else if err.is_connect() || err.is_request() {
            RepositoryError::ConnectionError(err.to_string())
        } else if let Some(status) = err.status() {
            RepositoryError::from_response(status, "")
        } else {
            RepositoryError::Unexpected(err.to_string())
        }
    }
}

impl From<std::io::Error> for RepositoryError {
    fn from(err: std::io::Error) -> Self {
        RepositoryError::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::DecodeError(err.to_string())
    }
}
