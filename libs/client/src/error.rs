//! Client error type

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    /// The session token was rejected; stored credentials have been cleared
    #[error("Session expired, please log in again")]
    Unauthorized,

    /// Non-success answer carrying the server's `error` message
    #[error("{message} (status {status})")]
    Api { status: u16, message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Credential storage failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    /// HTTP status when the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Unauthorized => Some(401),
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
