use reqwest::StatusCode;
use thiserror::Error;

/// Errors raised while talking to the Encompass API
#[derive(Debug, Error)]
pub enum EncompassError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("No loans found for loan number: {0}")]
    LoanNotFound(String),

    #[error("Failed to create document placeholder (status {status}): {body}")]
    PlaceholderCreation { status: StatusCode, body: String },

    #[error("Document placeholder created but no Location header was returned")]
    MissingLocation,

    #[error("Attachment upload session unusable: {0}")]
    UploadSession(String),

    #[error("Attachment transfer failed (status {status}): {body}")]
    Transfer { status: StatusCode, body: String },

    #[error("Unexpected response from {endpoint}: {reason}")]
    UnexpectedResponse { endpoint: &'static str, reason: String },

    #[error("File error: {0}")]
    Io(#[from] std::io::Error),
}

pub type EncompassResult<T> = std::result::Result<T, EncompassError>;
