use thiserror::Error;

/// All errors that can occur when using the Docparser client.
#[derive(Error, Debug)]
pub enum DocparserError {
    /// The API key is missing or was rejected by the service (HTTP 403).
    #[error("authentication failed: {message}")]
    Authentication { message: String },

    /// The service rejected the request as malformed (HTTP 400).
    #[error("bad request: {message}")]
    BadRequest {
        message: String,
        body: Option<serde_json::Value>,
    },

    /// A parser label could not be resolved, or the service returned HTTP 404.
    #[error("not found: {message}")]
    NotFound { message: String },

    /// Any other failing status, or a 2xx response whose body did not have
    /// the expected shape. Carries the raw response text.
    #[error("API error {status_code}: {message}")]
    Api {
        status_code: u16,
        message: String,
        body: Option<serde_json::Value>,
    },

    /// An argument was rejected before any request was issued.
    #[error("invalid argument: {0}")]
    Validation(String),

    /// A transport-level HTTP error from reqwest.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// An I/O error, typically from reading a local file for upload.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenience alias for `Result<T, DocparserError>`.
pub type Result<T> = std::result::Result<T, DocparserError>;
