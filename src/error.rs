use thiserror::Error;

/// Code reported for failures that carry no HTTP status.
pub const GENERAL_ERROR: i32 = -1;

/// Connection-level failure; no HTTP status is available.
#[derive(Debug, Clone, Error)]
#[error("transport failure: {0}")]
pub struct TransportError(pub String);

#[derive(Debug, Error)]
pub enum FetchError {
    /// Base address or relative path missing or unusable. Raised before any I/O.
    #[error("invalid fetch configuration: {0}")]
    Configuration(String),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("server responded with HTTP {0}")]
    HttpStatus(u16),

    /// No Tokio runtime to run the request on. Raised before any I/O.
    #[error("no async runtime available: {0}")]
    Runtime(#[from] tokio::runtime::TryCurrentError),

    /// The fetch task ended without delivering a result.
    #[error("fetch task ended without a result: {0}")]
    Aborted(String),

    /// The response body was not a JSON array.
    #[error("response is not a JSON array: {0}")]
    Parse(#[from] serde_json::Error),
}

impl FetchError {
    /// Numeric code handed to error callbacks: the HTTP status when there is
    /// one, [`GENERAL_ERROR`] otherwise.
    pub fn code(&self) -> i32 {
        match self {
            FetchError::HttpStatus(status) => i32::from(*status),
            _ => GENERAL_ERROR,
        }
    }
}
