use thiserror::Error;
use vaultkeep_core::RestoreError;

/// Failures raised by a management-plane transport. Never retried here.
#[derive(Error, Debug)]
pub enum TransportError {
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Other(String),
}

#[derive(Error, Debug)]
pub enum PlaneError {
    #[error(transparent)]
    Validation(#[from] RestoreError),
    #[error("management plane call failed: {0}")]
    Transport(#[from] TransportError),
    #[error("operation cancelled")]
    Cancelled,
}
