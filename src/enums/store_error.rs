use thiserror::Error;

/// Transport-level failures of the record store. Converted into
/// `ReviewError` at the command boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{operation} failed with status {status}: {message}")]
    Api {
        operation: String,
        status: u16,
        message: String,
    },
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("could not decode {operation} response: {reason}")]
    Decode {
        operation: String,
        reason: String,
    },
}
