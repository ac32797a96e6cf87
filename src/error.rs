use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReceivablesError {
    #[error("Unknown grouping dimension: {0}")]
    UnknownDimension(String),

    #[error("Unknown status filter: {0}")]
    UnknownStatusFilter(String),

    #[error("Malformed source payload: {0}")]
    PayloadError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ReceivablesError>;
