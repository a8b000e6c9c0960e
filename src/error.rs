use thiserror::Error;

use crate::types::Category;

/// Errors raised by the footprint engine and its configuration layer.
#[derive(Debug, Error)]
pub enum FootprintError {
    /// Client-correctable input: missing required field, out-of-range value,
    /// or an enumerated value outside its documented set.
    #[error("invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },
    /// Internal defect: a computed value is negative, NaN or infinite.
    #[error("computation error in {category}: {detail}")]
    Computation { category: Category, detail: String },
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("configuration io error: {0}")]
    ConfigIo(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FootprintError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        FootprintError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// True when the caller can fix the request; false for server-side defects.
    pub fn is_client_error(&self) -> bool {
        matches!(self, FootprintError::InvalidInput { .. })
    }
}

pub type Result<T> = std::result::Result<T, FootprintError>;

/// Failures of the external advisory collaborator. Never mixed into
/// [`FootprintError`]; the pipeline logs and drops them.
#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("advisory service unavailable: {0}")]
    Unavailable(String),
    #[error("advisory call timed out after {0} ms")]
    Timeout(u64),
    #[error("advisory payload error: {0}")]
    Payload(#[from] serde_json::Error),
}
