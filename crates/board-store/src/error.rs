use error_location::ErrorLocation;
use thiserror::Error;

/// Structured failure from a store operation: a message plus optional
/// field-level detail, matching the narrow contract the engine consumes.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        field: Option<String>,
        location: ErrorLocation,
    },

    #[error("{entity} {id} not found")]
    NotFound {
        entity: &'static str,
        id: i64,
        location: ErrorLocation,
    },

    #[error("Unauthorized: {message}")]
    Unauthorized {
        message: String,
        location: ErrorLocation,
    },

    #[error("Transport failure: {message}")]
    Transport {
        message: String,
        location: ErrorLocation,
    },
}

impl StoreError {
    /// Transport failures are transient; everything else is definitive.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
