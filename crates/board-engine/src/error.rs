use std::panic::Location;

use board_store::StoreError;
use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        field: Option<String>,
        location: ErrorLocation,
    },

    #[error("Resource not found: {message}")]
    NotFound {
        message: String,
        location: ErrorLocation,
    },

    #[error("Unauthorized: {message}")]
    Unauthorized {
        message: String,
        location: ErrorLocation,
    },

    #[error("Cannot delete: {message}")]
    DeleteBlocked {
        message: String,
        location: ErrorLocation,
    },

    #[error("Store failure: {source} {location}")]
    Transport {
        #[source]
        source: StoreError,
        location: ErrorLocation,
    },

    #[error("Consistency failure: {message} {location}")]
    Consistency {
        message: String,
        location: ErrorLocation,
    },

    #[error("{failed} of {total} notifications failed to send")]
    PartialNotificationFailure {
        failed: usize,
        total: usize,
        location: ErrorLocation,
    },
}

impl EngineError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Unauthorized { .. } => "UNAUTHORIZED",
            Self::DeleteBlocked { .. } => "DELETE_BLOCKED",
            Self::Transport { .. } => "TRANSPORT_ERROR",
            Self::Consistency { .. } => "CONSISTENCY_ERROR",
            Self::PartialNotificationFailure { .. } => "NOTIFICATION_PARTIAL_FAILURE",
        }
    }

    /// Only transport failures are worth re-issuing as-is.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { source, .. } => source.is_retryable(),
            _ => false,
        }
    }
}

impl From<StoreError> for EngineError {
    #[track_caller]
    fn from(source: StoreError) -> Self {
        let location = ErrorLocation::from(Location::caller());
        match source {
            StoreError::Validation {
                message,
                field,
                location,
            } => Self::Validation {
                message,
                field,
                location,
            },
            StoreError::NotFound { entity, id, .. } => Self::NotFound {
                message: format!("{entity} {id} not found"),
                location,
            },
            StoreError::Unauthorized { message, .. } => Self::Unauthorized { message, location },
            other => Self::Transport {
                source: other,
                location,
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
