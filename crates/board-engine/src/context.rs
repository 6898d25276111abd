use crate::{EngineError, Result as EngineResult};

use std::collections::HashSet;
use std::panic::Location;

use error_location::ErrorLocation;
use uuid::Uuid;

/// The acting user, resolved by the external identity source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: i64,
    pub email: String,
    pub display_name: String,
}

/// Context threaded into every engine operation: who is acting, what
/// they may do, and a correlation id for log lines.
///
/// Capabilities are opaque strings; the engine only checks membership
/// and never implements the authorization policy itself.
#[derive(Debug, Clone)]
pub struct OpContext {
    pub correlation_id: Uuid,
    pub user: CurrentUser,
    capabilities: HashSet<String>,
}

impl OpContext {
    pub fn new(user: CurrentUser, capabilities: impl IntoIterator<Item = String>) -> Self {
        Self {
            correlation_id: Uuid::new_v4(),
            user,
            capabilities: capabilities.into_iter().collect(),
        }
    }

    /// Acting identity for scheduled work (the rollover scheduler).
    /// User id 0 never matches a real assignee, so self-notification
    /// exclusion is a no-op for system-driven mutations.
    pub fn system() -> Self {
        Self::new(
            CurrentUser {
                id: 0,
                email: "system@board.invalid".to_string(),
                display_name: "System".to_string(),
            },
            ["system".to_string()],
        )
    }

    pub fn has_capability(&self, capability: &str) -> bool {
        self.capabilities.contains(capability)
    }

    #[track_caller]
    pub fn require_capability(&self, capability: &str) -> EngineResult<()> {
        if self.has_capability(capability) {
            return Ok(());
        }

        Err(EngineError::Unauthorized {
            message: format!(
                "user {} lacks the {} capability",
                self.user.id, capability
            ),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    /// Get log prefix for structured logging
    pub fn log_prefix(&self) -> String {
        format!("[{} user={}]", self.correlation_id, self.user.id)
    }
}
