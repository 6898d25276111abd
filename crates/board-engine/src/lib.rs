pub mod backlog_ops;
pub mod column_ops;
pub mod context;
pub mod cost;
pub mod directory;
pub mod drag;
pub mod engine;
pub mod error;
pub mod events;
pub mod field_change;
pub mod lifecycle;
pub mod linkage;
pub mod notify;
pub mod projector;
pub mod retry;
pub mod rollover;
pub mod scheduler;
pub mod snapshot;
pub mod sprint_ops;
pub mod state;
pub mod store_ops;
pub mod validator;

pub use column_ops::COLUMN_CREATE_CAPABILITY;
pub use context::{CurrentUser, OpContext};
pub use cost::compute_total_cost;
pub use directory::UserDirectory;
pub use drag::{DragEvent, DragId, DragTransition, resolve_transition};
pub use engine::Engine;
pub use error::{EngineError, Result};
pub use events::{ChangeEvent, ChangeFeed, ChangeKind, EntityKind};
pub use field_change::{FieldChange, FieldChangeBuilder};
pub use lifecycle::{TaskChange, TaskDraft, TaskPatch};
pub use notify::{
    Notification, NotificationDispatcher, NotificationKind, NotifyError, NotifyReport,
    NullDispatcher,
};
pub use projector::{
    BoardColumnView, BoardFilter, BoardProjector, BoardView, LinkFilter, project_board,
};
pub use retry::{IsRetryable, RetryConfig, with_retry};
pub use rollover::{MigratedTask, SweepReport};
pub use scheduler::RolloverScheduler;
pub use snapshot::Snapshot;
pub use sprint_ops::SprintPatch;
pub use state::BoardState;
pub use validator::{BoardValidator, sanitize_string};

#[cfg(test)]
mod tests;
