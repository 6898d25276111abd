pub mod error;
pub mod models;

pub use error::{CoreError, Result};
pub use models::backlog::Backlog;
pub use models::column::Column;
pub use models::priority::Priority;
pub use models::sprint::Sprint;
pub use models::subtask::Subtask;
pub use models::task::Task;
pub use models::user_profile::UserProfile;

#[cfg(test)]
mod tests;
