use serde::{Deserialize, Serialize};

/// A checklist entry inside a task. Completion flags persist with the
/// owning task; subtasks have no identity of their own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub title: String,
    pub completed: bool,
}

impl Subtask {
    pub fn new(title: String) -> Self {
        Self {
            title,
            completed: false,
        }
    }
}
