use serde::{Deserialize, Serialize};

/// A named grouping of tasks not tied to a time-box.
///
/// `task_ids` mirrors `Task::backlog_ids`; the two sides are kept
/// symmetric by the engine's linkage layer, never edited directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Backlog {
    pub id: i64,
    pub project_id: i64,

    pub name: String,
    pub description: Option<String>,

    pub task_ids: Vec<i64>,
}

impl Backlog {
    pub fn new(project_id: i64, name: String, description: Option<String>) -> Self {
        Self {
            id: 0,
            project_id,
            name,
            description,
            task_ids: Vec::new(),
        }
    }

    pub fn contains_task(&self, task_id: i64) -> bool {
        self.task_ids.contains(&task_id)
    }
}
