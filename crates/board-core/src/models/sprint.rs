use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A time-boxed grouping of tasks.
///
/// There is no stored status: "overdue" and "upcoming" are functions of
/// wall-clock time against the date range. `task_ids` mirrors
/// `Task::sprint_id` and is kept symmetric by the engine's linkage layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprint {
    pub id: i64,
    pub project_id: i64,

    pub name: String,
    pub description: Option<String>,

    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,

    pub task_ids: Vec<i64>,
}

impl Sprint {
    pub fn new(
        project_id: i64,
        name: String,
        description: Option<String>,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: 0,
            project_id,
            name,
            description,
            start_date,
            end_date,
            task_ids: Vec::new(),
        }
    }

    /// End date strictly in the past.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.end_date < now
    }

    /// Not yet started: start date at or after `now`.
    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.start_date >= now
    }

    pub fn contains_task(&self, task_id: i64) -> bool {
        self.task_ids.contains(&task_id)
    }
}
