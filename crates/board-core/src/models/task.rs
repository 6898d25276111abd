use crate::{Priority, Subtask};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub project_id: i64,

    // Core fields
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,

    // Workflow: must equal the name of exactly one live column in the project
    pub status: String,
    pub display_order: i64,

    // Membership
    pub assigned_user_emails: Vec<String>,
    pub backlog_ids: Vec<i64>,
    pub sprint_id: Option<i64>,
    /// Sprint this task overflowed from during a rollover sweep.
    pub rolled_over_from: Option<i64>,

    // Schedule
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,

    pub subtasks: Vec<Subtask>,

    /// Derived. Recomputed whenever assignees or dates change; never
    /// treated as authoritative input.
    pub total_cost: f64,

    // Audit
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Create a new unsaved task. The store assigns the real id on create.
    pub fn new(project_id: i64, title: String, status: String) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            project_id,
            title,
            description: None,
            priority: Priority::Medium,
            status,
            display_order: 0,
            assigned_user_emails: Vec::new(),
            backlog_ids: Vec::new(),
            sprint_id: None,
            rolled_over_from: None,
            start_date: None,
            end_date: None,
            subtasks: Vec::new(),
            total_cost: 0.0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_backlog_link(&self) -> bool {
        !self.backlog_ids.is_empty()
    }

    pub fn is_linked_to_backlog(&self, backlog_id: i64) -> bool {
        self.backlog_ids.contains(&backlog_id)
    }

    pub fn is_in_sprint(&self, sprint_id: i64) -> bool {
        self.sprint_id == Some(sprint_id)
    }
}
