use serde::{Deserialize, Serialize};

/// A board lane. The column name doubles as the status value of every
/// task currently in the lane, so names are unique per project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: i64,
    pub project_id: i64,

    pub name: String,
    pub display_order: i64,
}

impl Column {
    pub fn new(project_id: i64, name: String, display_order: i64) -> Self {
        Self {
            id: 0,
            project_id,
            name,
            display_order,
        }
    }
}
