use crate::BoardState;

use board_core::{Backlog, Column, Sprint, Task};

/// Pre-mutation capture of the entities one operation may touch.
///
/// The optimistic command pattern used by every mutating operation:
/// capture the affected entities, mutate the local state, persist, and
/// on persistence failure restore the capture so the board visibly snaps
/// back. Capturing a missing id records the absence, so a restore also
/// undoes optimistic inserts.
#[derive(Debug, Default)]
pub struct Snapshot {
    tasks: Vec<(i64, Option<Task>)>,
    columns: Vec<(i64, Option<Column>)>,
    backlogs: Vec<(i64, Option<Backlog>)>,
    sprints: Vec<(i64, Option<Sprint>)>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn capture_task(&mut self, state: &BoardState, id: i64) {
        self.tasks.push((id, state.task(id).cloned()));
    }

    pub fn capture_column(&mut self, state: &BoardState, id: i64) {
        self.columns.push((id, state.column(id).cloned()));
    }

    pub fn capture_backlog(&mut self, state: &BoardState, id: i64) {
        self.backlogs.push((id, state.backlog(id).cloned()));
    }

    pub fn capture_sprint(&mut self, state: &BoardState, id: i64) {
        self.sprints.push((id, state.sprint(id).cloned()));
    }

    /// Put every captured entity back exactly as it was.
    pub fn restore(self, state: &mut BoardState) {
        for (id, task) in self.tasks {
            match task {
                Some(task) => state.upsert_task(task),
                None => {
                    state.remove_task(id);
                }
            }
        }
        for (id, column) in self.columns {
            match column {
                Some(column) => state.upsert_column(column),
                None => {
                    state.remove_column(id);
                }
            }
        }
        for (id, backlog) in self.backlogs {
            match backlog {
                Some(backlog) => state.upsert_backlog(backlog),
                None => {
                    state.remove_backlog(id);
                }
            }
        }
        for (id, sprint) in self.sprints {
            match sprint {
                Some(sprint) => state.upsert_sprint(sprint),
                None => {
                    state.remove_sprint(id);
                }
            }
        }
    }
}
