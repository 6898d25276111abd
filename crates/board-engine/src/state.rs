use board_core::{Backlog, Column, Sprint, Task};

use std::collections::HashMap;

/// In-memory working copy of the four collections for one project.
///
/// All mutation flows through the engine's controller operations; the
/// revision counter increments on every change and keys the projector's
/// memoization.
#[derive(Debug, Default)]
pub struct BoardState {
    revision: u64,
    tasks: HashMap<i64, Task>,
    columns: HashMap<i64, Column>,
    backlogs: HashMap<i64, Backlog>,
    sprints: HashMap<i64, Sprint>,
}

impl BoardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn bump(&mut self) {
        self.revision += 1;
    }

    pub(crate) fn replace_all(
        &mut self,
        tasks: Vec<Task>,
        columns: Vec<Column>,
        backlogs: Vec<Backlog>,
        sprints: Vec<Sprint>,
    ) {
        self.tasks = tasks.into_iter().map(|t| (t.id, t)).collect();
        self.columns = columns.into_iter().map(|c| (c.id, c)).collect();
        self.backlogs = backlogs.into_iter().map(|b| (b.id, b)).collect();
        self.sprints = sprints.into_iter().map(|s| (s.id, s)).collect();
        self.bump();
    }

    // Lookups

    pub fn task(&self, id: i64) -> Option<&Task> {
        self.tasks.get(&id)
    }

    pub fn column(&self, id: i64) -> Option<&Column> {
        self.columns.get(&id)
    }

    pub fn backlog(&self, id: i64) -> Option<&Backlog> {
        self.backlogs.get(&id)
    }

    pub fn sprint(&self, id: i64) -> Option<&Sprint> {
        self.sprints.get(&id)
    }

    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    pub fn backlogs(&self) -> impl Iterator<Item = &Backlog> {
        self.backlogs.values()
    }

    pub fn sprints(&self) -> impl Iterator<Item = &Sprint> {
        self.sprints.values()
    }

    pub fn column_by_name(&self, name: &str) -> Option<&Column> {
        self.columns.values().find(|c| c.name == name)
    }

    /// Columns in board order (display_order, id tie-break).
    pub fn columns_ordered(&self) -> Vec<&Column> {
        let mut columns: Vec<&Column> = self.columns.values().collect();
        columns.sort_by_key(|c| (c.display_order, c.id));
        columns
    }

    /// Tasks in one column, in lane order (display_order, id tie-break).
    pub fn tasks_in_column(&self, column_name: &str) -> Vec<&Task> {
        let mut tasks: Vec<&Task> = self
            .tasks
            .values()
            .filter(|t| t.status == column_name)
            .collect();
        tasks.sort_by_key(|t| (t.display_order, t.id));
        tasks
    }

    /// display_order for a task appended at the end of `column_name`.
    pub fn next_display_order(&self, column_name: &str, step: i64) -> i64 {
        self.tasks
            .values()
            .filter(|t| t.status == column_name)
            .map(|t| t.display_order)
            .max()
            .unwrap_or(0)
            + step
    }

    /// display_order for a column appended at the right edge.
    pub fn next_column_order(&self, step: i64) -> i64 {
        self.columns
            .values()
            .map(|c| c.display_order)
            .max()
            .unwrap_or(0)
            + step
    }

    // Mutation. Crate-private: callers are the controller operations.

    pub(crate) fn upsert_task(&mut self, task: Task) {
        self.tasks.insert(task.id, task);
        self.bump();
    }

    pub(crate) fn remove_task(&mut self, id: i64) -> Option<Task> {
        let removed = self.tasks.remove(&id);
        if removed.is_some() {
            self.bump();
        }
        removed
    }

    pub(crate) fn upsert_column(&mut self, column: Column) {
        self.columns.insert(column.id, column);
        self.bump();
    }

    pub(crate) fn remove_column(&mut self, id: i64) -> Option<Column> {
        let removed = self.columns.remove(&id);
        if removed.is_some() {
            self.bump();
        }
        removed
    }

    pub(crate) fn upsert_backlog(&mut self, backlog: Backlog) {
        self.backlogs.insert(backlog.id, backlog);
        self.bump();
    }

    pub(crate) fn remove_backlog(&mut self, id: i64) -> Option<Backlog> {
        let removed = self.backlogs.remove(&id);
        if removed.is_some() {
            self.bump();
        }
        removed
    }

    pub(crate) fn upsert_sprint(&mut self, sprint: Sprint) {
        self.sprints.insert(sprint.id, sprint);
        self.bump();
    }

    pub(crate) fn remove_sprint(&mut self, id: i64) -> Option<Sprint> {
        let removed = self.sprints.remove(&id);
        if removed.is_some() {
            self.bump();
        }
        removed
    }
}
