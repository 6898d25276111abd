use crate::{EntityStore, Result as StoreResult, StoreError};

use board_core::{Backlog, Column, Sprint, Task};

use std::collections::{HashMap, HashSet};
use std::panic::Location;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use error_location::ErrorLocation;

/// In-memory [`EntityStore`].
///
/// Backs the engine's working cache in tests and standalone use. Supports
/// one-shot failure injection by operation name so callers can exercise
/// rollback and compensation paths, and records the names of all
/// operations issued against it.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    tasks: HashMap<i64, Task>,
    columns: HashMap<i64, Column>,
    backlogs: HashMap<i64, Backlog>,
    sprints: HashMap<i64, Sprint>,
    next_id: i64,
    fail_ops: HashSet<String>,
    ops: Vec<String>,
}

impl Inner {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn reserve_id(&mut self, id: i64) {
        if id > self.next_id {
            self.next_id = id;
        }
    }
}

#[track_caller]
fn not_found(entity: &'static str, id: i64) -> StoreError {
    StoreError::NotFound {
        entity,
        id,
        location: ErrorLocation::from(Location::caller()),
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Inner>> {
        self.inner.lock().map_err(|_| StoreError::Transport {
            message: "store mutex poisoned".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    /// Make the next invocation of `op` fail with a transport error.
    pub fn fail_once(&self, op: &str) -> StoreResult<()> {
        self.lock()?.fail_ops.insert(op.to_string());
        Ok(())
    }

    /// Names of every operation issued so far, in order.
    pub fn recorded_ops(&self) -> StoreResult<Vec<String>> {
        Ok(self.lock()?.ops.clone())
    }

    pub fn clear_recorded_ops(&self) -> StoreResult<()> {
        self.lock()?.ops.clear();
        Ok(())
    }

    fn begin(inner: &mut Inner, op: &str) -> StoreResult<()> {
        inner.ops.push(op.to_string());
        if inner.fail_ops.remove(op) {
            return Err(StoreError::Transport {
                message: format!("injected failure for {op}"),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(())
    }

    // Seeding helpers for fixtures: ids are taken as-is when non-zero.

    pub fn seed_task(&self, mut task: Task) -> StoreResult<Task> {
        let mut inner = self.lock()?;
        if task.id == 0 {
            task.id = inner.allocate_id();
        } else {
            inner.reserve_id(task.id);
        }
        inner.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    pub fn seed_column(&self, mut column: Column) -> StoreResult<Column> {
        let mut inner = self.lock()?;
        if column.id == 0 {
            column.id = inner.allocate_id();
        } else {
            inner.reserve_id(column.id);
        }
        inner.columns.insert(column.id, column.clone());
        Ok(column)
    }

    pub fn seed_backlog(&self, mut backlog: Backlog) -> StoreResult<Backlog> {
        let mut inner = self.lock()?;
        if backlog.id == 0 {
            backlog.id = inner.allocate_id();
        } else {
            inner.reserve_id(backlog.id);
        }
        inner.backlogs.insert(backlog.id, backlog.clone());
        Ok(backlog)
    }

    pub fn seed_sprint(&self, mut sprint: Sprint) -> StoreResult<Sprint> {
        let mut inner = self.lock()?;
        if sprint.id == 0 {
            sprint.id = inner.allocate_id();
        } else {
            inner.reserve_id(sprint.id);
        }
        inner.sprints.insert(sprint.id, sprint.clone());
        Ok(sprint)
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn list_tasks(&self, project_id: i64) -> StoreResult<Vec<Task>> {
        let mut inner = self.lock()?;
        Self::begin(&mut inner, "list_tasks")?;
        let mut tasks: Vec<Task> = inner
            .tasks
            .values()
            .filter(|t| t.project_id == project_id)
            .cloned()
            .collect();
        tasks.sort_by_key(|t| t.id);
        Ok(tasks)
    }

    async fn get_task(&self, id: i64) -> StoreResult<Task> {
        let mut inner = self.lock()?;
        Self::begin(&mut inner, "get_task")?;
        inner.tasks.get(&id).cloned().ok_or(not_found("task", id))
    }

    async fn create_task(&self, mut task: Task) -> StoreResult<Task> {
        let mut inner = self.lock()?;
        Self::begin(&mut inner, "create_task")?;
        task.id = inner.allocate_id();
        inner.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn update_task(&self, id: i64, mut task: Task) -> StoreResult<Task> {
        let mut inner = self.lock()?;
        Self::begin(&mut inner, "update_task")?;
        if !inner.tasks.contains_key(&id) {
            return Err(not_found("task", id));
        }
        task.id = id;
        inner.tasks.insert(id, task.clone());
        Ok(task)
    }

    async fn delete_task(&self, id: i64) -> StoreResult<()> {
        let mut inner = self.lock()?;
        Self::begin(&mut inner, "delete_task")?;
        inner
            .tasks
            .remove(&id)
            .map(|_| ())
            .ok_or(not_found("task", id))
    }

    async fn list_columns(&self, project_id: i64) -> StoreResult<Vec<Column>> {
        let mut inner = self.lock()?;
        Self::begin(&mut inner, "list_columns")?;
        let mut columns: Vec<Column> = inner
            .columns
            .values()
            .filter(|c| c.project_id == project_id)
            .cloned()
            .collect();
        columns.sort_by_key(|c| c.id);
        Ok(columns)
    }

    async fn get_column(&self, id: i64) -> StoreResult<Column> {
        let mut inner = self.lock()?;
        Self::begin(&mut inner, "get_column")?;
        inner
            .columns
            .get(&id)
            .cloned()
            .ok_or(not_found("column", id))
    }

    async fn create_column(&self, mut column: Column) -> StoreResult<Column> {
        let mut inner = self.lock()?;
        Self::begin(&mut inner, "create_column")?;
        column.id = inner.allocate_id();
        inner.columns.insert(column.id, column.clone());
        Ok(column)
    }

    async fn update_column(&self, id: i64, mut column: Column) -> StoreResult<Column> {
        let mut inner = self.lock()?;
        Self::begin(&mut inner, "update_column")?;
        if !inner.columns.contains_key(&id) {
            return Err(not_found("column", id));
        }
        column.id = id;
        inner.columns.insert(id, column.clone());
        Ok(column)
    }

    async fn delete_column(&self, id: i64) -> StoreResult<()> {
        let mut inner = self.lock()?;
        Self::begin(&mut inner, "delete_column")?;
        inner
            .columns
            .remove(&id)
            .map(|_| ())
            .ok_or(not_found("column", id))
    }

    async fn list_backlogs(&self, project_id: i64) -> StoreResult<Vec<Backlog>> {
        let mut inner = self.lock()?;
        Self::begin(&mut inner, "list_backlogs")?;
        let mut backlogs: Vec<Backlog> = inner
            .backlogs
            .values()
            .filter(|b| b.project_id == project_id)
            .cloned()
            .collect();
        backlogs.sort_by_key(|b| b.id);
        Ok(backlogs)
    }

    async fn get_backlog(&self, id: i64) -> StoreResult<Backlog> {
        let mut inner = self.lock()?;
        Self::begin(&mut inner, "get_backlog")?;
        inner
            .backlogs
            .get(&id)
            .cloned()
            .ok_or(not_found("backlog", id))
    }

    async fn create_backlog(&self, mut backlog: Backlog) -> StoreResult<Backlog> {
        let mut inner = self.lock()?;
        Self::begin(&mut inner, "create_backlog")?;
        backlog.id = inner.allocate_id();
        inner.backlogs.insert(backlog.id, backlog.clone());
        Ok(backlog)
    }

    async fn update_backlog(&self, id: i64, mut backlog: Backlog) -> StoreResult<Backlog> {
        let mut inner = self.lock()?;
        Self::begin(&mut inner, "update_backlog")?;
        if !inner.backlogs.contains_key(&id) {
            return Err(not_found("backlog", id));
        }
        backlog.id = id;
        inner.backlogs.insert(id, backlog.clone());
        Ok(backlog)
    }

    async fn delete_backlog(&self, id: i64) -> StoreResult<()> {
        let mut inner = self.lock()?;
        Self::begin(&mut inner, "delete_backlog")?;
        inner
            .backlogs
            .remove(&id)
            .map(|_| ())
            .ok_or(not_found("backlog", id))
    }

    async fn list_sprints(&self, project_id: i64) -> StoreResult<Vec<Sprint>> {
        let mut inner = self.lock()?;
        Self::begin(&mut inner, "list_sprints")?;
        let mut sprints: Vec<Sprint> = inner
            .sprints
            .values()
            .filter(|s| s.project_id == project_id)
            .cloned()
            .collect();
        sprints.sort_by_key(|s| s.id);
        Ok(sprints)
    }

    async fn get_sprint(&self, id: i64) -> StoreResult<Sprint> {
        let mut inner = self.lock()?;
        Self::begin(&mut inner, "get_sprint")?;
        inner
            .sprints
            .get(&id)
            .cloned()
            .ok_or(not_found("sprint", id))
    }

    async fn create_sprint(&self, mut sprint: Sprint) -> StoreResult<Sprint> {
        let mut inner = self.lock()?;
        Self::begin(&mut inner, "create_sprint")?;
        sprint.id = inner.allocate_id();
        inner.sprints.insert(sprint.id, sprint.clone());
        Ok(sprint)
    }

    async fn update_sprint(&self, id: i64, mut sprint: Sprint) -> StoreResult<Sprint> {
        let mut inner = self.lock()?;
        Self::begin(&mut inner, "update_sprint")?;
        if !inner.sprints.contains_key(&id) {
            return Err(not_found("sprint", id));
        }
        sprint.id = id;
        inner.sprints.insert(id, sprint.clone());
        Ok(sprint)
    }

    async fn delete_sprint(&self, id: i64) -> StoreResult<()> {
        let mut inner = self.lock()?;
        Self::begin(&mut inner, "delete_sprint")?;
        inner
            .sprints
            .remove(&id)
            .map(|_| ())
            .ok_or(not_found("sprint", id))
    }
}
