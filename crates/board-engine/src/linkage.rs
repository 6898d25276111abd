use crate::{
    BoardState, EngineError, OpContext, Result as EngineResult, Snapshot,
};

use board_core::{Backlog, Column, Sprint, Task};
use board_store::{EntityStore, StoreError};

use std::panic::Location;

use error_location::ErrorLocation;

/// Ordered record of store writes inside one paired mutation, carrying
/// the prior value of every updated entity so a mid-sequence failure can
/// be compensated. The store offers no multi-entity transaction, so this
/// is the relationship-integrity layer every cross-reference update goes
/// through.
///
/// Deletes are terminal: they cannot be compensated, so sequences order
/// them after every update.
pub(crate) struct PairedWrite<'a> {
    store: &'a dyn EntityStore,
    applied: Vec<Applied>,
}

enum Applied {
    Task(Task),
    Column(Column),
    Backlog(Backlog),
    Sprint(Sprint),
}

impl<'a> PairedWrite<'a> {
    pub fn new(store: &'a dyn EntityStore) -> Self {
        Self {
            store,
            applied: Vec::new(),
        }
    }

    pub async fn update_task(&mut self, before: Task, after: &Task) -> Result<(), StoreError> {
        self.store.update_task(after.id, after.clone()).await?;
        self.applied.push(Applied::Task(before));
        Ok(())
    }

    pub async fn update_column(
        &mut self,
        before: Column,
        after: &Column,
    ) -> Result<(), StoreError> {
        self.store.update_column(after.id, after.clone()).await?;
        self.applied.push(Applied::Column(before));
        Ok(())
    }

    pub async fn update_backlog(
        &mut self,
        before: Backlog,
        after: &Backlog,
    ) -> Result<(), StoreError> {
        self.store.update_backlog(after.id, after.clone()).await?;
        self.applied.push(Applied::Backlog(before));
        Ok(())
    }

    pub async fn update_sprint(
        &mut self,
        before: Sprint,
        after: &Sprint,
    ) -> Result<(), StoreError> {
        self.store.update_sprint(after.id, after.clone()).await?;
        self.applied.push(Applied::Sprint(before));
        Ok(())
    }

    pub async fn delete_task(&mut self, id: i64) -> Result<(), StoreError> {
        self.store.delete_task(id).await
    }

    pub async fn delete_backlog(&mut self, id: i64) -> Result<(), StoreError> {
        self.store.delete_backlog(id).await
    }

    pub async fn delete_sprint(&mut self, id: i64) -> Result<(), StoreError> {
        self.store.delete_sprint(id).await
    }

    /// Re-persist prior values in reverse order. Returns an error when
    /// the compensation itself fails and the collections may disagree
    /// until the next refetch.
    pub async fn rollback(self, ctx: &OpContext) -> EngineResult<()> {
        let Self { store, applied } = self;
        let mut failures = 0usize;

        for entry in applied.into_iter().rev() {
            let result = match entry {
                Applied::Task(task) => store.update_task(task.id, task).await.map(|_| ()),
                Applied::Column(column) => {
                    store.update_column(column.id, column).await.map(|_| ())
                }
                Applied::Backlog(backlog) => {
                    store.update_backlog(backlog.id, backlog).await.map(|_| ())
                }
                Applied::Sprint(sprint) => {
                    store.update_sprint(sprint.id, sprint).await.map(|_| ())
                }
            };

            if let Err(e) = result {
                failures += 1;
                log::warn!("{} compensation write failed: {}", ctx.log_prefix(), e);
            }
        }

        if failures > 0 {
            return Err(EngineError::Consistency {
                message: format!(
                    "{failures} compensating write(s) failed; collections may disagree until refetched"
                ),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(())
    }
}

/// Resolve a failed paired sequence: snap the local state back, undo the
/// already-applied store writes, and surface the right error. The
/// transport failure wins unless the compensation itself failed.
pub(crate) async fn fail_paired(
    state: &mut BoardState,
    snapshot: Snapshot,
    writes: PairedWrite<'_>,
    ctx: &OpContext,
    source: StoreError,
) -> EngineError {
    snapshot.restore(state);

    let transport = EngineError::from(source);
    match writes.rollback(ctx).await {
        Ok(()) => transport,
        Err(consistency) => {
            log::warn!(
                "{} original failure: {}; surfacing consistency error",
                ctx.log_prefix(),
                transport
            );
            consistency
        }
    }
}

/// Both sides of a sprint reassignment, planned against current state.
/// `old`/`new` hold (before, after) pairs for the sprints that change.
#[derive(Debug)]
pub(crate) struct SprintRelink {
    pub old: Option<(Sprint, Sprint)>,
    pub new: Option<(Sprint, Sprint)>,
}

/// Plan the task-id moves for reassigning `task_id` from `old_sprint`
/// to `new_sprint`. Validates that a non-null destination exists.
#[track_caller]
pub(crate) fn plan_sprint_relink(
    state: &BoardState,
    task_id: i64,
    old_sprint: Option<i64>,
    new_sprint: Option<i64>,
) -> EngineResult<SprintRelink> {
    let mut relink = SprintRelink {
        old: None,
        new: None,
    };

    if let Some(id) = new_sprint
        && state.sprint(id).is_none()
    {
        return Err(EngineError::Validation {
            message: format!("sprint {} does not exist", id),
            field: Some("sprint_id".to_string()),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    if old_sprint == new_sprint {
        return Ok(relink);
    }

    if let Some(id) = old_sprint
        && let Some(before) = state.sprint(id)
    {
        let mut after = before.clone();
        after.task_ids.retain(|t| *t != task_id);
        if after.task_ids != before.task_ids {
            relink.old = Some((before.clone(), after));
        }
    }

    if let Some(id) = new_sprint
        && let Some(before) = state.sprint(id)
        && !before.task_ids.contains(&task_id)
    {
        let mut after = before.clone();
        after.task_ids.push(task_id);
        relink.new = Some((before.clone(), after));
    }

    Ok(relink)
}

/// (before, after) pairs for every backlog that gains or loses a link to
/// `task_id` when its backlog set changes from `old_ids` to `new_ids`.
pub(crate) fn plan_backlog_relink(
    state: &BoardState,
    task_id: i64,
    old_ids: &[i64],
    new_ids: &[i64],
) -> Vec<(Backlog, Backlog)> {
    let mut pairs = Vec::new();

    for backlog in state.backlogs() {
        let was_linked = old_ids.contains(&backlog.id) || backlog.contains_task(task_id);
        let is_linked = new_ids.contains(&backlog.id);
        if was_linked == is_linked {
            continue;
        }

        let mut after = backlog.clone();
        if is_linked {
            after.task_ids.push(task_id);
        } else {
            after.task_ids.retain(|t| *t != task_id);
        }
        pairs.push((backlog.clone(), after));
    }

    pairs
}
