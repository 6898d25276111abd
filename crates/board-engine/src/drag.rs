use crate::linkage::{PairedWrite, fail_paired};
use crate::{
    BoardState, ChangeKind, Engine, EntityKind, OpContext, Result as EngineResult, Snapshot,
};

use board_core::Task;
use board_store::StoreError;

use chrono::Utc;

/// One endpoint of a drag gesture, as resolved by the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragId {
    Task(i64),
    Column(i64),
}

/// A completed drag gesture: what was picked up and what it was dropped
/// on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragEvent {
    pub active: DragId,
    pub over: DragId,
}

/// The three mutations a drop can mean. `insert_at` is the drop index in
/// the destination column's current task list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragTransition {
    ReorderWithinColumn {
        task_id: i64,
        column: String,
        insert_at: usize,
    },
    MoveAcrossColumns {
        task_id: i64,
        to_column: String,
        insert_at: usize,
    },
    ReorderColumns {
        active: i64,
        over: i64,
    },
}

/// Interpret a drop against current state. `None` means no-op: same
/// endpoint twice, an unresolvable id, or a drop that changes nothing.
pub fn resolve_transition(state: &BoardState, event: DragEvent) -> Option<DragTransition> {
    if event.active == event.over {
        return None;
    }

    match (event.active, event.over) {
        (DragId::Task(active_id), DragId::Task(over_id)) => {
            let active = state.task(active_id)?;
            let over = state.task(over_id)?;
            let insert_at = state
                .tasks_in_column(&over.status)
                .iter()
                .position(|t| t.id == over_id)?;

            if active.status == over.status {
                Some(DragTransition::ReorderWithinColumn {
                    task_id: active_id,
                    column: over.status.clone(),
                    insert_at,
                })
            } else {
                Some(DragTransition::MoveAcrossColumns {
                    task_id: active_id,
                    to_column: over.status.clone(),
                    insert_at,
                })
            }
        }
        (DragId::Task(active_id), DragId::Column(column_id)) => {
            let active = state.task(active_id)?;
            let column = state.column(column_id)?;
            let insert_at = state.tasks_in_column(&column.name).len();

            if active.status == column.name {
                Some(DragTransition::ReorderWithinColumn {
                    task_id: active_id,
                    column: column.name.clone(),
                    insert_at,
                })
            } else {
                Some(DragTransition::MoveAcrossColumns {
                    task_id: active_id,
                    to_column: column.name.clone(),
                    insert_at,
                })
            }
        }
        (DragId::Column(active_id), DragId::Column(over_id)) => {
            state.column(active_id)?;
            state.column(over_id)?;
            Some(DragTransition::ReorderColumns {
                active: active_id,
                over: over_id,
            })
        }
        // A column dropped on a task resolves to nothing
        (DragId::Column(_), DragId::Task(_)) => None,
    }
}

/// Remove `moved` and re-insert it at `insert_at` (clamped).
fn reorder_ids(mut ids: Vec<i64>, moved: i64, insert_at: usize) -> Vec<i64> {
    ids.retain(|id| *id != moved);
    let at = insert_at.min(ids.len());
    ids.insert(at, moved);
    ids
}

impl Engine {
    /// Apply a drag gesture. Returns the transition that was applied, or
    /// `None` when the gesture resolved to a no-op.
    ///
    /// The mutation is applied to the local board immediately and
    /// confirmed against the store; a store failure snaps the board back
    /// to its pre-drag state before the error is returned.
    pub async fn handle_drag(
        &self,
        ctx: &OpContext,
        event: DragEvent,
    ) -> EngineResult<Option<DragTransition>> {
        let mut state = self.state.lock().await;

        let Some(transition) = resolve_transition(&state, event) else {
            log::debug!("{} drag ignored: {:?}", ctx.log_prefix(), event);
            return Ok(None);
        };

        match &transition {
            DragTransition::ReorderWithinColumn {
                task_id,
                column,
                insert_at,
            } => {
                self.apply_task_drop(&mut state, ctx, *task_id, column, *insert_at, false)
                    .await?;
            }
            DragTransition::MoveAcrossColumns {
                task_id,
                to_column,
                insert_at,
            } => {
                self.apply_task_drop(&mut state, ctx, *task_id, to_column, *insert_at, true)
                    .await?;
            }
            DragTransition::ReorderColumns { active, over } => {
                self.apply_column_swap(&mut state, ctx, *active, *over).await?;
            }
        }

        Ok(Some(transition))
    }

    /// Place `task_id` at `insert_at` within `dest_column`, renumbering
    /// the column. Only display orders change, plus the status of the
    /// moved task when the drop crossed columns. Sprint and backlog
    /// membership are never touched by a drag.
    async fn apply_task_drop(
        &self,
        state: &mut BoardState,
        ctx: &OpContext,
        task_id: i64,
        dest_column: &str,
        insert_at: usize,
        crossed_columns: bool,
    ) -> EngineResult<()> {
        let step = self.config.board.order_step;

        let current_ids: Vec<i64> = state
            .tasks_in_column(dest_column)
            .iter()
            .map(|t| t.id)
            .collect();
        let ordered = reorder_ids(current_ids, task_id, insert_at);

        // Collect the tasks whose persisted fields actually change
        let mut changed: Vec<(Task, Task)> = Vec::new();
        for (index, id) in ordered.iter().enumerate() {
            let Some(before) = state.task(*id) else {
                continue;
            };
            let new_order = (index as i64 + 1) * step;

            let mut after = before.clone();
            after.display_order = new_order;
            if *id == task_id && crossed_columns {
                after.status = dest_column.to_string();
            }
            if after != *before {
                after.updated_at = Utc::now();
                changed.push((before.clone(), after));
            }
        }

        if changed.is_empty() {
            return Ok(());
        }

        // Optimistic: snapshot, mutate locally, then confirm
        let mut snapshot = Snapshot::new();
        for (before, _) in &changed {
            snapshot.capture_task(state, before.id);
        }
        for (_, after) in &changed {
            state.upsert_task(after.clone());
        }

        let mut writes = PairedWrite::new(self.store.as_ref());
        let result: Result<(), StoreError> = async {
            for (before, after) in &changed {
                writes.update_task(before.clone(), after).await?;
            }
            Ok(())
        }
        .await;

        if let Err(source) = result {
            return Err(fail_paired(state, snapshot, writes, ctx, source).await);
        }

        for (_, after) in &changed {
            self.publish(ChangeKind::Updated, EntityKind::Task, after.id);
        }

        log::info!(
            "{} dropped task {} into {:?} at index {} ({} task(s) renumbered)",
            ctx.log_prefix(),
            task_id,
            dest_column,
            insert_at,
            changed.len()
        );

        Ok(())
    }

    /// Swap the display orders of two columns.
    async fn apply_column_swap(
        &self,
        state: &mut BoardState,
        ctx: &OpContext,
        active_id: i64,
        over_id: i64,
    ) -> EngineResult<()> {
        let (Some(active), Some(over)) = (state.column(active_id), state.column(over_id)) else {
            return Ok(());
        };

        let mut active_after = active.clone();
        let mut over_after = over.clone();
        std::mem::swap(
            &mut active_after.display_order,
            &mut over_after.display_order,
        );
        let active_before = active.clone();
        let over_before = over.clone();

        let mut snapshot = Snapshot::new();
        snapshot.capture_column(state, active_id);
        snapshot.capture_column(state, over_id);
        state.upsert_column(active_after.clone());
        state.upsert_column(over_after.clone());

        let mut writes = PairedWrite::new(self.store.as_ref());
        let result: Result<(), StoreError> = async {
            writes.update_column(active_before, &active_after).await?;
            writes.update_column(over_before, &over_after).await?;
            Ok(())
        }
        .await;

        if let Err(source) = result {
            return Err(fail_paired(state, snapshot, writes, ctx, source).await);
        }

        self.publish(ChangeKind::Updated, EntityKind::Column, active_id);
        self.publish(ChangeKind::Updated, EntityKind::Column, over_id);

        log::info!(
            "{} swapped column order: {} <-> {}",
            ctx.log_prefix(),
            active_id,
            over_id
        );

        Ok(())
    }
}
