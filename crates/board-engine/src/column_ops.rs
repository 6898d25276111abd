use crate::linkage::{PairedWrite, fail_paired};
use crate::store_ops::store_write;
use crate::validator::{BoardValidator, sanitize_string};
use crate::{
    ChangeKind, Engine, EngineError, EntityKind, OpContext, Result as EngineResult, Snapshot,
};

use board_core::{Column, Task};
use board_store::StoreError;

use std::panic::Location;

use chrono::Utc;
use error_location::ErrorLocation;

/// Capability gating every column mutation. The engine only checks
/// membership; policy lives with the identity source.
pub const COLUMN_CREATE_CAPABILITY: &str = "column.create";

impl Engine {
    /// Create a column at the right edge of the board.
    pub async fn create_column(&self, ctx: &OpContext, name: &str) -> EngineResult<Column> {
        log::debug!("{} CreateColumn starting", ctx.log_prefix());

        ctx.require_capability(COLUMN_CREATE_CAPABILITY)?;

        let mut state = self.state.lock().await;

        let name = sanitize_string(name);
        BoardValidator::validate_column_name(&state, &name, None, &self.config.validation)?;

        let mut column = Column::new(self.project_id, name, 0);
        column.display_order = state.next_column_order(self.config.board.order_step);

        let created = store_write(ctx, "create_column", || async {
            self.store
                .create_column(column.clone())
                .await
                .map_err(Into::into)
        })
        .await?;

        state.upsert_column(created.clone());
        self.publish(ChangeKind::Created, EntityKind::Column, created.id);

        log::info!(
            "{} Created column {} {:?}",
            ctx.log_prefix(),
            created.id,
            created.name
        );

        Ok(created)
    }

    /// Rename a column, retargeting the status of every member task so
    /// the status-to-column correspondence survives the rename.
    pub async fn rename_column(
        &self,
        ctx: &OpContext,
        column_id: i64,
        new_name: &str,
    ) -> EngineResult<Column> {
        log::debug!("{} RenameColumn starting", ctx.log_prefix());

        ctx.require_capability(COLUMN_CREATE_CAPABILITY)?;

        let mut state = self.state.lock().await;

        let before = state.column(column_id).cloned().ok_or_else(|| {
            EngineError::NotFound {
                message: format!("column {} not found", column_id),
                location: ErrorLocation::from(Location::caller()),
            }
        })?;

        let new_name = sanitize_string(new_name);
        BoardValidator::validate_column_name(
            &state,
            &new_name,
            Some(column_id),
            &self.config.validation,
        )?;

        if new_name == before.name {
            return Ok(before);
        }

        let mut after = before.clone();
        after.name = new_name.clone();

        let task_pairs: Vec<(Task, Task)> = state
            .tasks_in_column(&before.name)
            .into_iter()
            .map(|t| {
                let mut a = t.clone();
                a.status = new_name.clone();
                a.updated_at = Utc::now();
                (t.clone(), a)
            })
            .collect();

        let mut snapshot = Snapshot::new();
        snapshot.capture_column(&state, column_id);
        for (b, _) in &task_pairs {
            snapshot.capture_task(&state, b.id);
        }

        state.upsert_column(after.clone());
        for (_, a) in &task_pairs {
            state.upsert_task(a.clone());
        }

        let mut writes = PairedWrite::new(self.store.as_ref());
        let result: Result<(), StoreError> = async {
            writes.update_column(before.clone(), &after).await?;
            for (b, a) in &task_pairs {
                writes.update_task(b.clone(), a).await?;
            }
            Ok(())
        }
        .await;

        if let Err(source) = result {
            return Err(fail_paired(&mut state, snapshot, writes, ctx, source).await);
        }

        self.publish(ChangeKind::Updated, EntityKind::Column, column_id);
        for (b, _) in &task_pairs {
            self.publish(ChangeKind::Updated, EntityKind::Task, b.id);
        }

        log::info!(
            "{} Renamed column {} {:?} -> {:?} ({} task(s) retargeted)",
            ctx.log_prefix(),
            column_id,
            before.name,
            after.name,
            task_pairs.len()
        );

        Ok(after)
    }

    /// Delete a column. Blocked while tasks remain unless `cascade` is
    /// set, in which case the member tasks are deleted first. Either
    /// way no task is left referencing the dead column's name.
    pub async fn delete_column(
        &self,
        ctx: &OpContext,
        column_id: i64,
        cascade: bool,
    ) -> EngineResult<()> {
        log::debug!("{} DeleteColumn starting", ctx.log_prefix());

        ctx.require_capability(COLUMN_CREATE_CAPABILITY)?;

        let mut state = self.state.lock().await;

        let column = state.column(column_id).cloned().ok_or_else(|| {
            EngineError::NotFound {
                message: format!("column {} not found", column_id),
                location: ErrorLocation::from(Location::caller()),
            }
        })?;

        let member_ids: Vec<i64> = state
            .tasks_in_column(&column.name)
            .iter()
            .map(|t| t.id)
            .collect();

        if !member_ids.is_empty() && !cascade {
            return Err(EngineError::DeleteBlocked {
                message: format!(
                    "column {:?} still contains {} task(s); move or delete them first",
                    column.name,
                    member_ids.len()
                ),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        // Cascade: each member is deleted as its own compensable unit,
        // so a mid-cascade failure leaves the column and the remaining
        // tasks intact and consistent.
        for task_id in member_ids {
            self.delete_task_inner(&mut state, ctx, task_id).await?;
        }

        store_write(ctx, "delete_column", || async {
            self.store.delete_column(column_id).await.map_err(Into::into)
        })
        .await?;

        state.remove_column(column_id);
        self.publish(ChangeKind::Deleted, EntityKind::Column, column_id);

        log::info!(
            "{} Deleted column {} {:?}",
            ctx.log_prefix(),
            column_id,
            column.name
        );

        Ok(())
    }
}
