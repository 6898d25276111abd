use crate::linkage::{PairedWrite, fail_paired};
use crate::store_ops::store_write;
use crate::validator::{BoardValidator, sanitize_string};
use crate::{
    BoardState, ChangeKind, Engine, EngineError, EntityKind, OpContext, Result as EngineResult,
    Snapshot,
};

use board_core::{Backlog, Task};
use board_store::StoreError;

use std::panic::Location;

use error_location::ErrorLocation;

impl Engine {
    pub async fn create_backlog(
        &self,
        ctx: &OpContext,
        name: &str,
        description: Option<String>,
    ) -> EngineResult<Backlog> {
        log::debug!("{} CreateBacklog starting", ctx.log_prefix());

        let mut state = self.state.lock().await;

        let name = sanitize_string(name);
        BoardValidator::validate_backlog_name(&name, &self.config.validation)?;
        BoardValidator::validate_description(description.as_deref(), &self.config.validation)?;

        let backlog = Backlog::new(
            self.project_id,
            name,
            description.map(|d| sanitize_string(&d)),
        );

        let created = store_write(ctx, "create_backlog", || async {
            self.store
                .create_backlog(backlog.clone())
                .await
                .map_err(Into::into)
        })
        .await?;

        state.upsert_backlog(created.clone());
        self.publish(ChangeKind::Created, EntityKind::Backlog, created.id);

        log::info!(
            "{} Created backlog {} {:?}",
            ctx.log_prefix(),
            created.id,
            created.name
        );

        Ok(created)
    }

    pub async fn edit_backlog(
        &self,
        ctx: &OpContext,
        backlog_id: i64,
        name: Option<String>,
        description: Option<Option<String>>,
    ) -> EngineResult<Backlog> {
        log::debug!("{} EditBacklog starting", ctx.log_prefix());

        let mut state = self.state.lock().await;

        let before = state.backlog(backlog_id).cloned().ok_or_else(|| {
            EngineError::NotFound {
                message: format!("backlog {} not found", backlog_id),
                location: ErrorLocation::from(Location::caller()),
            }
        })?;

        let mut after = before.clone();
        if let Some(name) = name {
            after.name = sanitize_string(&name);
        }
        if let Some(description) = description {
            after.description = description.map(|d| sanitize_string(&d));
        }

        if after == before {
            return Ok(before);
        }

        BoardValidator::validate_backlog_name(&after.name, &self.config.validation)?;
        BoardValidator::validate_description(after.description.as_deref(), &self.config.validation)?;

        let updated = store_write(ctx, "update_backlog", || async {
            self.store
                .update_backlog(backlog_id, after.clone())
                .await
                .map_err(Into::into)
        })
        .await?;

        state.upsert_backlog(updated.clone());
        self.publish(ChangeKind::Updated, EntityKind::Backlog, backlog_id);

        Ok(updated)
    }

    /// Delete a backlog. Member tasks survive: the dead backlog id is
    /// removed from each task's links, never cascaded into deletion.
    pub async fn delete_backlog(&self, ctx: &OpContext, backlog_id: i64) -> EngineResult<()> {
        log::debug!("{} DeleteBacklog starting", ctx.log_prefix());

        let mut state = self.state.lock().await;

        let backlog = state.backlog(backlog_id).cloned().ok_or_else(|| {
            EngineError::NotFound {
                message: format!("backlog {} not found", backlog_id),
                location: ErrorLocation::from(Location::caller()),
            }
        })?;

        // Tasks referencing the backlog from either side of the mirror
        let task_pairs: Vec<(Task, Task)> = state
            .tasks()
            .filter(|t| t.is_linked_to_backlog(backlog_id) || backlog.contains_task(t.id))
            .map(|t| {
                let mut a = t.clone();
                a.backlog_ids.retain(|id| *id != backlog_id);
                (t.clone(), a)
            })
            .filter(|(b, a)| b != a)
            .collect();

        let mut snapshot = Snapshot::new();
        snapshot.capture_backlog(&state, backlog_id);
        for (b, _) in &task_pairs {
            snapshot.capture_task(&state, b.id);
        }

        state.remove_backlog(backlog_id);
        for (_, a) in &task_pairs {
            state.upsert_task(a.clone());
        }

        let mut writes = PairedWrite::new(self.store.as_ref());
        let result: Result<(), StoreError> = async {
            for (b, a) in &task_pairs {
                writes.update_task(b.clone(), a).await?;
            }
            writes.delete_backlog(backlog_id).await?;
            Ok(())
        }
        .await;

        if let Err(source) = result {
            return Err(fail_paired(&mut state, snapshot, writes, ctx, source).await);
        }

        for (b, _) in &task_pairs {
            self.publish(ChangeKind::Updated, EntityKind::Task, b.id);
        }
        self.publish(ChangeKind::Deleted, EntityKind::Backlog, backlog_id);

        log::info!(
            "{} Deleted backlog {} ({} task(s) unlinked)",
            ctx.log_prefix(),
            backlog_id,
            task_pairs.len()
        );

        Ok(())
    }

    /// Link a task into a backlog, updating both sides of the mirror.
    /// Linking twice is a no-op.
    pub async fn link_task_to_backlog(
        &self,
        ctx: &OpContext,
        task_id: i64,
        backlog_id: i64,
    ) -> EngineResult<()> {
        let mut state = self.state.lock().await;
        self.relink_backlog(&mut state, ctx, task_id, backlog_id, true)
            .await
    }

    /// Remove a task's link to a backlog, updating both sides of the
    /// mirror. Unlinking an unlinked task is a no-op.
    pub async fn unlink_task_from_backlog(
        &self,
        ctx: &OpContext,
        task_id: i64,
        backlog_id: i64,
    ) -> EngineResult<()> {
        let mut state = self.state.lock().await;
        self.relink_backlog(&mut state, ctx, task_id, backlog_id, false)
            .await
    }

    async fn relink_backlog(
        &self,
        state: &mut BoardState,
        ctx: &OpContext,
        task_id: i64,
        backlog_id: i64,
        link: bool,
    ) -> EngineResult<()> {
        let task_before = state.task(task_id).cloned().ok_or_else(|| {
            EngineError::NotFound {
                message: format!("task {} not found", task_id),
                location: ErrorLocation::from(Location::caller()),
            }
        })?;
        let backlog_before = state.backlog(backlog_id).cloned().ok_or_else(|| {
            EngineError::NotFound {
                message: format!("backlog {} not found", backlog_id),
                location: ErrorLocation::from(Location::caller()),
            }
        })?;

        let mut task_after = task_before.clone();
        let mut backlog_after = backlog_before.clone();
        if link {
            if !task_after.backlog_ids.contains(&backlog_id) {
                task_after.backlog_ids.push(backlog_id);
            }
            if !backlog_after.task_ids.contains(&task_id) {
                backlog_after.task_ids.push(task_id);
            }
        } else {
            task_after.backlog_ids.retain(|id| *id != backlog_id);
            backlog_after.task_ids.retain(|id| *id != task_id);
        }

        if task_after == task_before && backlog_after == backlog_before {
            return Ok(());
        }

        let mut snapshot = Snapshot::new();
        snapshot.capture_task(state, task_id);
        snapshot.capture_backlog(state, backlog_id);

        state.upsert_task(task_after.clone());
        state.upsert_backlog(backlog_after.clone());

        let mut writes = PairedWrite::new(self.store.as_ref());
        let result: Result<(), StoreError> = async {
            if task_after != task_before {
                writes.update_task(task_before.clone(), &task_after).await?;
            }
            if backlog_after != backlog_before {
                writes
                    .update_backlog(backlog_before.clone(), &backlog_after)
                    .await?;
            }
            Ok(())
        }
        .await;

        if let Err(source) = result {
            return Err(fail_paired(state, snapshot, writes, ctx, source).await);
        }

        self.publish(ChangeKind::Updated, EntityKind::Task, task_id);
        self.publish(ChangeKind::Updated, EntityKind::Backlog, backlog_id);

        log::info!(
            "{} {} task {} {} backlog {}",
            ctx.log_prefix(),
            if link { "Linked" } else { "Unlinked" },
            task_id,
            if link { "into" } else { "from" },
            backlog_id
        );

        Ok(())
    }
}
