use crate::lifecycle::{TaskChange, TaskPatch};
use crate::linkage::{PairedWrite, fail_paired};
use crate::store_ops::store_write;
use crate::validator::{BoardValidator, sanitize_string};
use crate::{
    ChangeKind, Engine, EngineError, EntityKind, OpContext, Result as EngineResult, Snapshot,
};

use board_core::{Sprint, Task};
use board_store::StoreError;

use std::panic::Location;

use chrono::{DateTime, Utc};
use error_location::ErrorLocation;

/// Partial update for a sprint.
#[derive(Debug, Clone, Default)]
pub struct SprintPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl Engine {
    /// Create a sprint. Names are unique per project and the end date
    /// must follow the start date.
    pub async fn create_sprint(
        &self,
        ctx: &OpContext,
        name: &str,
        description: Option<String>,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> EngineResult<Sprint> {
        log::debug!("{} CreateSprint starting", ctx.log_prefix());

        let mut state = self.state.lock().await;

        let name = sanitize_string(name);
        BoardValidator::validate_sprint(
            &state,
            &name,
            start_date,
            end_date,
            None,
            &self.config.validation,
        )?;
        BoardValidator::validate_description(description.as_deref(), &self.config.validation)?;

        let sprint = Sprint::new(
            self.project_id,
            name,
            description.map(|d| sanitize_string(&d)),
            start_date,
            end_date,
        );

        let created = store_write(ctx, "create_sprint", || async {
            self.store
                .create_sprint(sprint.clone())
                .await
                .map_err(Into::into)
        })
        .await?;

        state.upsert_sprint(created.clone());
        self.publish(ChangeKind::Created, EntityKind::Sprint, created.id);

        log::info!(
            "{} Created sprint {} {:?}",
            ctx.log_prefix(),
            created.id,
            created.name
        );

        Ok(created)
    }

    pub async fn edit_sprint(
        &self,
        ctx: &OpContext,
        sprint_id: i64,
        patch: SprintPatch,
    ) -> EngineResult<Sprint> {
        log::debug!("{} EditSprint starting", ctx.log_prefix());

        let mut state = self.state.lock().await;

        let before = state.sprint(sprint_id).cloned().ok_or_else(|| {
            EngineError::NotFound {
                message: format!("sprint {} not found", sprint_id),
                location: ErrorLocation::from(Location::caller()),
            }
        })?;

        let mut after = before.clone();
        if let Some(name) = patch.name {
            after.name = sanitize_string(&name);
        }
        if let Some(description) = patch.description {
            after.description = description.map(|d| sanitize_string(&d));
        }
        if let Some(start_date) = patch.start_date {
            after.start_date = start_date;
        }
        if let Some(end_date) = patch.end_date {
            after.end_date = end_date;
        }

        if after == before {
            return Ok(before);
        }

        BoardValidator::validate_sprint(
            &state,
            &after.name,
            after.start_date,
            after.end_date,
            Some(sprint_id),
            &self.config.validation,
        )?;
        BoardValidator::validate_description(after.description.as_deref(), &self.config.validation)?;

        let updated = store_write(ctx, "update_sprint", || async {
            self.store
                .update_sprint(sprint_id, after.clone())
                .await
                .map_err(Into::into)
        })
        .await?;

        state.upsert_sprint(updated.clone());
        self.publish(ChangeKind::Updated, EntityKind::Sprint, sprint_id);

        Ok(updated)
    }

    /// Delete a sprint, releasing its member tasks back to no sprint.
    pub async fn delete_sprint(&self, ctx: &OpContext, sprint_id: i64) -> EngineResult<()> {
        log::debug!("{} DeleteSprint starting", ctx.log_prefix());

        let mut state = self.state.lock().await;

        let sprint = state.sprint(sprint_id).cloned().ok_or_else(|| {
            EngineError::NotFound {
                message: format!("sprint {} not found", sprint_id),
                location: ErrorLocation::from(Location::caller()),
            }
        })?;

        // Tasks referencing the sprint from either side of the mirror
        let task_pairs: Vec<(Task, Task)> = state
            .tasks()
            .filter(|t| t.is_in_sprint(sprint_id) || sprint.contains_task(t.id))
            .map(|t| {
                let mut a = t.clone();
                if a.sprint_id == Some(sprint_id) {
                    a.sprint_id = None;
                }
                (t.clone(), a)
            })
            .filter(|(b, a)| b != a)
            .collect();

        let mut snapshot = Snapshot::new();
        snapshot.capture_sprint(&state, sprint_id);
        for (b, _) in &task_pairs {
            snapshot.capture_task(&state, b.id);
        }

        state.remove_sprint(sprint_id);
        for (_, a) in &task_pairs {
            state.upsert_task(a.clone());
        }

        let mut writes = PairedWrite::new(self.store.as_ref());
        let result: Result<(), StoreError> = async {
            for (b, a) in &task_pairs {
                writes.update_task(b.clone(), a).await?;
            }
            writes.delete_sprint(sprint_id).await?;
            Ok(())
        }
        .await;

        if let Err(source) = result {
            return Err(fail_paired(&mut state, snapshot, writes, ctx, source).await);
        }

        for (b, _) in &task_pairs {
            self.publish(ChangeKind::Updated, EntityKind::Task, b.id);
        }
        self.publish(ChangeKind::Deleted, EntityKind::Sprint, sprint_id);

        log::info!(
            "{} Deleted sprint {} ({} task(s) released)",
            ctx.log_prefix(),
            sprint_id,
            task_pairs.len()
        );

        Ok(())
    }

    /// Manually reassign a task to a sprint (or to none). Delegates to
    /// the edit path so mirrors and sprint-change notifications follow.
    pub async fn assign_task_to_sprint(
        &self,
        ctx: &OpContext,
        task_id: i64,
        sprint_id: Option<i64>,
    ) -> EngineResult<TaskChange> {
        self.edit_task(
            ctx,
            task_id,
            TaskPatch {
                sprint_id: Some(sprint_id),
                ..TaskPatch::default()
            },
        )
        .await
    }
}
