use crate::cost::compute_total_cost;
use crate::field_change::{FieldChange, FieldChangeBuilder};
use crate::linkage::{PairedWrite, fail_paired, plan_backlog_relink, plan_sprint_relink};
use crate::notify::{NotificationKind, NotifyReport, notify_assignees};
use crate::store_ops::store_write;
use crate::validator::{BoardValidator, sanitize_string};
use crate::{
    BoardState, ChangeKind, Engine, EngineError, EntityKind, OpContext, Result as EngineResult,
    Snapshot,
};

use board_core::{Priority, Subtask, Task};
use board_store::StoreError;

use std::collections::HashSet;
use std::panic::Location;

use chrono::{DateTime, Utc};
use error_location::ErrorLocation;

/// Fields for a new task. Backlog and sprint links given here are
/// mirrored into the owning collections on create.
#[derive(Debug, Clone)]
pub struct TaskDraft {
    pub title: String,
    pub status: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub assigned_user_emails: Vec<String>,
    pub backlog_ids: Vec<i64>,
    pub sprint_id: Option<i64>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub subtasks: Vec<Subtask>,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            status: status.into(),
            description: None,
            priority: Priority::Medium,
            assigned_user_emails: Vec::new(),
            backlog_ids: Vec::new(),
            sprint_id: None,
            start_date: None,
            end_date: None,
            subtasks: Vec::new(),
        }
    }
}

/// Partial update for an existing task. `None` leaves a field alone;
/// nullable fields use a nested `Option` so `Some(None)` clears them.
/// Backlog links are edited through the backlog operations, not here.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub priority: Option<Priority>,
    pub status: Option<String>,
    pub assigned_user_emails: Option<Vec<String>>,
    pub sprint_id: Option<Option<i64>>,
    pub start_date: Option<Option<DateTime<Utc>>>,
    pub end_date: Option<Option<DateTime<Utc>>>,
    pub subtasks: Option<Vec<Subtask>>,
}

/// Result of a create or edit: the stored task, the field-level deltas
/// (empty on create), and how the notification fan-out went.
#[derive(Debug, Clone)]
pub struct TaskChange {
    pub task: Task,
    pub changes: Vec<FieldChange>,
    pub notifications: NotifyReport,
}

fn dedup_emails(emails: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    emails
        .into_iter()
        .map(|e| sanitize_string(&e))
        .filter(|e| seen.insert(e.clone()))
        .collect()
}

fn subtask_summary(subtasks: &[Subtask]) -> String {
    subtasks
        .iter()
        .map(|s| format!("{}:{}", s.title, s.completed))
        .collect::<Vec<_>>()
        .join("|")
}

/// Field-level diff of an edit. display_order and audit fields are not
/// user-meaningful and are not tracked.
fn track_task_changes(before: &Task, after: &Task) -> Vec<FieldChange> {
    let mut builder = FieldChangeBuilder::new();
    builder.track("title", &before.title, &after.title);
    builder.track_option("description", &before.description, &after.description);
    builder.track("priority", before.priority.as_str(), after.priority.as_str());
    builder.track("status", &before.status, &after.status);
    builder.track(
        "assigned_user_emails",
        &before.assigned_user_emails.join(","),
        &after.assigned_user_emails.join(","),
    );
    builder.track_option("sprint_id", &before.sprint_id, &after.sprint_id);
    builder.track_option(
        "start_date",
        &before.start_date.map(|d| d.to_rfc3339()),
        &after.start_date.map(|d| d.to_rfc3339()),
    );
    builder.track_option(
        "end_date",
        &before.end_date.map(|d| d.to_rfc3339()),
        &after.end_date.map(|d| d.to_rfc3339()),
    );
    builder.track(
        "subtasks",
        &subtask_summary(&before.subtasks),
        &subtask_summary(&after.subtasks),
    );
    builder.build()
}

impl Engine {
    /// Create a task. Validation failures never reach the store, and a
    /// store failure leaves no local trace, so the caller's in-progress
    /// form survives for a retry.
    pub async fn create_task(&self, ctx: &OpContext, draft: TaskDraft) -> EngineResult<TaskChange> {
        log::debug!("{} CreateTask starting", ctx.log_prefix());

        let mut state = self.state.lock().await;
        let validation = &self.config.validation;

        // 1. Validate input fields
        let title = sanitize_string(&draft.title);
        BoardValidator::validate_title(&title, validation)?;
        BoardValidator::validate_description(draft.description.as_deref(), validation)?;
        BoardValidator::validate_status_exists(&state, &draft.status)?;
        let emails = dedup_emails(draft.assigned_user_emails);
        BoardValidator::validate_assignees(&emails, validation)?;
        BoardValidator::validate_subtasks(&draft.subtasks, validation)?;
        BoardValidator::validate_date_range(draft.start_date, draft.end_date)?;

        // 2. Referenced backlogs and sprint must exist
        for backlog_id in &draft.backlog_ids {
            if state.backlog(*backlog_id).is_none() {
                return Err(EngineError::Validation {
                    message: format!("backlog {} does not exist", backlog_id),
                    field: Some("backlog_ids".to_string()),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        }
        if let Some(sprint_id) = draft.sprint_id
            && state.sprint(sprint_id).is_none()
        {
            return Err(EngineError::Validation {
                message: format!("sprint {} does not exist", sprint_id),
                field: Some("sprint_id".to_string()),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        // 3. Build the task
        let mut task = Task::new(self.project_id, title, draft.status.clone());
        task.description = draft.description.map(|d| sanitize_string(&d));
        task.priority = draft.priority;
        task.assigned_user_emails = emails;
        task.backlog_ids = {
            let mut seen = HashSet::new();
            draft
                .backlog_ids
                .into_iter()
                .filter(|id| seen.insert(*id))
                .collect()
        };
        task.sprint_id = draft.sprint_id;
        task.start_date = draft.start_date;
        task.end_date = draft.end_date;
        task.subtasks = draft.subtasks;
        task.display_order = state.next_display_order(&draft.status, self.config.board.order_step);
        task.total_cost = compute_total_cost(
            task.start_date,
            task.end_date,
            &task.assigned_user_emails,
            &self.directory,
        );

        // 4. Persist the task itself first
        let created = store_write(ctx, "create_task", || async {
            self.store.create_task(task.clone()).await.map_err(Into::into)
        })
        .await?;

        // 5. Mirror the links into the owning collections. If a mirror
        // write fails the fresh task is withdrawn so no dangling
        // reference survives.
        let relink = plan_sprint_relink(&state, created.id, None, created.sprint_id)?;
        let backlog_pairs = plan_backlog_relink(&state, created.id, &[], &created.backlog_ids);

        let mut writes = PairedWrite::new(self.store.as_ref());
        let result: Result<(), StoreError> = async {
            if let Some((before, after)) = &relink.new {
                writes.update_sprint(before.clone(), after).await?;
            }
            for (before, after) in &backlog_pairs {
                writes.update_backlog(before.clone(), after).await?;
            }
            Ok(())
        }
        .await;

        if let Err(source) = result {
            let rollback = writes.rollback(ctx).await;
            let withdraw = self.store.delete_task(created.id).await;
            if let Err(e) = &withdraw {
                log::warn!(
                    "{} failed to withdraw task {} after link failure: {}",
                    ctx.log_prefix(),
                    created.id,
                    e
                );
            }
            return Err(match (rollback, withdraw) {
                (Ok(()), Ok(())) => EngineError::from(source),
                _ => EngineError::Consistency {
                    message: format!(
                        "task {} could not be fully linked and was not cleanly withdrawn",
                        created.id
                    ),
                    location: ErrorLocation::from(Location::caller()),
                },
            });
        }

        // 6. Commit locally and publish
        state.upsert_task(created.clone());
        if let Some((_, after)) = relink.new {
            let sprint_id = after.id;
            state.upsert_sprint(after);
            self.publish(ChangeKind::Updated, EntityKind::Sprint, sprint_id);
        }
        for (_, after) in backlog_pairs {
            let backlog_id = after.id;
            state.upsert_backlog(after);
            self.publish(ChangeKind::Updated, EntityKind::Backlog, backlog_id);
        }
        self.publish(ChangeKind::Created, EntityKind::Task, created.id);

        // 7. Notify every assignee except the acting user
        let message = format!("You have been assigned to task {:?}", created.title);
        let notifications = notify_assignees(
            self.dispatcher.as_ref(),
            &self.directory,
            ctx,
            &created.assigned_user_emails,
            NotificationKind::TaskAssigned,
            &message,
            EntityKind::Task,
            created.id,
        )
        .await;

        log::info!(
            "{} Created task {} in column {:?}",
            ctx.log_prefix(),
            created.id,
            created.status
        );

        Ok(TaskChange {
            task: created,
            changes: Vec::new(),
            notifications,
        })
    }

    /// Edit a task. A sprint reassignment keeps both sprints' task lists
    /// in step and notifies assignees distinctly from a plain update; a
    /// no-op patch issues no store calls at all.
    pub async fn edit_task(
        &self,
        ctx: &OpContext,
        task_id: i64,
        patch: TaskPatch,
    ) -> EngineResult<TaskChange> {
        log::debug!("{} EditTask starting", ctx.log_prefix());

        let mut state = self.state.lock().await;
        let validation = &self.config.validation;

        let before = state.task(task_id).cloned().ok_or_else(|| {
            EngineError::NotFound {
                message: format!("task {} not found", task_id),
                location: ErrorLocation::from(Location::caller()),
            }
        })?;

        // 1. Apply the patch to a copy
        let mut after = before.clone();
        if let Some(title) = patch.title {
            after.title = sanitize_string(&title);
        }
        if let Some(description) = patch.description {
            after.description = description.map(|d| sanitize_string(&d));
        }
        if let Some(priority) = patch.priority {
            after.priority = priority;
        }
        if let Some(status) = patch.status {
            after.status = status;
        }
        if let Some(emails) = patch.assigned_user_emails {
            after.assigned_user_emails = dedup_emails(emails);
        }
        if let Some(sprint_id) = patch.sprint_id {
            after.sprint_id = sprint_id;
        }
        if let Some(start_date) = patch.start_date {
            after.start_date = start_date;
        }
        if let Some(end_date) = patch.end_date {
            after.end_date = end_date;
        }
        if let Some(subtasks) = patch.subtasks {
            after.subtasks = subtasks;
        }

        // 2. No-op edits never reach the store
        let changes = track_task_changes(&before, &after);
        if changes.is_empty() {
            return Ok(TaskChange {
                task: before,
                changes,
                notifications: NotifyReport::default(),
            });
        }

        // 3. Validate the patched result
        BoardValidator::validate_title(&after.title, validation)?;
        BoardValidator::validate_description(after.description.as_deref(), validation)?;
        BoardValidator::validate_status_exists(&state, &after.status)?;
        BoardValidator::validate_assignees(&after.assigned_user_emails, validation)?;
        BoardValidator::validate_subtasks(&after.subtasks, validation)?;
        BoardValidator::validate_date_range(after.start_date, after.end_date)?;

        // 4. Derived fields
        let assignment_changed = before.assigned_user_emails != after.assigned_user_emails
            || before.start_date != after.start_date
            || before.end_date != after.end_date;
        if assignment_changed {
            after.total_cost = compute_total_cost(
                after.start_date,
                after.end_date,
                &after.assigned_user_emails,
                &self.directory,
            );
        }
        if before.status != after.status {
            after.display_order =
                state.next_display_order(&after.status, self.config.board.order_step);
        }
        after.updated_at = Utc::now();

        let sprint_changed = before.sprint_id != after.sprint_id;

        // 5. Persist, pairing the sprint mirrors with the task update
        let relink = plan_sprint_relink(&state, task_id, before.sprint_id, after.sprint_id)?;

        let mut snapshot = Snapshot::new();
        snapshot.capture_task(&state, task_id);
        if let Some((b, _)) = &relink.old {
            snapshot.capture_sprint(&state, b.id);
        }
        if let Some((b, _)) = &relink.new {
            snapshot.capture_sprint(&state, b.id);
        }

        state.upsert_task(after.clone());
        if let Some((_, a)) = &relink.old {
            state.upsert_sprint(a.clone());
        }
        if let Some((_, a)) = &relink.new {
            state.upsert_sprint(a.clone());
        }

        let mut writes = PairedWrite::new(self.store.as_ref());
        let result: Result<(), StoreError> = async {
            writes.update_task(before.clone(), &after).await?;
            if let Some((b, a)) = &relink.old {
                writes.update_sprint(b.clone(), a).await?;
            }
            if let Some((b, a)) = &relink.new {
                writes.update_sprint(b.clone(), a).await?;
            }
            Ok(())
        }
        .await;

        if let Err(source) = result {
            return Err(fail_paired(&mut state, snapshot, writes, ctx, source).await);
        }

        // 6. Publish
        self.publish(ChangeKind::Updated, EntityKind::Task, task_id);
        if let Some((b, _)) = &relink.old {
            self.publish(ChangeKind::Updated, EntityKind::Sprint, b.id);
        }
        if let Some((b, _)) = &relink.new {
            self.publish(ChangeKind::Updated, EntityKind::Sprint, b.id);
        }

        // 7. Notifications: a sprint change is its own message, distinct
        // from the plain task-updated one
        let mut notifications = NotifyReport::default();
        if sprint_changed {
            let message = match after.sprint_id {
                Some(id) => {
                    let name = state
                        .sprint(id)
                        .map(|s| s.name.clone())
                        .unwrap_or_else(|| format!("#{id}"));
                    format!("Task {:?} was moved to sprint {:?}", after.title, name)
                }
                None => format!("Task {:?} was removed from its sprint", after.title),
            };
            notifications = notifications.merged(
                notify_assignees(
                    self.dispatcher.as_ref(),
                    &self.directory,
                    ctx,
                    &after.assigned_user_emails,
                    NotificationKind::SprintChanged,
                    &message,
                    EntityKind::Task,
                    task_id,
                )
                .await,
            );
        }
        if changes.iter().any(|c| c.field_name != "sprint_id") {
            let message = format!("Task {:?} was updated", after.title);
            notifications = notifications.merged(
                notify_assignees(
                    self.dispatcher.as_ref(),
                    &self.directory,
                    ctx,
                    &after.assigned_user_emails,
                    NotificationKind::TaskUpdated,
                    &message,
                    EntityKind::Task,
                    task_id,
                )
                .await,
            );
        }

        log::info!(
            "{} Updated task {} ({} field(s))",
            ctx.log_prefix(),
            task_id,
            changes.len()
        );

        Ok(TaskChange {
            task: after,
            changes,
            notifications,
        })
    }

    /// Delete a task, unlinking it from every backlog and sprint that
    /// references it so no collection keeps a dangling id.
    pub async fn delete_task(&self, ctx: &OpContext, task_id: i64) -> EngineResult<()> {
        let mut state = self.state.lock().await;
        self.delete_task_inner(&mut state, ctx, task_id).await
    }

    pub(crate) async fn delete_task_inner(
        &self,
        state: &mut BoardState,
        ctx: &OpContext,
        task_id: i64,
    ) -> EngineResult<()> {
        log::debug!("{} DeleteTask starting", ctx.log_prefix());

        let task = state.task(task_id).cloned().ok_or_else(|| {
            EngineError::NotFound {
                message: format!("task {} not found", task_id),
                location: ErrorLocation::from(Location::caller()),
            }
        })?;

        // Unlink from every sprint and backlog that references the task,
        // tolerating mirrors that were already asymmetric
        let sprint_pairs: Vec<_> = state
            .sprints()
            .filter(|s| s.contains_task(task_id))
            .map(|s| {
                let mut a = s.clone();
                a.task_ids.retain(|t| *t != task_id);
                (s.clone(), a)
            })
            .collect();
        let backlog_pairs = plan_backlog_relink(state, task_id, &task.backlog_ids, &[]);

        let mut snapshot = Snapshot::new();
        snapshot.capture_task(state, task_id);
        for (b, _) in &sprint_pairs {
            snapshot.capture_sprint(state, b.id);
        }
        for (b, _) in &backlog_pairs {
            snapshot.capture_backlog(state, b.id);
        }

        state.remove_task(task_id);
        for (_, a) in &sprint_pairs {
            state.upsert_sprint(a.clone());
        }
        for (_, a) in &backlog_pairs {
            state.upsert_backlog(a.clone());
        }

        // Mirror updates are compensable; the delete goes last
        let mut writes = PairedWrite::new(self.store.as_ref());
        let result: Result<(), StoreError> = async {
            for (b, a) in &sprint_pairs {
                writes.update_sprint(b.clone(), a).await?;
            }
            for (b, a) in &backlog_pairs {
                writes.update_backlog(b.clone(), a).await?;
            }
            writes.delete_task(task_id).await?;
            Ok(())
        }
        .await;

        if let Err(source) = result {
            return Err(fail_paired(state, snapshot, writes, ctx, source).await);
        }

        for (b, _) in &sprint_pairs {
            self.publish(ChangeKind::Updated, EntityKind::Sprint, b.id);
        }
        for (b, _) in &backlog_pairs {
            self.publish(ChangeKind::Updated, EntityKind::Backlog, b.id);
        }
        self.publish(ChangeKind::Deleted, EntityKind::Task, task_id);

        log::info!("{} Deleted task {}", ctx.log_prefix(), task_id);

        Ok(())
    }
}
