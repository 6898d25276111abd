use crate::linkage::{PairedWrite, fail_paired, plan_sprint_relink};
use crate::notify::{NotificationKind, NotifyReport, notify_assignees};
use crate::{
    BoardState, ChangeKind, Engine, EntityKind, OpContext, Result as EngineResult, Snapshot,
};

use board_core::Task;
use board_store::StoreError;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One task moved forward by a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MigratedTask {
    pub task_id: i64,
    pub from_sprint: i64,
    pub to_sprint: i64,
}

/// What a sweep run did.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SweepReport {
    pub migrated: Vec<MigratedTask>,
    pub notifications: NotifyReport,
}

impl Engine {
    /// Migrate every unfinished task out of overdue sprints into the
    /// next upcoming sprint.
    ///
    /// Idempotent: a migrated task belongs to the destination sprint,
    /// which is not itself overdue until its own end date passes, so an
    /// immediate second run migrates nothing. With no upcoming sprint
    /// there is no destination and the sweep aborts without touching
    /// anything.
    pub async fn run_sweep(
        &self,
        ctx: &OpContext,
        now: DateTime<Utc>,
    ) -> EngineResult<SweepReport> {
        let mut state = self.state.lock().await;
        let terminal = self.config.board.terminal_status.clone();

        // 1. Overdue sprints
        let mut overdue: Vec<i64> = state
            .sprints()
            .filter(|s| s.is_overdue(now))
            .map(|s| s.id)
            .collect();
        overdue.sort_unstable();
        if overdue.is_empty() {
            return Ok(SweepReport::default());
        }

        // 2. Destination: the earliest not-yet-started sprint
        let next_id = state
            .sprints()
            .filter(|s| s.is_upcoming(now))
            .min_by_key(|s| (s.start_date, s.id))
            .map(|s| s.id);
        let Some(next_id) = next_id else {
            log::debug!(
                "{} sweep aborted: {} overdue sprint(s) but no upcoming sprint",
                ctx.log_prefix(),
                overdue.len()
            );
            return Ok(SweepReport::default());
        };

        let mut report = SweepReport::default();

        // 3. Migrate each unfinished member task
        for sprint_id in overdue {
            let member_ids = match state.sprint(sprint_id) {
                Some(sprint) => sprint.task_ids.clone(),
                None => continue,
            };

            for task_id in member_ids {
                let Some(task) = state.task(task_id).cloned() else {
                    // Dangling id in the sprint mirror; tolerated
                    continue;
                };
                if task.status == terminal {
                    continue;
                }
                if task.sprint_id != Some(sprint_id) {
                    // Mirror was asymmetric; the task side wins
                    continue;
                }

                let notifications = self
                    .migrate_task(&mut state, ctx, task, sprint_id, next_id)
                    .await?;

                report.migrated.push(MigratedTask {
                    task_id,
                    from_sprint: sprint_id,
                    to_sprint: next_id,
                });
                report.notifications = report.notifications.merged(notifications);
            }
        }

        if !report.migrated.is_empty() {
            log::info!(
                "{} sweep migrated {} task(s) into sprint {}",
                ctx.log_prefix(),
                report.migrated.len(),
                next_id
            );
        }

        Ok(report)
    }

    /// Move one task between sprints, recording the sprint it overflowed
    /// from and notifying its assignees once.
    async fn migrate_task(
        &self,
        state: &mut BoardState,
        ctx: &OpContext,
        before: Task,
        from_sprint: i64,
        to_sprint: i64,
    ) -> EngineResult<NotifyReport> {
        let mut after = before.clone();
        after.sprint_id = Some(to_sprint);
        after.rolled_over_from = Some(from_sprint);
        after.updated_at = Utc::now();

        let relink = plan_sprint_relink(state, before.id, Some(from_sprint), Some(to_sprint))?;

        let mut snapshot = Snapshot::new();
        snapshot.capture_task(state, before.id);
        if let Some((b, _)) = &relink.old {
            snapshot.capture_sprint(state, b.id);
        }
        if let Some((b, _)) = &relink.new {
            snapshot.capture_sprint(state, b.id);
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
            return Err(fail_paired(state, snapshot, writes, ctx, source).await);
        }

        self.publish(ChangeKind::Updated, EntityKind::Task, after.id);
        self.publish(ChangeKind::Updated, EntityKind::Sprint, from_sprint);
        self.publish(ChangeKind::Updated, EntityKind::Sprint, to_sprint);

        let from_name = state
            .sprint(from_sprint)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| format!("#{from_sprint}"));
        let to_name = state
            .sprint(to_sprint)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| format!("#{to_sprint}"));
        let message = format!(
            "Task {:?} rolled over from sprint {:?} to sprint {:?}",
            after.title, from_name, to_name
        );

        Ok(notify_assignees(
            self.dispatcher.as_ref(),
            &self.directory,
            ctx,
            &after.assigned_user_emails,
            NotificationKind::SprintRollover,
            &message,
            EntityKind::Task,
            after.id,
        )
        .await)
    }
}
