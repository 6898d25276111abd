use crate::{EngineError, EntityKind, OpContext, UserDirectory};

use std::collections::HashSet;
use std::panic::Location;

use async_trait::async_trait;
use error_location::ErrorLocation;
use futures::future::join_all;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    TaskAssigned,
    TaskUpdated,
    SprintChanged,
    SprintRollover,
}

/// What the core hands to the external dispatcher: target user, message,
/// and the entity the message is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub user_id: i64,
    pub kind: NotificationKind,
    pub message: String,
    pub related_entity: EntityKind,
    pub related_id: i64,
}

#[derive(Error, Debug)]
#[error("Notification dispatch failed: {message}")]
pub struct NotifyError {
    pub message: String,
}

/// External persist-and-push channel. Fire-and-forget from the core's
/// perspective, but failures are awaited so partial failure can be
/// surfaced as a warning.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn notify(&self, notification: Notification) -> Result<(), NotifyError>;
}

/// Dispatcher that drops everything. For embedders that handle
/// notifications elsewhere.
pub struct NullDispatcher;

#[async_trait]
impl NotificationDispatcher for NullDispatcher {
    async fn notify(&self, _notification: Notification) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// Outcome of one notification fan-out. Partial failure never rolls back
/// the mutation that triggered it; callers surface it as a warning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NotifyReport {
    pub attempted: usize,
    pub failed: usize,
}

impl NotifyReport {
    pub fn merged(self, other: Self) -> Self {
        Self {
            attempted: self.attempted + other.attempted,
            failed: self.failed + other.failed,
        }
    }

    pub fn partial_failure(&self) -> bool {
        self.failed > 0
    }

    /// Error object for banner display, if anything failed.
    #[track_caller]
    pub fn as_error(&self) -> Option<EngineError> {
        if !self.partial_failure() {
            return None;
        }

        Some(EngineError::PartialNotificationFailure {
            failed: self.failed,
            total: self.attempted,
            location: ErrorLocation::from(Location::caller()),
        })
    }
}

/// Notify the distinct resolvable assignees, excluding the acting user.
/// Unknown emails are skipped; each failure is logged and counted.
pub(crate) async fn notify_assignees(
    dispatcher: &dyn NotificationDispatcher,
    directory: &UserDirectory,
    ctx: &OpContext,
    emails: &[String],
    kind: NotificationKind,
    message: &str,
    related_entity: EntityKind,
    related_id: i64,
) -> NotifyReport {
    let mut seen = HashSet::new();
    let recipients: Vec<_> = emails
        .iter()
        .filter(|email| seen.insert(email.as_str()))
        .filter(|email| **email != ctx.user.email)
        .filter_map(|email| {
            let profile = directory.by_email(email);
            if profile.is_none() {
                log::debug!("{} no profile for assignee {}", ctx.log_prefix(), email);
            }
            profile
        })
        .collect();

    let sends = recipients.iter().map(|profile| {
        dispatcher.notify(Notification {
            user_id: profile.id,
            kind,
            message: message.to_string(),
            related_entity,
            related_id,
        })
    });

    let results = join_all(sends).await;
    let failed = results.iter().filter(|r| r.is_err()).count();
    for error in results.iter().filter_map(|r| r.as_ref().err()) {
        log::warn!("{} {}", ctx.log_prefix(), error);
    }

    NotifyReport {
        attempted: results.len(),
        failed,
    }
}
