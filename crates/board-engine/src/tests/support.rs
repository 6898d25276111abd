use crate::{
    BoardState, CurrentUser, Notification, NotificationDispatcher, NotifyError, OpContext,
    UserDirectory,
};

use board_core::{Column, Priority, Sprint, Task, UserProfile};

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

/// Dispatcher that records everything it is asked to send, optionally
/// failing every send.
#[derive(Default)]
pub struct RecordingDispatcher {
    sent: Mutex<Vec<Notification>>,
    fail_all: AtomicBool,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_all(&self) {
        self.fail_all.store(true, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().expect("dispatcher mutex poisoned").clone()
    }
}

#[async_trait]
impl NotificationDispatcher for RecordingDispatcher {
    async fn notify(&self, notification: Notification) -> Result<(), NotifyError> {
        if self.fail_all.load(Ordering::SeqCst) {
            return Err(NotifyError {
                message: "simulated dispatch failure".to_string(),
            });
        }
        self.sent
            .lock()
            .expect("dispatcher mutex poisoned")
            .push(notification);
        Ok(())
    }
}

pub fn test_ctx() -> OpContext {
    OpContext::new(
        CurrentUser {
            id: 12,
            email: "carol@example.com".to_string(),
            display_name: "Carol".to_string(),
        },
        ["column.create".to_string()],
    )
}

pub fn profile(id: i64, email: &str, daily_rate: f64) -> UserProfile {
    UserProfile::new(id, email.to_string(), format!("User {id}"), daily_rate)
}

pub fn directory_with_users() -> UserDirectory {
    UserDirectory::from_profiles([
        profile(10, "alice@example.com", 100.0),
        profile(11, "bob@example.com", 80.0),
        profile(12, "carol@example.com", 120.0),
    ])
}

pub fn column(id: i64, name: &str, display_order: i64) -> Column {
    let mut column = Column::new(1, name.to_string(), display_order);
    column.id = id;
    column
}

pub fn task(id: i64, title: &str, status: &str, display_order: i64) -> Task {
    let mut task = Task::new(1, title.to_string(), status.to_string());
    task.id = id;
    task.display_order = display_order;
    task
}

pub fn sprint(id: i64, name: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Sprint {
    let mut sprint = Sprint::new(1, name.to_string(), None, start, end);
    sprint.id = id;
    sprint
}

pub fn days_from_now(days: i64) -> DateTime<Utc> {
    Utc::now() + Duration::days(days)
}

/// A three-column board with a few tasks spread across the lanes.
pub fn board_state() -> BoardState {
    let mut state = BoardState::new();
    state.upsert_column(column(1, "Todo", 100));
    state.upsert_column(column(2, "In Progress", 200));
    state.upsert_column(column(3, "Done", 300));

    let mut a = task(101, "Task A", "Todo", 100);
    a.priority = Priority::High;
    a.assigned_user_emails = vec!["alice@example.com".to_string()];
    state.upsert_task(a);

    let mut b = task(102, "Task B", "Todo", 200);
    b.backlog_ids = vec![7];
    state.upsert_task(b);

    let mut c = task(103, "Task C", "In Progress", 100);
    c.assigned_user_emails = vec!["bob@example.com".to_string()];
    c.sprint_id = Some(5);
    state.upsert_task(c);

    state.upsert_task(task(104, "Task D", "Done", 100));

    state
}
