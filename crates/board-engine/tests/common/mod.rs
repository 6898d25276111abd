#![allow(dead_code)]

use board_config::Config;
use board_core::{Column, UserProfile};
use board_engine::{
    CurrentUser, Engine, Notification, NotificationDispatcher, NotifyError, OpContext,
    UserDirectory,
};
use board_store::MemoryStore;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

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

pub const PROJECT: i64 = 1;

pub struct TestBoard {
    pub engine: Arc<Engine>,
    pub store: Arc<MemoryStore>,
    pub dispatcher: Arc<RecordingDispatcher>,
    pub ctx: OpContext,
}

pub fn days_from_now(days: i64) -> DateTime<Utc> {
    Utc::now() + Duration::days(days)
}

/// Acting user: carol, with the column-creation capability.
pub fn ctx() -> OpContext {
    OpContext::new(
        CurrentUser {
            id: 12,
            email: "carol@example.com".to_string(),
            display_name: "Carol".to_string(),
        },
        ["column.create".to_string()],
    )
}

/// Acting user with no capabilities at all.
pub fn powerless_ctx() -> OpContext {
    OpContext::new(
        CurrentUser {
            id: 13,
            email: "dave@example.com".to_string(),
            display_name: "Dave".to_string(),
        },
        Vec::new(),
    )
}

fn directory() -> UserDirectory {
    UserDirectory::from_profiles([
        UserProfile::new(10, "alice@example.com".to_string(), "Alice".to_string(), 100.0),
        UserProfile::new(11, "bob@example.com".to_string(), "Bob".to_string(), 80.0),
        UserProfile::new(12, "carol@example.com".to_string(), "Carol".to_string(), 120.0),
    ])
}

/// A hydrated engine over a Todo / In Progress / Done board with no
/// tasks, a fresh recording dispatcher, and a cleared op log.
pub async fn board() -> TestBoard {
    let store = Arc::new(MemoryStore::new());
    for (id, name, order) in [(1, "Todo", 100), (2, "In Progress", 200), (3, "Done", 300)] {
        let mut column = Column::new(PROJECT, name.to_string(), order);
        column.id = id;
        store.seed_column(column).expect("seed column");
    }

    let dispatcher = Arc::new(RecordingDispatcher::new());
    let engine = Arc::new(Engine::new(
        PROJECT,
        store.clone(),
        dispatcher.clone(),
        directory(),
        Config::default(),
    ));

    let ctx = ctx();
    engine.hydrate(&ctx).await.expect("hydrate");
    store.clear_recorded_ops().expect("clear ops");

    TestBoard {
        engine,
        store,
        dispatcher,
        ctx,
    }
}

pub fn emails(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}
