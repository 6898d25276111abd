use crate::projector::{BoardFilter, BoardProjector, BoardView};
use crate::retry::RetryConfig;
use crate::store_ops::store_read;
use crate::{
    BoardState, ChangeEvent, ChangeFeed, ChangeKind, EntityKind, NotificationDispatcher,
    OpContext, Result as EngineResult, UserDirectory,
};

use board_config::Config;
use board_core::{Backlog, Column, Sprint, Task};
use board_store::EntityStore;

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::sync::broadcast;

/// The board engine for one project: owns the in-memory working copy of
/// the four collections and every controller operation over them.
///
/// Operations serialize on the state lock, so a later edit to the same
/// entity supersedes an earlier one instead of racing it. All writes are
/// applied to the local state optimistically and rolled back if the
/// store rejects them.
pub struct Engine {
    pub(crate) project_id: i64,
    pub(crate) store: Arc<dyn EntityStore>,
    pub(crate) dispatcher: Arc<dyn NotificationDispatcher>,
    pub(crate) directory: UserDirectory,
    pub(crate) config: Config,
    pub(crate) feed: ChangeFeed,
    pub(crate) retry: RetryConfig,
    pub(crate) state: Mutex<BoardState>,
    projector: Mutex<BoardProjector>,
}

impl Engine {
    pub fn new(
        project_id: i64,
        store: Arc<dyn EntityStore>,
        dispatcher: Arc<dyn NotificationDispatcher>,
        directory: UserDirectory,
        config: Config,
    ) -> Self {
        Self {
            project_id,
            store,
            dispatcher,
            directory,
            config,
            feed: ChangeFeed::new(),
            retry: RetryConfig::default(),
            state: Mutex::new(BoardState::new()),
            projector: Mutex::new(BoardProjector::new()),
        }
    }

    pub fn project_id(&self) -> i64 {
        self.project_id
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn subscribe_changes(&self) -> broadcast::Receiver<ChangeEvent> {
        self.feed.subscribe()
    }

    /// Load all four collections from the store, replacing the working
    /// copy. Reads are retried on transient transport failures.
    pub async fn hydrate(&self, ctx: &OpContext) -> EngineResult<()> {
        let tasks = store_read(&self.retry, ctx, "list_tasks", || async {
            self.store
                .list_tasks(self.project_id)
                .await
                .map_err(Into::into)
        })
        .await?;
        let columns = store_read(&self.retry, ctx, "list_columns", || async {
            self.store
                .list_columns(self.project_id)
                .await
                .map_err(Into::into)
        })
        .await?;
        let backlogs = store_read(&self.retry, ctx, "list_backlogs", || async {
            self.store
                .list_backlogs(self.project_id)
                .await
                .map_err(Into::into)
        })
        .await?;
        let sprints = store_read(&self.retry, ctx, "list_sprints", || async {
            self.store
                .list_sprints(self.project_id)
                .await
                .map_err(Into::into)
        })
        .await?;

        let mut state = self.state.lock().await;
        state.replace_all(tasks, columns, backlogs, sprints);

        log::info!(
            "{} hydrated project {}: revision {}",
            ctx.log_prefix(),
            self.project_id,
            state.revision()
        );

        Ok(())
    }

    /// Derive the filtered per-column view. Returns the identical `Arc`
    /// while the board and filter are unchanged.
    pub async fn board_view(&self, filter: &BoardFilter) -> Arc<BoardView> {
        let state = self.state.lock().await;
        let mut projector = self.projector.lock().await;
        projector.project(&state, filter)
    }

    // Cloned reads, mainly for embedders and tests.

    pub async fn task(&self, id: i64) -> Option<Task> {
        self.state.lock().await.task(id).cloned()
    }

    pub async fn column(&self, id: i64) -> Option<Column> {
        self.state.lock().await.column(id).cloned()
    }

    pub async fn backlog(&self, id: i64) -> Option<Backlog> {
        self.state.lock().await.backlog(id).cloned()
    }

    pub async fn sprint(&self, id: i64) -> Option<Sprint> {
        self.state.lock().await.sprint(id).cloned()
    }

    pub(crate) fn publish(&self, kind: ChangeKind, entity: EntityKind, id: i64) {
        self.feed.publish(ChangeEvent {
            kind,
            entity,
            id,
            project_id: self.project_id,
        });
    }
}
