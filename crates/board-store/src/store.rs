use crate::Result as StoreResult;

use board_core::{Backlog, Column, Sprint, Task};

use async_trait::async_trait;

/// Asynchronous CRUD contract over the four independently stored
/// collections. Implementations own id allocation on create; every call
/// can fail with a structured [`crate::StoreError`].
///
/// The engine treats this as an external collaborator: it never assumes
/// multi-entity transactions, so paired cross-reference updates are
/// compensated manually by the caller.
#[async_trait]
pub trait EntityStore: Send + Sync {
    // Tasks
    async fn list_tasks(&self, project_id: i64) -> StoreResult<Vec<Task>>;
    async fn get_task(&self, id: i64) -> StoreResult<Task>;
    async fn create_task(&self, task: Task) -> StoreResult<Task>;
    async fn update_task(&self, id: i64, task: Task) -> StoreResult<Task>;
    async fn delete_task(&self, id: i64) -> StoreResult<()>;

    // Columns
    async fn list_columns(&self, project_id: i64) -> StoreResult<Vec<Column>>;
    async fn get_column(&self, id: i64) -> StoreResult<Column>;
    async fn create_column(&self, column: Column) -> StoreResult<Column>;
    async fn update_column(&self, id: i64, column: Column) -> StoreResult<Column>;
    async fn delete_column(&self, id: i64) -> StoreResult<()>;

    // Backlogs
    async fn list_backlogs(&self, project_id: i64) -> StoreResult<Vec<Backlog>>;
    async fn get_backlog(&self, id: i64) -> StoreResult<Backlog>;
    async fn create_backlog(&self, backlog: Backlog) -> StoreResult<Backlog>;
    async fn update_backlog(&self, id: i64, backlog: Backlog) -> StoreResult<Backlog>;
    async fn delete_backlog(&self, id: i64) -> StoreResult<()>;

    // Sprints
    async fn list_sprints(&self, project_id: i64) -> StoreResult<Vec<Sprint>>;
    async fn get_sprint(&self, id: i64) -> StoreResult<Sprint>;
    async fn create_sprint(&self, sprint: Sprint) -> StoreResult<Sprint>;
    async fn update_sprint(&self, id: i64, sprint: Sprint) -> StoreResult<Sprint>;
    async fn delete_sprint(&self, id: i64) -> StoreResult<()>;
}
