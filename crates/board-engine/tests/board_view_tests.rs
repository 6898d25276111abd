mod common;

use common::{board, emails};

use board_core::Priority;
use board_engine::{BoardFilter, LinkFilter, TaskDraft};

use std::sync::Arc;

#[tokio::test]
async fn given_unchanged_board_when_viewed_twice_then_same_arc() {
    let board = board().await;
    board
        .engine
        .create_task(&board.ctx, TaskDraft::new("A", "Todo"))
        .await
        .unwrap();

    let filter = BoardFilter::default();
    let first = board.engine.board_view(&filter).await;
    let second = board.engine.board_view(&filter).await;

    assert!(Arc::ptr_eq(&first, &second));
}

#[tokio::test]
async fn given_mutation_when_viewed_then_fresh_view() {
    let board = board().await;
    let filter = BoardFilter::default();
    let before = board.engine.board_view(&filter).await;

    board
        .engine
        .create_task(&board.ctx, TaskDraft::new("A", "Todo"))
        .await
        .unwrap();
    let after = board.engine.board_view(&filter).await;

    assert!(!Arc::ptr_eq(&before, &after));
    assert_eq!(after.task_count(), 1);
}

#[tokio::test]
async fn given_combined_filters_when_viewed_then_conjunctive() {
    let board = board().await;
    let backlog = board
        .engine
        .create_backlog(&board.ctx, "Ideas", None)
        .await
        .unwrap();

    let mut wanted = TaskDraft::new("Wanted", "Todo");
    wanted.priority = Priority::High;
    wanted.backlog_ids = vec![backlog.id];
    wanted.assigned_user_emails = emails(&["alice@example.com"]);
    let wanted = board.engine.create_task(&board.ctx, wanted).await.unwrap().task;

    let mut decoy = TaskDraft::new("Decoy", "Todo");
    decoy.priority = Priority::High;
    board.engine.create_task(&board.ctx, decoy).await.unwrap();

    let view = board
        .engine
        .board_view(&BoardFilter {
            backlog: LinkFilter::To(backlog.id),
            priority: Some(Priority::High),
            user: Some("alice@example.com".to_string()),
            ..BoardFilter::default()
        })
        .await;

    assert_eq!(view.task_count(), 1);
    assert_eq!(view.column("Todo").unwrap().tasks[0].id, wanted.id);
}
