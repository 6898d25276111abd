mod common;

use common::board;

use board_engine::{BoardFilter, DragEvent, DragId, DragTransition, EngineError, TaskDraft};
use board_store::EntityStore;

async fn two_todo_tasks(board: &common::TestBoard) -> (i64, i64) {
    let a = board
        .engine
        .create_task(&board.ctx, TaskDraft::new("A", "Todo"))
        .await
        .unwrap()
        .task;
    let b = board
        .engine
        .create_task(&board.ctx, TaskDraft::new("B", "Todo"))
        .await
        .unwrap()
        .task;
    board.store.clear_recorded_ops().unwrap();
    (a.id, b.id)
}

#[tokio::test]
async fn given_reorder_within_column_when_dropped_then_relative_order_swaps_status_untouched() {
    let board = board().await;
    let (a, b) = two_todo_tasks(&board).await;

    let transition = board
        .engine
        .handle_drag(
            &board.ctx,
            DragEvent {
                active: DragId::Task(a),
                over: DragId::Task(b),
            },
        )
        .await
        .unwrap();

    assert!(matches!(
        transition,
        Some(DragTransition::ReorderWithinColumn { .. })
    ));

    let task_a = board.engine.task(a).await.unwrap();
    let task_b = board.engine.task(b).await.unwrap();
    assert!(task_b.display_order < task_a.display_order);
    assert_eq!(task_a.status, "Todo");
    assert_eq!(task_b.status, "Todo");
    assert!(task_a.sprint_id.is_none());

    // Only task updates were issued, and neither touched status
    let ops = board.store.recorded_ops().unwrap();
    assert!(ops.iter().all(|op| op == "update_task"));
    assert_eq!(board.store.get_task(a).await.unwrap().status, "Todo");
    assert_eq!(board.store.get_task(b).await.unwrap().status, "Todo");
}

#[tokio::test]
async fn given_cross_column_drop_when_applied_then_status_and_order_updated() {
    let board = board().await;
    let (a, _) = two_todo_tasks(&board).await;

    let transition = board
        .engine
        .handle_drag(
            &board.ctx,
            DragEvent {
                active: DragId::Task(a),
                over: DragId::Column(2),
            },
        )
        .await
        .unwrap();

    assert!(matches!(
        transition,
        Some(DragTransition::MoveAcrossColumns { .. })
    ));

    let task_a = board.engine.task(a).await.unwrap();
    assert_eq!(task_a.status, "In Progress");
    assert_eq!(board.store.get_task(a).await.unwrap().status, "In Progress");

    let view = board.engine.board_view(&BoardFilter::default()).await;
    assert_eq!(view.column("Todo").unwrap().tasks.len(), 1);
    assert_eq!(view.column("In Progress").unwrap().tasks.len(), 1);
}

#[tokio::test]
async fn given_drop_on_task_in_other_column_when_applied_then_inserted_at_its_index() {
    let board = board().await;
    let (_, b) = two_todo_tasks(&board).await;
    let c = board
        .engine
        .create_task(&board.ctx, TaskDraft::new("C", "In Progress"))
        .await
        .unwrap()
        .task;

    board
        .engine
        .handle_drag(
            &board.ctx,
            DragEvent {
                active: DragId::Task(b),
                over: DragId::Task(c.id),
            },
        )
        .await
        .unwrap();

    let view = board.engine.board_view(&BoardFilter::default()).await;
    let in_progress: Vec<i64> = view
        .column("In Progress")
        .unwrap()
        .tasks
        .iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(in_progress, vec![b, c.id]);
}

#[tokio::test]
async fn given_column_pair_when_dropped_then_display_orders_swap() {
    let board = board().await;

    let transition = board
        .engine
        .handle_drag(
            &board.ctx,
            DragEvent {
                active: DragId::Column(1),
                over: DragId::Column(3),
            },
        )
        .await
        .unwrap();

    assert!(matches!(
        transition,
        Some(DragTransition::ReorderColumns { .. })
    ));

    let todo = board.engine.column(1).await.unwrap();
    let done = board.engine.column(3).await.unwrap();
    assert_eq!(todo.display_order, 300);
    assert_eq!(done.display_order, 100);

    let view = board.engine.board_view(&BoardFilter::default()).await;
    let names: Vec<&str> = view.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Done", "In Progress", "Todo"]);
}

#[tokio::test]
async fn given_store_failure_when_dropped_then_board_snaps_back() {
    let board = board().await;
    let (a, b) = two_todo_tasks(&board).await;
    let before = board.engine.board_view(&BoardFilter::default()).await;

    board.store.fail_once("update_task").unwrap();
    let result = board
        .engine
        .handle_drag(
            &board.ctx,
            DragEvent {
                active: DragId::Task(a),
                over: DragId::Task(b),
            },
        )
        .await;

    assert!(matches!(result, Err(EngineError::Transport { .. })));

    let after = board.engine.board_view(&BoardFilter::default()).await;
    assert_eq!(*before, *after);
    // The store never saw a surviving reorder either
    let stored_a = board.store.get_task(a).await.unwrap();
    let stored_b = board.store.get_task(b).await.unwrap();
    assert!(stored_a.display_order < stored_b.display_order);
}

#[tokio::test]
async fn given_same_id_when_dropped_then_noop() {
    let board = board().await;
    let (a, _) = two_todo_tasks(&board).await;

    let transition = board
        .engine
        .handle_drag(
            &board.ctx,
            DragEvent {
                active: DragId::Task(a),
                over: DragId::Task(a),
            },
        )
        .await
        .unwrap();

    assert!(transition.is_none());
    assert!(board.store.recorded_ops().unwrap().is_empty());
}

#[tokio::test]
async fn given_unknown_endpoint_when_dropped_then_noop() {
    let board = board().await;
    let (a, _) = two_todo_tasks(&board).await;

    let transition = board
        .engine
        .handle_drag(
            &board.ctx,
            DragEvent {
                active: DragId::Task(a),
                over: DragId::Task(9999),
            },
        )
        .await
        .unwrap();

    assert!(transition.is_none());
    assert!(board.store.recorded_ops().unwrap().is_empty());
}
