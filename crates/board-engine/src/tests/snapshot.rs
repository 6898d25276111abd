use crate::Snapshot;
use crate::tests::support::{board_state, task};

#[test]
fn given_restored_snapshot_when_entity_was_mutated_then_original_back() {
    let mut state = board_state();
    let mut snapshot = Snapshot::new();
    snapshot.capture_task(&state, 101);

    let mut mutated = state.task(101).cloned().unwrap();
    mutated.status = "Done".to_string();
    state.upsert_task(mutated);
    assert_eq!(state.task(101).unwrap().status, "Done");

    snapshot.restore(&mut state);

    assert_eq!(state.task(101).unwrap().status, "Todo");
}

#[test]
fn given_restored_snapshot_when_entity_was_inserted_then_insert_undone() {
    let mut state = board_state();
    let mut snapshot = Snapshot::new();
    snapshot.capture_task(&state, 500);

    state.upsert_task(task(500, "Optimistic", "Todo", 900));
    assert!(state.task(500).is_some());

    snapshot.restore(&mut state);

    assert!(state.task(500).is_none());
}

#[test]
fn given_restored_snapshot_when_entity_was_removed_then_removal_undone() {
    let mut state = board_state();
    let mut snapshot = Snapshot::new();
    snapshot.capture_task(&state, 101);

    state.remove_task(101);
    assert!(state.task(101).is_none());

    snapshot.restore(&mut state);

    assert!(state.task(101).is_some());
}

#[test]
fn given_restore_when_applied_then_revision_bumps() {
    let mut state = board_state();
    let mut snapshot = Snapshot::new();
    snapshot.capture_task(&state, 101);

    let mut mutated = state.task(101).cloned().unwrap();
    mutated.title = "Changed".to_string();
    state.upsert_task(mutated);
    let before_restore = state.revision();

    snapshot.restore(&mut state);

    // Restores invalidate memoized projections too
    assert!(state.revision() > before_restore);
}
