use crate::notify::notify_assignees;
use crate::tests::support::{RecordingDispatcher, directory_with_users, test_ctx};
use crate::{EngineError, EntityKind, NotificationKind, NotifyReport};

fn emails(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn given_assignees_when_notified_then_each_resolvable_user_messaged() {
    let dispatcher = RecordingDispatcher::new();
    let directory = directory_with_users();
    let ctx = test_ctx();

    let report = notify_assignees(
        &dispatcher,
        &directory,
        &ctx,
        &emails(&["alice@example.com", "bob@example.com"]),
        NotificationKind::TaskAssigned,
        "You have been assigned",
        EntityKind::Task,
        42,
    )
    .await;

    assert_eq!(report, NotifyReport { attempted: 2, failed: 0 });
    let sent = dispatcher.sent();
    assert_eq!(sent.len(), 2);
    assert!(sent.iter().all(|n| n.related_id == 42));
}

#[tokio::test]
async fn given_acting_user_among_assignees_when_notified_then_excluded() {
    let dispatcher = RecordingDispatcher::new();
    let directory = directory_with_users();
    let ctx = test_ctx(); // carol@example.com

    let report = notify_assignees(
        &dispatcher,
        &directory,
        &ctx,
        &emails(&["carol@example.com", "alice@example.com"]),
        NotificationKind::TaskUpdated,
        "Task updated",
        EntityKind::Task,
        1,
    )
    .await;

    assert_eq!(report.attempted, 1);
    assert_eq!(dispatcher.sent()[0].user_id, 10);
}

#[tokio::test]
async fn given_duplicate_and_unknown_emails_when_notified_then_deduped_and_skipped() {
    let dispatcher = RecordingDispatcher::new();
    let directory = directory_with_users();
    let ctx = test_ctx();

    let report = notify_assignees(
        &dispatcher,
        &directory,
        &ctx,
        &emails(&[
            "alice@example.com",
            "alice@example.com",
            "ghost@example.com",
        ]),
        NotificationKind::SprintRollover,
        "Rolled over",
        EntityKind::Task,
        1,
    )
    .await;

    assert_eq!(report.attempted, 1);
}

#[tokio::test]
async fn given_failing_dispatcher_when_notified_then_failures_counted() {
    let dispatcher = RecordingDispatcher::new();
    dispatcher.fail_all();
    let directory = directory_with_users();
    let ctx = test_ctx();

    let report = notify_assignees(
        &dispatcher,
        &directory,
        &ctx,
        &emails(&["alice@example.com", "bob@example.com"]),
        NotificationKind::TaskAssigned,
        "You have been assigned",
        EntityKind::Task,
        1,
    )
    .await;

    assert_eq!(report, NotifyReport { attempted: 2, failed: 2 });
    assert!(report.partial_failure());
    assert!(matches!(
        report.as_error(),
        Some(EngineError::PartialNotificationFailure {
            failed: 2,
            total: 2,
            ..
        })
    ));
}

#[test]
fn given_notification_kind_when_serialized_then_snake_case() {
    let json = serde_json::to_string(&NotificationKind::SprintRollover).unwrap();
    assert_eq!(json, "\"sprint_rollover\"");
}

#[test]
fn given_clean_report_when_converted_then_no_error() {
    let report = NotifyReport { attempted: 3, failed: 0 };
    assert!(report.as_error().is_none());
}

#[test]
fn given_two_reports_when_merged_then_counts_sum() {
    let merged = NotifyReport { attempted: 2, failed: 1 }
        .merged(NotifyReport { attempted: 3, failed: 0 });
    assert_eq!(merged, NotifyReport { attempted: 5, failed: 1 });
}
