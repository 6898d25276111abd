use crate::Sprint;

use chrono::{Duration, Utc};

fn sprint_with_offsets(start_days: i64, end_days: i64) -> Sprint {
    let now = Utc::now();
    Sprint::new(
        1,
        "Sprint".to_string(),
        None,
        now + Duration::days(start_days),
        now + Duration::days(end_days),
    )
}

#[test]
fn given_past_end_date_when_checked_then_overdue() {
    let sprint = sprint_with_offsets(-14, -7);
    assert!(sprint.is_overdue(Utc::now()));
}

#[test]
fn given_future_end_date_when_checked_then_not_overdue() {
    let sprint = sprint_with_offsets(-7, 7);
    assert!(!sprint.is_overdue(Utc::now()));
}

#[test]
fn given_future_start_date_when_checked_then_upcoming() {
    let sprint = sprint_with_offsets(7, 14);
    assert!(sprint.is_upcoming(Utc::now()));
}

#[test]
fn given_started_sprint_when_checked_then_not_upcoming() {
    let sprint = sprint_with_offsets(-1, 13);
    assert!(!sprint.is_upcoming(Utc::now()));
}

#[test]
fn given_member_task_when_queried_then_contains() {
    let mut sprint = sprint_with_offsets(0, 14);
    sprint.task_ids.push(42);
    assert!(sprint.contains_task(42));
    assert!(!sprint.contains_task(43));
}
