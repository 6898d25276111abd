use crate::{Priority, Task};

#[test]
fn given_new_task_when_created_then_defaults_applied() {
    let task = Task::new(1, "Write docs".to_string(), "Todo".to_string());

    assert_eq!(task.id, 0);
    assert_eq!(task.priority, Priority::Medium);
    assert_eq!(task.status, "Todo");
    assert!(task.sprint_id.is_none());
    assert!(task.backlog_ids.is_empty());
    assert_eq!(task.total_cost, 0.0);
}

#[test]
fn given_backlog_links_when_queried_then_membership_reported() {
    let mut task = Task::new(1, "T".to_string(), "Todo".to_string());
    assert!(!task.has_backlog_link());

    task.backlog_ids.push(7);
    assert!(task.has_backlog_link());
    assert!(task.is_linked_to_backlog(7));
    assert!(!task.is_linked_to_backlog(8));
}

#[test]
fn given_sprint_assignment_when_queried_then_membership_reported() {
    let mut task = Task::new(1, "T".to_string(), "Todo".to_string());
    assert!(!task.is_in_sprint(3));

    task.sprint_id = Some(3);
    assert!(task.is_in_sprint(3));
    assert!(!task.is_in_sprint(4));
}
