use crate::compute_total_cost;
use crate::tests::support::{days_from_now, profile};
use crate::UserDirectory;

use chrono::{Duration, Utc};

fn emails(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn given_no_dates_when_computed_then_zero() {
    let directory = UserDirectory::from_profiles([profile(1, "alice@example.com", 100.0)]);

    let cost = compute_total_cost(
        None,
        Some(days_from_now(7)),
        &emails(&["alice@example.com"]),
        &directory,
    );

    assert_eq!(cost, 0.0);
}

#[test]
fn given_no_assignees_when_computed_then_zero() {
    let directory = UserDirectory::new();

    let cost = compute_total_cost(Some(days_from_now(0)), Some(days_from_now(7)), &[], &directory);

    assert_eq!(cost, 0.0);
}

#[test]
fn given_week_long_task_when_computed_then_rate_times_days() {
    let directory = UserDirectory::from_profiles([profile(1, "alice@example.com", 100.0)]);
    let start = Utc::now();
    let end = start + Duration::days(7);

    let cost = compute_total_cost(
        Some(start),
        Some(end),
        &emails(&["alice@example.com"]),
        &directory,
    );

    assert_eq!(cost, 700.0);
}

#[test]
fn given_two_assignees_when_computed_then_costs_sum() {
    let directory = UserDirectory::from_profiles([
        profile(1, "alice@example.com", 100.0),
        profile(2, "bob@example.com", 80.0),
    ]);
    let start = Utc::now();
    let end = start + Duration::days(2);

    let cost = compute_total_cost(
        Some(start),
        Some(end),
        &emails(&["alice@example.com", "bob@example.com"]),
        &directory,
    );

    assert_eq!(cost, 360.0);
}

#[test]
fn given_availability_window_when_computed_then_overlap_only_billed() {
    let start = Utc::now();
    let end = start + Duration::days(10);
    let mut late_joiner = profile(1, "alice@example.com", 100.0);
    late_joiner.available_from = Some(start + Duration::days(7));
    let directory = UserDirectory::from_profiles([late_joiner]);

    let cost = compute_total_cost(
        Some(start),
        Some(end),
        &emails(&["alice@example.com"]),
        &directory,
    );

    assert_eq!(cost, 300.0);
}

#[test]
fn given_disjoint_availability_when_computed_then_zero() {
    let start = Utc::now();
    let end = start + Duration::days(5);
    let mut gone = profile(1, "alice@example.com", 100.0);
    gone.available_until = Some(start - Duration::days(1));
    let directory = UserDirectory::from_profiles([gone]);

    let cost = compute_total_cost(
        Some(start),
        Some(end),
        &emails(&["alice@example.com"]),
        &directory,
    );

    assert_eq!(cost, 0.0);
}

#[test]
fn given_unknown_assignee_when_computed_then_contributes_nothing() {
    let directory = UserDirectory::from_profiles([profile(1, "alice@example.com", 100.0)]);
    let start = Utc::now();
    let end = start + Duration::days(3);

    let cost = compute_total_cost(
        Some(start),
        Some(end),
        &emails(&["alice@example.com", "ghost@example.com"]),
        &directory,
    );

    assert_eq!(cost, 300.0);
}

#[test]
fn given_sub_day_overlap_when_computed_then_one_day_billed() {
    let directory = UserDirectory::from_profiles([profile(1, "alice@example.com", 100.0)]);
    let start = Utc::now();
    let end = start + Duration::hours(3);

    let cost = compute_total_cost(
        Some(start),
        Some(end),
        &emails(&["alice@example.com"]),
        &directory,
    );

    assert_eq!(cost, 100.0);
}

#[test]
fn given_inverted_dates_when_computed_then_zero() {
    let directory = UserDirectory::from_profiles([profile(1, "alice@example.com", 100.0)]);
    let start = Utc::now();

    let cost = compute_total_cost(
        Some(start),
        Some(start - Duration::days(1)),
        &emails(&["alice@example.com"]),
        &directory,
    );

    assert_eq!(cost, 0.0);
}
