use crate::tests::support::{board_state, days_from_now};
use crate::{BoardValidator, EngineError, sanitize_string};

use board_core::Subtask;

use board_config::ValidationConfig;

#[test]
fn given_valid_title_when_validated_then_succeeds() {
    let result = BoardValidator::validate_title("Ship it", &ValidationConfig::default());
    assert!(result.is_ok());
}

#[test]
fn given_empty_title_when_validated_then_fails() {
    let result = BoardValidator::validate_title("", &ValidationConfig::default());
    assert!(matches!(result, Err(EngineError::Validation { .. })));
}

#[test]
fn given_oversized_title_when_validated_then_fails() {
    let title = "x".repeat(300);
    let result = BoardValidator::validate_title(&title, &ValidationConfig::default());
    assert!(result.is_err());
}

#[test]
fn given_known_status_when_validated_then_succeeds() {
    let state = board_state();
    assert!(BoardValidator::validate_status_exists(&state, "Todo").is_ok());
}

#[test]
fn given_unknown_status_when_validated_then_fails() {
    let state = board_state();
    let result = BoardValidator::validate_status_exists(&state, "Parking Lot");
    assert!(matches!(result, Err(EngineError::Validation { .. })));
}

#[test]
fn given_blank_assignee_when_validated_then_fails() {
    let emails = vec!["alice@example.com".to_string(), "  ".to_string()];
    let result = BoardValidator::validate_assignees(&emails, &ValidationConfig::default());
    assert!(result.is_err());
}

#[test]
fn given_blank_subtask_title_when_validated_then_fails() {
    let subtasks = vec![Subtask::new("".to_string())];
    let result = BoardValidator::validate_subtasks(&subtasks, &ValidationConfig::default());
    assert!(result.is_err());
}

#[test]
fn given_inverted_date_range_when_validated_then_fails() {
    let result =
        BoardValidator::validate_date_range(Some(days_from_now(5)), Some(days_from_now(1)));
    assert!(result.is_err());
}

#[test]
fn given_duplicate_column_name_when_validated_then_fails() {
    let state = board_state();
    let result = BoardValidator::validate_column_name(
        &state,
        "Todo",
        None,
        &ValidationConfig::default(),
    );
    assert!(result.is_err());
}

#[test]
fn given_own_name_on_rename_when_validated_then_succeeds() {
    let state = board_state();
    let result = BoardValidator::validate_column_name(
        &state,
        "Todo",
        Some(1),
        &ValidationConfig::default(),
    );
    assert!(result.is_ok());
}

#[test]
fn given_sprint_dates_out_of_order_when_validated_then_fails() {
    let state = board_state();
    let result = BoardValidator::validate_sprint(
        &state,
        "Sprint 1",
        days_from_now(10),
        days_from_now(3),
        None,
        &ValidationConfig::default(),
    );
    assert!(result.is_err());
}

#[test]
fn given_duplicate_sprint_name_when_validated_then_fails() {
    let mut state = board_state();
    state.upsert_sprint(crate::tests::support::sprint(
        5,
        "Sprint 5",
        days_from_now(0),
        days_from_now(14),
    ));

    let result = BoardValidator::validate_sprint(
        &state,
        "Sprint 5",
        days_from_now(15),
        days_from_now(29),
        None,
        &ValidationConfig::default(),
    );
    assert!(result.is_err());
}

#[test]
fn given_padded_string_when_sanitized_then_trimmed() {
    assert_eq!(sanitize_string("  hello  "), "hello");
}
