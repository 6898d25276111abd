use crate::Priority;

use std::str::FromStr;

#[test]
fn given_lowercase_priority_when_parsed_then_succeeds() {
    assert_eq!(Priority::from_str("high").unwrap(), Priority::High);
    assert_eq!(Priority::from_str("medium").unwrap(), Priority::Medium);
    assert_eq!(Priority::from_str("low").unwrap(), Priority::Low);
}

#[test]
fn given_mixed_case_priority_when_parsed_then_succeeds() {
    // Filter inputs arrive in whatever case the UI sent
    assert_eq!(Priority::from_str("HIGH").unwrap(), Priority::High);
    assert_eq!(Priority::from_str("Medium").unwrap(), Priority::Medium);
}

#[test]
fn given_unknown_priority_when_parsed_then_fails() {
    assert!(Priority::from_str("urgent").is_err());
    assert!(Priority::from_str("").is_err());
}

#[test]
fn given_priority_when_serialized_then_snake_case() {
    let json = serde_json::to_string(&Priority::High).unwrap();
    assert_eq!(json, "\"high\"");
}
