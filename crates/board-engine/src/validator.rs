use crate::{BoardState, EngineError, Result as EngineResult};

use board_core::Subtask;

use std::panic::Location;

use board_config::ValidationConfig;
use chrono::{DateTime, Utc};
use error_location::ErrorLocation;

pub fn sanitize_string(s: &str) -> String {
    s.trim().to_string()
}

/// Validates operation inputs before anything reaches the store.
pub struct BoardValidator;

impl BoardValidator {
    /// Validate a string field
    #[track_caller]
    pub fn validate_string(
        value: &str,
        field_name: &str,
        min_length: usize,
        max_length: usize,
    ) -> EngineResult<()> {
        let length = value.chars().count();

        if length < min_length {
            return Err(EngineError::Validation {
                message: format!("{} must be at least {} characters", field_name, min_length),
                field: Some(field_name.to_string()),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if length > max_length {
            return Err(EngineError::Validation {
                message: format!("{} must not exceed {} characters", field_name, max_length),
                field: Some(field_name.to_string()),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(())
    }

    #[track_caller]
    pub fn validate_title(title: &str, validation: &ValidationConfig) -> EngineResult<()> {
        Self::validate_string(title, "title", 1, validation.max_title_length)
    }

    #[track_caller]
    pub fn validate_description(
        description: Option<&str>,
        validation: &ValidationConfig,
    ) -> EngineResult<()> {
        if let Some(description) = description
            && description.chars().count() > validation.max_description_length
        {
            return Err(EngineError::Validation {
                message: format!(
                    "description must not exceed {} characters",
                    validation.max_description_length
                ),
                field: Some("description".to_string()),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(())
    }

    /// A task status is only valid while a column of that name exists.
    #[track_caller]
    pub fn validate_status_exists(state: &BoardState, status: &str) -> EngineResult<()> {
        if state.column_by_name(status).is_some() {
            return Ok(());
        }

        Err(EngineError::Validation {
            message: format!("status {:?} does not match any column", status),
            field: Some("status".to_string()),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    #[track_caller]
    pub fn validate_assignees(
        emails: &[String],
        validation: &ValidationConfig,
    ) -> EngineResult<()> {
        if emails.len() > validation.max_assignees {
            return Err(EngineError::Validation {
                message: format!(
                    "a task may have at most {} assignees",
                    validation.max_assignees
                ),
                field: Some("assigned_user_emails".to_string()),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        for email in emails {
            if email.trim().is_empty() {
                return Err(EngineError::Validation {
                    message: "assignee email must not be empty".to_string(),
                    field: Some("assigned_user_emails".to_string()),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        }

        Ok(())
    }

    #[track_caller]
    pub fn validate_subtasks(
        subtasks: &[Subtask],
        validation: &ValidationConfig,
    ) -> EngineResult<()> {
        if subtasks.len() > validation.max_subtasks {
            return Err(EngineError::Validation {
                message: format!(
                    "a task may have at most {} subtasks",
                    validation.max_subtasks
                ),
                field: Some("subtasks".to_string()),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        for subtask in subtasks {
            if subtask.title.trim().is_empty() {
                return Err(EngineError::Validation {
                    message: "subtask title must not be empty".to_string(),
                    field: Some("subtasks".to_string()),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        }

        Ok(())
    }

    #[track_caller]
    pub fn validate_date_range(
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> EngineResult<()> {
        if let (Some(start), Some(end)) = (start, end)
            && end < start
        {
            return Err(EngineError::Validation {
                message: "end_date must not be before start_date".to_string(),
                field: Some("end_date".to_string()),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(())
    }

    /// Column names double as the project's status enum, so they must be
    /// unique. `exclude_id` skips the column being renamed.
    #[track_caller]
    pub fn validate_column_name(
        state: &BoardState,
        name: &str,
        exclude_id: Option<i64>,
        validation: &ValidationConfig,
    ) -> EngineResult<()> {
        Self::validate_string(name, "name", 1, validation.max_title_length)?;

        let clash = state
            .columns_ordered()
            .into_iter()
            .any(|c| c.name == name && Some(c.id) != exclude_id);
        if clash {
            return Err(EngineError::Validation {
                message: format!("a column named {:?} already exists", name),
                field: Some("name".to_string()),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(())
    }

    #[track_caller]
    pub fn validate_sprint(
        state: &BoardState,
        name: &str,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
        exclude_id: Option<i64>,
        validation: &ValidationConfig,
    ) -> EngineResult<()> {
        Self::validate_string(name, "name", 1, validation.max_title_length)?;

        if start_date >= end_date {
            return Err(EngineError::Validation {
                message: "start_date must be before end_date".to_string(),
                field: Some("start_date".to_string()),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let clash = state
            .sprints()
            .any(|s| s.name == name && Some(s.id) != exclude_id);
        if clash {
            return Err(EngineError::Validation {
                message: format!("a sprint named {:?} already exists", name),
                field: Some("name".to_string()),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(())
    }

    #[track_caller]
    pub fn validate_backlog_name(
        name: &str,
        validation: &ValidationConfig,
    ) -> EngineResult<()> {
        Self::validate_string(name, "name", 1, validation.max_title_length)
    }
}
