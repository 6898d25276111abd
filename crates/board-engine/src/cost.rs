use crate::UserDirectory;

use chrono::{DateTime, Utc};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Recompute a task's total cost from its assignees and date range.
///
/// Cost accrues only for the overlap between an assignee's availability
/// window and the task's active date range, in whole days rounded up
/// (a non-empty overlap shorter than a day bills one day). A task with
/// no assignees or without both dates costs 0. Assignees missing from
/// the directory contribute nothing.
pub fn compute_total_cost(
    start_date: Option<DateTime<Utc>>,
    end_date: Option<DateTime<Utc>>,
    assignee_emails: &[String],
    directory: &UserDirectory,
) -> f64 {
    let (Some(start), Some(end)) = (start_date, end_date) else {
        return 0.0;
    };
    if end < start {
        return 0.0;
    }

    assignee_emails
        .iter()
        .filter_map(|email| directory.by_email(email))
        .map(|profile| {
            let from = profile.available_from.unwrap_or(start).max(start);
            let until = profile.available_until.unwrap_or(end).min(end);
            if until < from {
                return 0.0;
            }

            let overlap_days = ((until - from).num_seconds() as f64 / SECONDS_PER_DAY)
                .ceil()
                .max(1.0);
            overlap_days * profile.daily_rate
        })
        .sum()
}
