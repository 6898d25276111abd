use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A known user, as supplied read-only by the identity source.
///
/// `daily_rate` and the availability window feed task cost computation:
/// cost accrues only where the window overlaps the task's date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    pub display_name: String,

    pub daily_rate: f64,
    pub available_from: Option<DateTime<Utc>>,
    pub available_until: Option<DateTime<Utc>>,
}

impl UserProfile {
    pub fn new(id: i64, email: String, display_name: String, daily_rate: f64) -> Self {
        Self {
            id,
            email,
            display_name,
            daily_rate,
            available_from: None,
            available_until: None,
        }
    }
}
