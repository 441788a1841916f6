//! Shift applications

use serde::{Deserialize, Serialize};

/// Application record joined with names for display
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ShiftApplication {
    pub id: i64,
    pub shift_id: i64,
    pub employee_id: i64,
    pub employee_first_name: String,
    pub employee_last_name: String,
    pub shift_starting_at: i64,
    pub created_at: i64,
}

/// Result of applying to a shift
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyResult {
    /// Set while the application awaits review
    pub application: Option<ShiftApplication>,
    /// True when the employee was accepted immediately
    pub auto_accepted: bool,
}
