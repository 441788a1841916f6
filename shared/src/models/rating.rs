//! Ratings between employers and talent

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Rating record; exactly one of `employee_id` / `employer_id` is set
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Rating {
    pub id: i64,
    pub sender_user_id: i64,
    pub shift_id: Option<i64>,
    pub employee_id: Option<i64>,
    pub employer_id: Option<i64>,
    pub rating: i64,
    pub comments: Option<String>,
    pub created_at: i64,
}

/// Create rating payload
///
/// Employers rate `employee_id`; employees rate the shift's employer.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RatingCreate {
    pub shift_id: i64,
    pub employee_id: Option<i64>,
    #[validate(range(min = 1, max = 5, message = "rating must be between 1 and 5"))]
    pub rating: i64,
    #[validate(length(max = 1000))]
    pub comments: Option<String>,
}
