//! Employer (company) model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Default grace before shift start during which clock-in is accepted
pub const DEFAULT_CLOCKIN_DELTA_MINUTES: i64 = 15;
/// Default grace after shift end during which clock-out is accepted
pub const DEFAULT_CLOCKOUT_DELAY_MINUTES: i64 = 60;

/// Employer record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Employer {
    pub id: i64,
    pub title: String,
    pub website: Option<String>,
    pub bio: Option<String>,
    /// Average of received ratings
    pub rating: f64,
    pub total_ratings: i64,
    /// Minutes before `starting_at` a clock-in is accepted
    pub maximum_clockin_delta_minutes: i64,
    /// Minutes after `ending_at` a clock-out is accepted
    pub maximum_clockout_delay_minutes: i64,
    /// Auto-accept applications from talent on any favorite list
    pub automatically_accept_from_favlists: bool,
    /// 0 = Monday .. 6 = Sunday
    pub payroll_period_starting_weekday: i64,
    /// Minutes after midnight (UTC)
    pub payroll_period_starting_time: i64,
    pub created_at: i64,
}

/// Update employer payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct EmployerUpdate {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 2048))]
    pub website: Option<String>,
    #[validate(length(max = 500))]
    pub bio: Option<String>,
    #[validate(range(min = 0, max = 1440))]
    pub maximum_clockin_delta_minutes: Option<i64>,
    #[validate(range(min = 0, max = 1440))]
    pub maximum_clockout_delay_minutes: Option<i64>,
    pub automatically_accept_from_favlists: Option<bool>,
    #[validate(range(min = 0, max = 6))]
    pub payroll_period_starting_weekday: Option<i64>,
    #[validate(range(min = 0, max = 1439))]
    pub payroll_period_starting_time: Option<i64>,
}
