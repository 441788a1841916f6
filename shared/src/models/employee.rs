//! Employee (talent) model

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{Badge, Position};

/// Employee record joined with the owning user's names
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Employee {
    pub id: i64,
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    /// Shifts paying less are hidden from the marketplace
    pub minimum_hourly_rate: f64,
    /// 0 disables the distance filter
    pub maximum_job_distance_miles: f64,
    pub stop_receiving_invites: bool,
    pub rating: f64,
    pub total_ratings: i64,
    pub created_at: i64,
}

/// Employee with positions and badges
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeDetail {
    #[serde(flatten)]
    pub employee: Employee,
    pub positions: Vec<Position>,
    pub badges: Vec<Badge>,
}

/// Update own employee payload
///
/// `position_ids` replaces the whole set when present.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct EmployeeUpdate {
    #[validate(range(min = 0.0, max = 10000.0))]
    pub minimum_hourly_rate: Option<f64>,
    #[validate(range(min = 0.0, max = 1000.0))]
    pub maximum_job_distance_miles: Option<f64>,
    pub stop_receiving_invites: Option<bool>,
    #[validate(length(max = 50))]
    pub position_ids: Option<Vec<i64>>,
}

/// Employee search filters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmployeeQuery {
    pub position_id: Option<i64>,
    pub badge_id: Option<i64>,
    pub minimum_rating: Option<f64>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
