//! Shift Model

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{Employee, Position, Venue};

/// Shift lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShiftStatus {
    Draft,
    Open,
    Filled,
    Cancelled,
    Expired,
    Completed,
}

impl Default for ShiftStatus {
    fn default() -> Self {
        Self::Open
    }
}

impl ShiftStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Open => "OPEN",
            Self::Filled => "FILLED",
            Self::Cancelled => "CANCELLED",
            Self::Expired => "EXPIRED",
            Self::Completed => "COMPLETED",
        }
    }

    /// Shift still accepts edits (before it starts)
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Draft | Self::Open | Self::Filled)
    }

    /// Terminal states never change again
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Expired | Self::Completed)
    }

    /// Allowed manual or scheduled transitions
    pub fn can_transition_to(&self, next: ShiftStatus) -> bool {
        use ShiftStatus::*;
        matches!(
            (self, next),
            (Draft, Open)
                | (Open, Filled)
                | (Filled, Open)
                | (Draft | Open | Filled, Cancelled)
                | (Open | Filled, Expired | Completed)
        )
    }

    /// OPEN or FILLED depending on head count (other states unchanged)
    pub fn with_capacity(self, assigned: i64, maximum: i64) -> Self {
        match self {
            Self::Open | Self::Filled if assigned >= maximum => Self::Filled,
            Self::Open | Self::Filled => Self::Open,
            other => other,
        }
    }
}

/// Who may apply to a shift
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationRestriction {
    Anyone,
    Favorites,
    SpecificPeople,
}

impl Default for ApplicationRestriction {
    fn default() -> Self {
        Self::Anyone
    }
}

/// Shift record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Shift {
    pub id: i64,
    pub employer_id: i64,
    pub venue_id: i64,
    pub position_id: i64,
    pub starting_at: i64,
    pub ending_at: i64,
    pub minimum_hourly_rate: f64,
    pub maximum_allowed_employees: i64,
    pub minimum_allowed_rating: f64,
    pub application_restriction: ApplicationRestriction,
    pub status: ShiftStatus,
    pub description: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Shift {
    pub fn duration_ms(&self) -> i64 {
        self.ending_at - self.starting_at
    }

    pub fn has_started(&self, now: i64) -> bool {
        now >= self.starting_at
    }
}

/// Shift with venue, position and assigned employees
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftDetail {
    #[serde(flatten)]
    pub shift: Shift,
    pub venue: Venue,
    pub position: Position,
    pub employees: Vec<Employee>,
}

/// Marketplace entry with distance to the venue when known
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketplaceShift {
    #[serde(flatten)]
    pub shift: Shift,
    pub venue: Venue,
    pub distance_miles: Option<f64>,
}

/// Create shift payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ShiftCreate {
    pub venue_id: i64,
    pub position_id: i64,
    /// Epoch ms, at most 9999-12-31T23:59:59.999Z
    #[validate(range(min = 0_i64, max = 253_402_300_799_999_i64))]
    pub starting_at: i64,
    #[validate(range(min = 0_i64, max = 253_402_300_799_999_i64))]
    pub ending_at: i64,
    #[validate(range(min = 0.0, max = 10000.0))]
    pub minimum_hourly_rate: f64,
    #[validate(range(min = 1, max = 1000))]
    pub maximum_allowed_employees: i64,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 5.0))]
    pub minimum_allowed_rating: f64,
    #[serde(default)]
    pub application_restriction: ApplicationRestriction,
    /// DRAFT or OPEN (default OPEN)
    pub status: Option<ShiftStatus>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

/// Update shift payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ShiftUpdate {
    pub venue_id: Option<i64>,
    pub position_id: Option<i64>,
    #[validate(range(min = 0_i64, max = 253_402_300_799_999_i64))]
    pub starting_at: Option<i64>,
    #[validate(range(min = 0_i64, max = 253_402_300_799_999_i64))]
    pub ending_at: Option<i64>,
    #[validate(range(min = 0.0, max = 10000.0))]
    pub minimum_hourly_rate: Option<f64>,
    #[validate(range(min = 1, max = 1000))]
    pub maximum_allowed_employees: Option<i64>,
    #[validate(range(min = 0.0, max = 5.0))]
    pub minimum_allowed_rating: Option<f64>,
    pub application_restriction: Option<ApplicationRestriction>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

/// Employer shift list filters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShiftQuery {
    pub status: Option<ShiftStatus>,
    /// starting_at >= from
    pub from: Option<i64>,
    /// starting_at < until
    pub until: Option<i64>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Marketplace filters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketplaceQuery {
    pub position_id: Option<i64>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Employee's own shifts filter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MyShiftsQuery {
    /// `upcoming` (default) or `past`
    pub when: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
