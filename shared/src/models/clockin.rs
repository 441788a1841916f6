//! Clock-in records

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Clock-in record (`ended_at` is null while clocked in)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Clockin {
    pub id: i64,
    pub shift_id: i64,
    pub employee_id: i64,
    pub author_user_id: i64,
    pub started_at: i64,
    pub ended_at: Option<i64>,
    pub latitude_in: Option<f64>,
    pub longitude_in: Option<f64>,
    pub latitude_out: Option<f64>,
    pub longitude_out: Option<f64>,
    pub distance_in_miles: Option<f64>,
    pub distance_out_miles: Option<f64>,
    /// Closed by the scheduler at shift end
    pub automatically_closed: bool,
    pub created_at: i64,
}

impl Clockin {
    pub fn is_open(&self) -> bool {
        self.ended_at.is_none()
    }

    /// Worked milliseconds, if closed
    pub fn worked_ms(&self) -> Option<i64> {
        self.ended_at.map(|end| end - self.started_at)
    }
}

/// Employee clock in / clock out payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockRequest {
    pub shift_id: i64,
    pub latitude: f64,
    pub longitude: f64,
}

/// Employer manual clock-in payload (no geofence)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ClockinCreate {
    pub shift_id: i64,
    pub employee_id: i64,
    #[validate(range(min = 0_i64, max = 253_402_300_799_999_i64))]
    pub started_at: i64,
    #[validate(range(min = 0_i64, max = 253_402_300_799_999_i64))]
    pub ended_at: Option<i64>,
}

/// Employer correction of clock-in times
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ClockinUpdate {
    #[validate(range(min = 0_i64, max = 253_402_300_799_999_i64))]
    pub started_at: Option<i64>,
    #[validate(range(min = 0_i64, max = 253_402_300_799_999_i64))]
    pub ended_at: Option<i64>,
}

/// Clock-in list filters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClockinQuery {
    pub shift_id: Option<i64>,
    pub employee_id: Option<i64>,
    /// started_at >= from
    pub from: Option<i64>,
    /// started_at < until
    pub until: Option<i64>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
