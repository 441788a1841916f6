//! Venue model

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::geo::GeoPoint;

/// Venue record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Venue {
    pub id: i64,
    pub employer_id: i64,
    pub title: String,
    pub street_address: String,
    pub city: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: i64,
}

impl Venue {
    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// Create venue payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VenueCreate {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 300))]
    pub street_address: String,
    #[validate(length(max = 100))]
    pub city: Option<String>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

/// Update venue payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct VenueUpdate {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 300))]
    pub street_address: Option<String>,
    #[validate(length(max = 100))]
    pub city: Option<String>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
}
