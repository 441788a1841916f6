//! Position (job role) catalog

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Position record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Position {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
}

/// Create position payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PositionCreate {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

/// Update position payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PositionUpdate {
    #[validate(length(min = 1, max = 100))]
    pub title: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}
