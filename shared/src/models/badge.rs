//! Badge catalog and grants

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Badge record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Badge {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// Create badge payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BadgeCreate {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[validate(length(max = 2048))]
    pub image_url: Option<String>,
}

/// Update badge payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct BadgeUpdate {
    #[validate(length(min = 1, max = 100))]
    pub title: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[validate(length(max = 2048))]
    pub image_url: Option<String>,
}

/// A badge granted to an employee by an employer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct EmployeeBadge {
    pub employee_id: i64,
    pub badge_id: i64,
    pub granted_by: i64,
    pub created_at: i64,
}
