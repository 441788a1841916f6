//! Favorite lists (employer-curated talent)

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Employee;

/// Favorite list record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct FavoriteList {
    pub id: i64,
    pub employer_id: i64,
    pub title: String,
    /// Applications from members are accepted immediately
    pub auto_accept_employees_on_this_list: bool,
    pub created_at: i64,
}

/// List with its members
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteListDetail {
    #[serde(flatten)]
    pub list: FavoriteList,
    pub employees: Vec<Employee>,
}

/// Create favorite list payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FavoriteListCreate {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[serde(default)]
    pub auto_accept_employees_on_this_list: bool,
}

/// Update favorite list payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct FavoriteListUpdate {
    #[validate(length(min = 1, max = 100))]
    pub title: Option<String>,
    pub auto_accept_employees_on_this_list: Option<bool>,
}
