//! API routes
//!
//! One module per resource, each exposing `router()` and a `handler`
//! module. Handlers stay thin: extract, check the role, call the
//! repository or workflow, wrap the result in `Json`.
//!
//! - [`health`] - liveness (public)
//! - [`auth`] - register, login, session, password
//! - [`profile`] - own profile
//! - [`admin`] - user administration
//! - [`employers`] / [`employees`] - accounts, search, badges, ratings
//! - [`positions`] / [`badges`] - catalog
//! - [`venues`] / [`favlists`] - employer resources
//! - [`shifts`] / [`marketplace`] / [`applications`] / [`invites`] - staffing
//! - [`clockins`] / [`payroll`] - time and pay
//! - [`ratings`] / [`notifications`] - feedback

pub mod admin;
pub mod applications;
pub mod auth;
pub mod badges;
pub mod clockins;
pub mod employees;
pub mod employers;
pub mod favlists;
pub mod health;
pub mod invites;
pub mod marketplace;
pub mod notifications;
pub mod payroll;
pub mod positions;
pub mod profile;
pub mod ratings;
pub mod shifts;
pub mod venues;

use serde::Deserialize;

/// `?limit=&offset=` for plain lists
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
