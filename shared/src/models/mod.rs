//! Data models
//!
//! Shared between the server and API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY), all timestamps are
//! Unix milliseconds.

pub mod application;
pub mod badge;
pub mod clockin;
pub mod employee;
pub mod employer;
pub mod favorite_list;
pub mod invite;
pub mod notification;
pub mod payroll;
pub mod position;
pub mod rating;
pub mod shift;
pub mod user;
pub mod venue;

// Re-exports
pub use application::*;
pub use badge::*;
pub use clockin::*;
pub use employee::*;
pub use employer::*;
pub use favorite_list::*;
pub use invite::*;
pub use notification::*;
pub use payroll::*;
pub use position::*;
pub use rating::*;
pub use shift::*;
pub use user::*;
pub use venue::*;
