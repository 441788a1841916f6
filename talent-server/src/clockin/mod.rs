//! Clock-in / clock-out
//!
//! - `rules`: pure time-window and geofence checks
//! - `service`: punches, manual edits and auto clock-out over the database

pub mod rules;
pub mod service;

pub use rules::{ClockContext, validate_clock_in, validate_clock_out};
