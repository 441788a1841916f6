//! Payroll
//!
//! - `period`: weekly boundaries aligned to the employer's start weekday/time
//! - `calculator`: clock-ins to payments (40 h weekly overtime at 1.5x)
//! - `service`: generation, edits and status changes over the database

pub mod calculator;
pub mod period;
pub mod service;

pub use calculator::{OVERTIME_MULTIPLIER, WEEKLY_OVERTIME_THRESHOLD_HOURS, calculate_payments};
pub use period::period_start_for;
