//! Clock-in / clock-out rules
//!
//! Pure checks over a [`ClockContext`]. A punch is accepted when its
//! coordinates are valid, it lands inside the shift's time window (widened
//! by the employer's grace minutes) and it is within the geofence radius
//! of the venue. Each failure carries its own [`ErrorCode`].

use shared::geo::{GeoPoint, haversine_miles};
use shared::util::{MINUTE_MS, format_millis};

use crate::utils::{AppError, ErrorCode};

/// Everything a punch is checked against
#[derive(Debug, Clone, Copy)]
pub struct ClockContext {
    pub starting_at: i64,
    pub ending_at: i64,
    /// Grace before `starting_at`, ms
    pub clockin_delta_ms: i64,
    /// Grace after `ending_at`, ms
    pub clockout_delay_ms: i64,
    pub venue: GeoPoint,
    pub radius_miles: f64,
    pub now: i64,
}

impl ClockContext {
    /// First instant a clock-in is accepted
    pub fn earliest_clock_in(&self) -> i64 {
        self.starting_at.saturating_sub(self.clockin_delta_ms)
    }

    /// Last instant a clock-out is accepted
    pub fn latest_clock_out(&self) -> i64 {
        self.ending_at.saturating_add(self.clockout_delay_ms)
    }
}

/// Check a clock-in punch; returns the distance to the venue in miles
pub fn validate_clock_in(ctx: &ClockContext, point: GeoPoint) -> Result<f64, AppError> {
    check_coordinates(point)?;

    let earliest = ctx.earliest_clock_in();
    if ctx.now < earliest {
        let minutes_early = earliest
            .saturating_sub(ctx.now)
            .saturating_add(MINUTE_MS - 1)
            / MINUTE_MS;
        return Err(AppError::with_message(
            ErrorCode::ClockinTooEarly,
            format!(
                "Clock-in opens at {}, {} minute(s) from now",
                format_millis(earliest),
                minutes_early
            ),
        )
        .with_detail("minutes_until_allowed", minutes_early)
        .with_detail("allowed_from", earliest));
    }

    if ctx.now >= ctx.ending_at {
        return Err(AppError::with_message(
            ErrorCode::ClockinAfterShiftEnded,
            format!("Shift ended at {}", format_millis(ctx.ending_at)),
        )
        .with_detail("ending_at", ctx.ending_at));
    }

    check_geofence(ctx, point)
}

/// Check a clock-out punch for a clock-in opened at `started_at`;
/// returns the distance to the venue in miles
pub fn validate_clock_out(
    ctx: &ClockContext,
    started_at: i64,
    point: GeoPoint,
) -> Result<f64, AppError> {
    check_coordinates(point)?;

    if ctx.now <= started_at {
        return Err(AppError::validation("Clock-out must be after clock-in")
            .with_detail("started_at", started_at));
    }

    let latest = ctx.latest_clock_out();
    if ctx.now > latest {
        let minutes_late = (ctx.now - latest) / MINUTE_MS;
        return Err(AppError::with_message(
            ErrorCode::ClockoutWindowClosed,
            format!("Clock-out closed at {}", format_millis(latest)),
        )
        .with_detail("minutes_late", minutes_late)
        .with_detail("allowed_until", latest));
    }

    check_geofence(ctx, point)
}

fn check_coordinates(point: GeoPoint) -> Result<(), AppError> {
    if point.is_valid() {
        return Ok(());
    }
    Err(AppError::new(ErrorCode::InvalidCoordinates)
        .with_detail("latitude", finite_or_null(point.latitude))
        .with_detail("longitude", finite_or_null(point.longitude)))
}

fn check_geofence(ctx: &ClockContext, point: GeoPoint) -> Result<f64, AppError> {
    let distance = haversine_miles(point, ctx.venue);
    if distance > ctx.radius_miles {
        return Err(AppError::with_message(
            ErrorCode::OutsideGeofence,
            format!(
                "You are {:.2} miles from the venue (max {:.2})",
                distance, ctx.radius_miles
            ),
        )
        .with_detail("distance_miles", round3(distance))
        .with_detail("radius_miles", ctx.radius_miles));
    }
    Ok(distance)
}

fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

fn finite_or_null(v: f64) -> serde_json::Value {
    serde_json::Number::from_f64(v)
        .map(serde_json::Value::Number)
        .unwrap_or(serde_json::Value::Null)
}
