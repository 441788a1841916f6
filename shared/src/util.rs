//! Time helpers shared by the server and its tests

/// One minute in milliseconds
pub const MINUTE_MS: i64 = 60_000;
/// One hour in milliseconds
pub const HOUR_MS: i64 = 60 * MINUTE_MS;
/// One day in milliseconds
pub const DAY_MS: i64 = 24 * HOUR_MS;
/// One week in milliseconds
pub const WEEK_MS: i64 = 7 * DAY_MS;

/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Minutes to milliseconds
#[inline]
pub const fn minutes(m: i64) -> i64 {
    m * MINUTE_MS
}

/// Render a millisecond timestamp as RFC 3339 (for messages and logs)
pub fn format_millis(ts: i64) -> String {
    chrono::DateTime::from_timestamp_millis(ts)
        .map(|dt| dt.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
        .unwrap_or_else(|| ts.to_string())
}
