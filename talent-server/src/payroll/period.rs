//! Payroll period boundaries
//!
//! Periods are one week long and start on the employer's
//! `payroll_period_starting_weekday` (0 = Monday) at
//! `payroll_period_starting_time` minutes after midnight UTC. After the
//! employer changes either setting, one shorter period bridges the old
//! boundary to the new one.

use shared::util::{DAY_MS, MINUTE_MS, WEEK_MS};

/// 1970-01-01 was a Thursday
const EPOCH_WEEKDAY: i64 = 3;

/// Latest period boundary `<= ts`
pub fn period_start_for(ts: i64, weekday: i64, time_minutes: i64) -> i64 {
    let days_from_epoch = (weekday - EPOCH_WEEKDAY).rem_euclid(7);
    let anchor = days_from_epoch * DAY_MS + time_minutes * MINUTE_MS;
    anchor + (ts - anchor).div_euclid(WEEK_MS) * WEEK_MS
}

/// `[start, end)` of the period containing `ts`
pub fn period_bounds(ts: i64, weekday: i64, time_minutes: i64) -> (i64, i64) {
    let start = period_start_for(ts, weekday, time_minutes);
    (start, start + WEEK_MS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone, Timelike, Utc, Weekday};
    use shared::util::HOUR_MS;

    fn ts(y: i32, m: u32, d: u32, h: u32, min: u32) -> i64 {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0)
            .unwrap()
            .timestamp_millis()
    }

    #[test]
    fn test_monday_midnight() {
        // Wednesday 2024-01-10 13:30 -> Monday 2024-01-08 00:00
        let start = period_start_for(ts(2024, 1, 10, 13, 30), 0, 0);
        assert_eq!(start, ts(2024, 1, 8, 0, 0));
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let monday = ts(2024, 1, 8, 0, 0);
        assert_eq!(period_start_for(monday, 0, 0), monday);
        assert_eq!(period_start_for(monday - 1, 0, 0), ts(2024, 1, 1, 0, 0));
    }

    #[test]
    fn test_weekday_and_time() {
        // Fridays at 06:00
        let start = period_start_for(ts(2024, 1, 10, 13, 30), 4, 6 * 60);
        assert_eq!(start, ts(2024, 1, 5, 6, 0));

        let dt = Utc.timestamp_millis_opt(start).unwrap();
        assert_eq!(dt.weekday(), Weekday::Fri);
        assert_eq!(dt.hour(), 6);
    }

    #[test]
    fn test_same_day_before_start_time() {
        // Monday 05:00 with periods starting Monday 06:00 belongs to the previous week
        let start = period_start_for(ts(2024, 1, 8, 5, 0), 0, 6 * 60);
        assert_eq!(start, ts(2024, 1, 1, 6, 0));
    }

    #[test]
    fn test_every_weekday_alignment() {
        let now = ts(2024, 3, 14, 12, 0);
        for weekday in 0..7 {
            let (start, end) = period_bounds(now, weekday, 0);
            assert!(start <= now && now < end);
            assert_eq!(end - start, WEEK_MS);
            let dt = Utc.timestamp_millis_opt(start).unwrap();
            assert_eq!(dt.weekday().num_days_from_monday() as i64, weekday);
        }
    }

    #[test]
    fn test_bounds_from_old_boundary_reach_new_alignment() {
        // Old Monday boundary, periods now start on Thursdays
        let monday = ts(2024, 1, 8, 0, 0);
        let (_, end) = period_bounds(monday, 3, 0);
        assert_eq!(end, ts(2024, 1, 11, 0, 0));
        let (_, next) = period_bounds(end, 3, 0);
        assert_eq!(next - end, WEEK_MS);
    }

    #[test]
    fn test_before_epoch() {
        let t = -3 * HOUR_MS;
        let start = period_start_for(t, 0, 0);
        assert!(start <= t && t < start + WEEK_MS);
    }
}
