//! Payment calculation
//!
//! Hours are split into regular and overtime per employee, accumulating in
//! chronological order within a period: the first
//! [`WEEKLY_OVERTIME_THRESHOLD_HOURS`] are regular, the rest is paid at
//! [`OVERTIME_MULTIPLIER`]. All arithmetic runs on `Decimal`; results are
//! rounded to 2 dp (half away from zero) for storage.

use std::collections::HashMap;

use rust_decimal::prelude::*;

use crate::db::repository::clockin::PayableClockin;
use crate::db::repository::payroll::NewPayment;

const DECIMAL_PLACES: u32 = 2;
const MS_PER_HOUR: i64 = 3_600_000;

pub const WEEKLY_OVERTIME_THRESHOLD_HOURS: Decimal = Decimal::from_parts(40, 0, 0, false, 0);
pub const OVERTIME_MULTIPLIER: Decimal = Decimal::from_parts(15, 0, 0, false, 1);

#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    round(value).to_f64().unwrap_or_default()
}

#[inline]
fn round(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Worked hours of a clock-in after the break, never negative
pub fn worked_hours(started_at: i64, ended_at: i64, breaktime_minutes: i64) -> Decimal {
    let worked_ms = ended_at
        .saturating_sub(started_at)
        .saturating_sub(breaktime_minutes.saturating_mul(60_000))
        .max(0);
    Decimal::from(worked_ms) / Decimal::from(MS_PER_HOUR)
}

/// `regular * rate + over_time * rate * 1.5`, rounded
pub fn payment_total(regular_hours: f64, over_time: f64, hourly_rate: f64) -> f64 {
    let rate = to_decimal(hourly_rate);
    let total = to_decimal(regular_hours) * rate
        + to_decimal(over_time) * rate * OVERTIME_MULTIPLIER;
    to_f64(total)
}

/// Turn payable clock-ins into payments
///
/// `prior_hours` holds hours already paid per employee in the same period
/// (for top-ups of an existing period).
pub fn calculate_payments(
    clockins: &[PayableClockin],
    prior_hours: &HashMap<i64, f64>,
) -> Vec<NewPayment> {
    let mut ordered: Vec<&PayableClockin> = clockins.iter().collect();
    ordered.sort_by_key(|c| (c.employee_id, c.started_at, c.id));

    let mut accumulated: HashMap<i64, Decimal> = prior_hours
        .iter()
        .map(|(id, hours)| (*id, to_decimal(*hours)))
        .collect();

    ordered
        .into_iter()
        .map(|c| {
            let hours = round(worked_hours(c.started_at, c.ended_at, 0));
            let acc = accumulated.entry(c.employee_id).or_default();
            let regular_room = (WEEKLY_OVERTIME_THRESHOLD_HOURS - *acc).max(Decimal::ZERO);
            let regular = hours.min(regular_room);
            let over_time = hours - regular;
            *acc += hours;

            let regular_hours = to_f64(regular);
            let over_time = to_f64(over_time);
            NewPayment {
                employee_id: c.employee_id,
                shift_id: c.shift_id,
                clockin_id: c.id,
                regular_hours,
                over_time,
                breaktime_minutes: 0,
                hourly_rate: c.hourly_rate,
                total_amount: payment_total(regular_hours, over_time, c.hourly_rate),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::util::HOUR_MS;

    const T0: i64 = 1_704_700_800_000; // Monday 2024-01-08 08:00 UTC

    fn clockin(id: i64, employee_id: i64, day: i64, hours: i64, rate: f64) -> PayableClockin {
        let started_at = T0 + day * 24 * HOUR_MS;
        PayableClockin {
            id,
            shift_id: 100 + id,
            employee_id,
            started_at,
            ended_at: started_at + hours * HOUR_MS,
            hourly_rate: rate,
        }
    }

    #[test]
    fn test_no_overtime_under_threshold() {
        let payments = calculate_payments(&[clockin(1, 1, 0, 8, 15.0)], &HashMap::new());
        assert_eq!(payments.len(), 1);
        assert_eq!(payments[0].regular_hours, 8.0);
        assert_eq!(payments[0].over_time, 0.0);
        assert_eq!(payments[0].total_amount, 120.0);
    }

    #[test]
    fn test_overtime_split_across_clockins() {
        // 4 x 10h + 1 x 6h = 46h -> 40 regular + 6 overtime
        let clockins: Vec<_> = (0..5)
            .map(|d| clockin(d + 1, 7, d, if d == 4 { 6 } else { 10 }, 20.0))
            .collect();
        let payments = calculate_payments(&clockins, &HashMap::new());

        let regular: f64 = payments.iter().map(|p| p.regular_hours).sum();
        let over: f64 = payments.iter().map(|p| p.over_time).sum();
        assert_eq!(regular, 40.0);
        assert_eq!(over, 6.0);

        let last = payments.last().unwrap();
        assert_eq!(last.clockin_id, 5);
        assert_eq!(last.regular_hours, 0.0);
        assert_eq!(last.over_time, 6.0);
        assert_eq!(last.total_amount, 180.0); // 6 * 20 * 1.5
    }

    #[test]
    fn test_split_inside_one_clockin() {
        let clockins = [clockin(1, 1, 0, 36, 10.0), clockin(2, 1, 2, 8, 10.0)];
        let payments = calculate_payments(&clockins, &HashMap::new());
        assert_eq!(payments[1].regular_hours, 4.0);
        assert_eq!(payments[1].over_time, 4.0);
        assert_eq!(payments[1].total_amount, 100.0); // 4*10 + 4*15
    }

    #[test]
    fn test_chronological_even_when_unsorted() {
        let clockins = [clockin(2, 1, 3, 8, 10.0), clockin(1, 1, 0, 38, 10.0)];
        let payments = calculate_payments(&clockins, &HashMap::new());
        let late = payments.iter().find(|p| p.clockin_id == 2).unwrap();
        assert_eq!(late.regular_hours, 2.0);
        assert_eq!(late.over_time, 6.0);
    }

    #[test]
    fn test_employees_accumulate_separately() {
        let clockins = [clockin(1, 1, 0, 30, 10.0), clockin(2, 2, 0, 30, 10.0)];
        let payments = calculate_payments(&clockins, &HashMap::new());
        assert!(payments.iter().all(|p| p.over_time == 0.0));
    }

    #[test]
    fn test_prior_hours_count_toward_threshold() {
        let prior = HashMap::from([(1, 38.0)]);
        let payments = calculate_payments(&[clockin(1, 1, 5, 4, 10.0)], &prior);
        assert_eq!(payments[0].regular_hours, 2.0);
        assert_eq!(payments[0].over_time, 2.0);
    }

    #[test]
    fn test_fractional_hours_round_half_up() {
        let mut c = clockin(1, 1, 0, 0, 12.5);
        // 1h 20m 30s = 1.341666.. h
        c.ended_at = c.started_at + HOUR_MS + 20 * 60_000 + 30_000;
        let payments = calculate_payments(&[c], &HashMap::new());
        assert_eq!(payments[0].regular_hours, 1.34);
        assert_eq!(payments[0].total_amount, 16.75);
    }

    #[test]
    fn test_payment_total() {
        assert_eq!(payment_total(40.0, 2.5, 18.0), 787.5);
        assert_eq!(payment_total(0.0, 0.0, 18.0), 0.0);
    }

    #[test]
    fn test_worked_hours_subtracts_break() {
        let h = worked_hours(0, 8 * HOUR_MS, 30);
        assert_eq!(h, Decimal::new(75, 1));
        assert_eq!(worked_hours(0, HOUR_MS, 90), Decimal::ZERO);
    }

    #[test]
    fn test_worked_hours_extreme_inputs() {
        assert!(worked_hours(i64::MIN, i64::MAX, 0) > Decimal::from(i64::MAX / HOUR_MS));
        assert_eq!(worked_hours(0, HOUR_MS, i64::MAX), Decimal::ZERO);
    }
}
