//! Payroll service

use std::collections::HashMap;

use serde_json::json;
use shared::models::{
    GenerateResult, NotificationKind, PaymentStatus, PaymentUpdate, PayrollPayment,
    PayrollPeriod, PayrollPeriodDetail, PayrollQuery, PayrollStatus,
};
use shared::util::format_millis;
use sqlx::SqlitePool;

use super::calculator::{calculate_payments, payment_total, to_decimal, to_f64, worked_hours};
use super::period::{period_bounds, period_start_for};
use crate::db::repository::clockin::PayableClockin;
use crate::db::repository::payroll::PaymentFigures;
use crate::db::repository::{clockin, employer, payroll};
use crate::notify;
use crate::utils::validation::page;
use crate::utils::{AppError, AppResult, ErrorCode};

/// Upper bound on periods created by one generation run
const MAX_PERIODS_PER_RUN: usize = 104;

/// Create every complete period up to `now` and attach payments
///
/// Existing OPEN periods are topped up with clock-ins that closed after
/// they were generated. Clock-ins whose week was already finalized when
/// they closed go to the next OPEN period. New periods follow the
/// employer's current start weekday and time. Running it twice creates
/// nothing new.
pub async fn generate_periods(
    pool: &SqlitePool,
    employer_id: i64,
    now: i64,
) -> AppResult<GenerateResult> {
    let employer = employer::find_by_id(pool, employer_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::EmployerNotFound))?;

    let mut result = GenerateResult::default();

    for period in payroll::open_periods(pool, employer_id).await? {
        let payable =
            clockin::find_payable(pool, employer_id, period.starting_at, period.ending_at).await?;
        if payable.is_empty() {
            continue;
        }
        let prior: HashMap<i64, f64> = payroll::hours_by_employee(pool, period.id)
            .await?
            .into_iter()
            .collect();
        let payments = calculate_payments(&payable, &prior);
        result.payments_created += payroll::add_payments(pool, period.id, &payments).await?;
    }

    let next_start = match payroll::latest_period(pool, employer_id).await? {
        Some(latest) => Some(latest.ending_at),
        None => clockin::earliest_payable_start(pool, employer_id)
            .await?
            .map(|ts| {
                period_start_for(
                    ts,
                    employer.payroll_period_starting_weekday,
                    employer.payroll_period_starting_time,
                )
            }),
    };

    if let Some(mut start) = next_start {
        loop {
            // Ends on the next boundary of the current settings, so a changed
            // weekday or time gets a shorter bridging period first
            let (_, end) = period_bounds(
                start,
                employer.payroll_period_starting_weekday,
                employer.payroll_period_starting_time,
            );
            if end > now || result.periods_created >= MAX_PERIODS_PER_RUN {
                break;
            }
            let payable = clockin::find_payable(pool, employer_id, start, end).await?;
            let payments = calculate_payments(&payable, &HashMap::new());

            if let Some((period, inserted)) =
                payroll::create_period(pool, employer_id, start, end, &payments, now).await?
            {
                tracing::info!(
                    employer_id,
                    period_id = period.id,
                    starting_at = %format_millis(start),
                    payments = inserted,
                    "Payroll period created"
                );
                result.periods_created += 1;
                result.payments_created += inserted;
                result.periods.push(period);
            }
            start = end;
        }
    }

    result.payments_created += carry_unscheduled(pool, employer_id).await?;
    Ok(result)
}

/// Pay clock-ins that no OPEN period covers in the first OPEN period
/// starting after them; they wait while there is none
async fn carry_unscheduled(pool: &SqlitePool, employer_id: i64) -> AppResult<usize> {
    let Some(latest) = payroll::latest_period(pool, employer_id).await? else {
        return Ok(0);
    };
    let stray = clockin::find_unscheduled(pool, employer_id, latest.ending_at).await?;
    if stray.is_empty() {
        return Ok(0);
    }

    let open = payroll::open_periods(pool, employer_id).await?;
    let mut by_period: HashMap<i64, Vec<PayableClockin>> = HashMap::new();
    for c in stray {
        if let Some(period) = open.iter().find(|p| p.starting_at > c.started_at) {
            by_period.entry(period.id).or_default().push(c);
        }
    }

    let mut created = 0;
    for (period_id, clockins) in by_period {
        let prior: HashMap<i64, f64> = payroll::hours_by_employee(pool, period_id)
            .await?
            .into_iter()
            .collect();
        let payments = calculate_payments(&clockins, &prior);
        let inserted = payroll::add_payments(pool, period_id, &payments).await?;
        tracing::info!(
            employer_id,
            period_id,
            payments = inserted,
            "Late clock-ins carried into open period"
        );
        created += inserted;
    }
    Ok(created)
}

pub async fn list_periods(
    pool: &SqlitePool,
    employer_id: i64,
    query: &PayrollQuery,
) -> AppResult<Vec<PayrollPeriod>> {
    let (limit, offset) = page(query.limit, query.offset);
    Ok(payroll::find_periods(pool, employer_id, query, limit, offset).await?)
}

pub async fn get_period(
    pool: &SqlitePool,
    employer_id: i64,
    id: i64,
) -> AppResult<PayrollPeriodDetail> {
    let period = owned_period(pool, employer_id, id).await?;
    let payments = payroll::payments_by_period(pool, id).await?;
    Ok(PayrollPeriodDetail { period, payments })
}

/// Edit a payment of an OPEN period; the total is recalculated
///
/// Changing only the break recomputes the hours from the clock-in,
/// keeping the overtime part where it still fits.
pub async fn update_payment(
    pool: &SqlitePool,
    employer_id: i64,
    payment_id: i64,
    data: &PaymentUpdate,
) -> AppResult<PayrollPayment> {
    let payment = payroll::find_payment(pool, payment_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::PaymentNotFound))?;
    let period = match payroll::find_period(pool, payment.period_id).await? {
        Some(p) if p.employer_id == employer_id => p,
        _ => return Err(AppError::new(ErrorCode::PaymentNotFound)),
    };
    if period.status != PayrollStatus::Open {
        return Err(AppError::new(ErrorCode::PayrollPeriodNotOpen)
            .with_detail("status", period.status.as_str()));
    }

    let breaktime_minutes = data.breaktime_minutes.unwrap_or(payment.breaktime_minutes);
    let (mut regular_hours, mut over_time) = (payment.regular_hours, payment.over_time);

    let hours_given = data.regular_hours.is_some() || data.over_time.is_some();
    if !hours_given && breaktime_minutes != payment.breaktime_minutes {
        let record = clockin::find_by_id(pool, payment.clockin_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::ClockinNotFound))?;
        if let Some(ended_at) = record.ended_at {
            let worked = to_f64(worked_hours(record.started_at, ended_at, breaktime_minutes));
            over_time = payment.over_time.min(worked);
            regular_hours = to_f64(to_decimal(worked) - to_decimal(over_time));
        }
    }
    if let Some(h) = data.regular_hours {
        regular_hours = h;
    }
    if let Some(h) = data.over_time {
        over_time = h;
    }
    let hourly_rate = data.hourly_rate.unwrap_or(payment.hourly_rate);

    let figures = PaymentFigures {
        regular_hours,
        over_time,
        breaktime_minutes,
        hourly_rate,
        total_amount: payment_total(regular_hours, over_time, hourly_rate),
    };
    let updated = payroll::update_payment(pool, payment_id, figures)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::PayrollPeriodNotOpen))?;

    tracing::info!(
        payment_id,
        period_id = payment.period_id,
        total_amount = updated.total_amount,
        "Payroll payment updated"
    );
    Ok(updated)
}

/// OPEN -> FINALIZED; payments become APPROVED and employees are told
pub async fn finalize(pool: &SqlitePool, employer_id: i64, id: i64) -> AppResult<PayrollPeriod> {
    let period = owned_period(pool, employer_id, id).await?;
    let moved = payroll::transition(
        pool,
        id,
        PayrollStatus::Open,
        PayrollStatus::Finalized,
        PaymentStatus::Approved,
    )
    .await?;
    if !moved {
        return Err(invalid_transition(&period, PayrollStatus::Finalized));
    }

    let range = format!(
        "{} - {}",
        format_millis(period.starting_at),
        format_millis(period.ending_at)
    );
    for user_id in payroll::employee_user_ids(pool, id).await? {
        notify::send(
            pool,
            user_id,
            NotificationKind::PayrollFinalized,
            "Payroll finalized",
            format!("Your payments for {range} were approved"),
            json!({ "period_id": id }),
        )
        .await;
    }

    tracing::info!(employer_id, period_id = id, "Payroll period finalized");
    reload(pool, id).await
}

/// FINALIZED -> PAID; payments become PAID
pub async fn mark_paid(pool: &SqlitePool, employer_id: i64, id: i64) -> AppResult<PayrollPeriod> {
    let period = owned_period(pool, employer_id, id).await?;
    let moved = payroll::transition(
        pool,
        id,
        PayrollStatus::Finalized,
        PayrollStatus::Paid,
        PaymentStatus::Paid,
    )
    .await?;
    if !moved {
        return Err(invalid_transition(&period, PayrollStatus::Paid));
    }

    tracing::info!(employer_id, period_id = id, "Payroll period paid");
    reload(pool, id).await
}

pub async fn employee_payments(
    pool: &SqlitePool,
    employee_id: i64,
    limit: Option<i64>,
    offset: Option<i64>,
) -> AppResult<Vec<PayrollPayment>> {
    let (limit, offset) = page(limit, offset);
    Ok(payroll::payments_by_employee(pool, employee_id, limit, offset).await?)
}

async fn owned_period(pool: &SqlitePool, employer_id: i64, id: i64) -> AppResult<PayrollPeriod> {
    match payroll::find_period(pool, id).await? {
        Some(p) if p.employer_id == employer_id => Ok(p),
        _ => Err(AppError::new(ErrorCode::PayrollPeriodNotFound)),
    }
}

async fn reload(pool: &SqlitePool, id: i64) -> AppResult<PayrollPeriod> {
    payroll::find_period(pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::PayrollPeriodNotFound))
}

fn invalid_transition(period: &PayrollPeriod, to: PayrollStatus) -> AppError {
    AppError::with_message(
        ErrorCode::PayrollInvalidTransition,
        format!(
            "Cannot move payroll period from {} to {}",
            period.status.as_str(),
            to.as_str()
        ),
    )
    .with_detail("status", period.status.as_str())
}
