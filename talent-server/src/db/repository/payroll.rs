//! Payroll Repository
//!
//! Period totals are recomputed from the payments in the same
//! transaction as every payment write.

use super::{RepoError, RepoResult};
use shared::models::{PaymentStatus, PayrollPayment, PayrollPeriod, PayrollQuery, PayrollStatus};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

const PERIOD_COLUMNS: &str =
    "id, employer_id, starting_at, ending_at, status, total_hours, total_amount, created_at";
const PAYMENT_COLUMNS: &str = "id, period_id, employee_id, shift_id, clockin_id, regular_hours, over_time, breaktime_minutes, hourly_rate, total_amount, status";

/// Payment row to insert
#[derive(Debug, Clone, PartialEq)]
pub struct NewPayment {
    pub employee_id: i64,
    pub shift_id: i64,
    pub clockin_id: i64,
    pub regular_hours: f64,
    pub over_time: f64,
    pub breaktime_minutes: i64,
    pub hourly_rate: f64,
    pub total_amount: f64,
}

/// Editable payment figures
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaymentFigures {
    pub regular_hours: f64,
    pub over_time: f64,
    pub breaktime_minutes: i64,
    pub hourly_rate: f64,
    pub total_amount: f64,
}

pub async fn find_period(pool: &SqlitePool, id: i64) -> RepoResult<Option<PayrollPeriod>> {
    let period = sqlx::query_as::<_, PayrollPeriod>(&format!(
        "SELECT {PERIOD_COLUMNS} FROM payroll_period WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(period)
}

pub async fn find_periods(
    pool: &SqlitePool,
    employer_id: i64,
    query: &PayrollQuery,
    limit: i64,
    offset: i64,
) -> RepoResult<Vec<PayrollPeriod>> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
        "SELECT {PERIOD_COLUMNS} FROM payroll_period WHERE employer_id = "
    ));
    qb.push_bind(employer_id);
    if let Some(status) = query.status {
        qb.push(" AND status = ").push_bind(status);
    }
    qb.push(" ORDER BY starting_at DESC LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(offset);

    let periods = qb.build_query_as::<PayrollPeriod>().fetch_all(pool).await?;
    Ok(periods)
}

/// FINALIZED or PAID period of an employer covering `ts`
pub async fn closed_period_at(
    pool: &SqlitePool,
    employer_id: i64,
    ts: i64,
) -> RepoResult<Option<PayrollPeriod>> {
    let period = sqlx::query_as::<_, PayrollPeriod>(&format!(
        "SELECT {PERIOD_COLUMNS} FROM payroll_period \
         WHERE employer_id = ? AND starting_at <= ? AND ending_at > ? AND status IN ('FINALIZED', 'PAID')"
    ))
    .bind(employer_id)
    .bind(ts)
    .bind(ts)
    .fetch_optional(pool)
    .await?;
    Ok(period)
}

/// OPEN periods of an employer, oldest first
pub async fn open_periods(pool: &SqlitePool, employer_id: i64) -> RepoResult<Vec<PayrollPeriod>> {
    let periods = sqlx::query_as::<_, PayrollPeriod>(&format!(
        "SELECT {PERIOD_COLUMNS} FROM payroll_period WHERE employer_id = ? AND status = 'OPEN' ORDER BY starting_at"
    ))
    .bind(employer_id)
    .fetch_all(pool)
    .await?;
    Ok(periods)
}

/// Hours already paid per employee in a period, as `(employee_id, hours)`
pub async fn hours_by_employee(pool: &SqlitePool, period_id: i64) -> RepoResult<Vec<(i64, f64)>> {
    let rows = sqlx::query_as::<_, (i64, f64)>(
        "SELECT employee_id, SUM(regular_hours + over_time) FROM payroll_payment WHERE period_id = ? GROUP BY employee_id",
    )
    .bind(period_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Most recent period of an employer
pub async fn latest_period(pool: &SqlitePool, employer_id: i64) -> RepoResult<Option<PayrollPeriod>> {
    let period = sqlx::query_as::<_, PayrollPeriod>(&format!(
        "SELECT {PERIOD_COLUMNS} FROM payroll_period WHERE employer_id = ? ORDER BY starting_at DESC LIMIT 1"
    ))
    .bind(employer_id)
    .fetch_optional(pool)
    .await?;
    Ok(period)
}

/// Insert a period with its payments
///
/// Returns `None` if a period with the same start already exists.
/// Payments for clock-ins that are already paid elsewhere are skipped.
pub async fn create_period(
    pool: &SqlitePool,
    employer_id: i64,
    starting_at: i64,
    ending_at: i64,
    payments: &[NewPayment],
    now: i64,
) -> RepoResult<Option<(PayrollPeriod, usize)>> {
    let mut tx = pool.begin().await?;

    let id: Option<i64> = sqlx::query_scalar(
        "INSERT INTO payroll_period (employer_id, starting_at, ending_at, status, created_at) \
         VALUES (?, ?, ?, 'OPEN', ?) ON CONFLICT (employer_id, starting_at) DO NOTHING RETURNING id",
    )
    .bind(employer_id)
    .bind(starting_at)
    .bind(ending_at)
    .bind(now)
    .fetch_optional(&mut *tx)
    .await?;
    let Some(id) = id else {
        return Ok(None);
    };

    let inserted = insert_payments(&mut tx, id, payments).await?;
    recompute_totals(&mut tx, id).await?;
    tx.commit().await?;

    let period = find_period(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create payroll period".into()))?;
    Ok(Some((period, inserted)))
}

/// Attach more payments to an OPEN period; returns how many were new
pub async fn add_payments(
    pool: &SqlitePool,
    period_id: i64,
    payments: &[NewPayment],
) -> RepoResult<usize> {
    let mut tx = pool.begin().await?;

    let open: Option<i64> = sqlx::query_scalar(
        "SELECT id FROM payroll_period WHERE id = ? AND status = 'OPEN'",
    )
    .bind(period_id)
    .fetch_optional(&mut *tx)
    .await?;
    if open.is_none() {
        return Ok(0);
    }

    let inserted = insert_payments(&mut tx, period_id, payments).await?;
    if inserted > 0 {
        recompute_totals(&mut tx, period_id).await?;
        tx.commit().await?;
    }
    Ok(inserted)
}

/// Drop the payment of a clock-in from an OPEN period so it is
/// recalculated on the next generation; false when there was none
pub async fn detach_clockin(pool: &SqlitePool, clockin_id: i64) -> RepoResult<bool> {
    let mut tx = pool.begin().await?;

    let period_id: Option<i64> = sqlx::query_scalar(
        "DELETE FROM payroll_payment WHERE clockin_id = ? \
         AND period_id IN (SELECT id FROM payroll_period WHERE status = 'OPEN') RETURNING period_id",
    )
    .bind(clockin_id)
    .fetch_optional(&mut *tx)
    .await?;
    let Some(period_id) = period_id else {
        return Ok(false);
    };

    recompute_totals(&mut tx, period_id).await?;
    tx.commit().await?;
    Ok(true)
}

async fn insert_payments(
    conn: &mut SqliteConnection,
    period_id: i64,
    payments: &[NewPayment],
) -> RepoResult<usize> {
    let mut inserted = 0;
    for payment in payments {
        let rows = sqlx::query(
            "INSERT OR IGNORE INTO payroll_payment (period_id, employee_id, shift_id, clockin_id, regular_hours, over_time, breaktime_minutes, hourly_rate, total_amount, status) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 'PENDING')",
        )
        .bind(period_id)
        .bind(payment.employee_id)
        .bind(payment.shift_id)
        .bind(payment.clockin_id)
        .bind(payment.regular_hours)
        .bind(payment.over_time)
        .bind(payment.breaktime_minutes)
        .bind(payment.hourly_rate)
        .bind(payment.total_amount)
        .execute(&mut *conn)
        .await?;
        inserted += rows.rows_affected() as usize;
    }
    Ok(inserted)
}

async fn recompute_totals(conn: &mut SqliteConnection, period_id: i64) -> RepoResult<()> {
    sqlx::query(
        "UPDATE payroll_period SET \
             total_hours = (SELECT ROUND(COALESCE(SUM(regular_hours + over_time), 0), 2) FROM payroll_payment WHERE period_id = ?1), \
             total_amount = (SELECT ROUND(COALESCE(SUM(total_amount), 0), 2) FROM payroll_payment WHERE period_id = ?1) \
         WHERE id = ?1",
    )
    .bind(period_id)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn find_payment(pool: &SqlitePool, id: i64) -> RepoResult<Option<PayrollPayment>> {
    let payment = sqlx::query_as::<_, PayrollPayment>(&format!(
        "SELECT {PAYMENT_COLUMNS} FROM payroll_payment WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(payment)
}

pub async fn payments_by_period(pool: &SqlitePool, period_id: i64) -> RepoResult<Vec<PayrollPayment>> {
    let payments = sqlx::query_as::<_, PayrollPayment>(&format!(
        "SELECT {PAYMENT_COLUMNS} FROM payroll_payment WHERE period_id = ? ORDER BY employee_id, id"
    ))
    .bind(period_id)
    .fetch_all(pool)
    .await?;
    Ok(payments)
}

pub async fn payments_by_employee(
    pool: &SqlitePool,
    employee_id: i64,
    limit: i64,
    offset: i64,
) -> RepoResult<Vec<PayrollPayment>> {
    let payments = sqlx::query_as::<_, PayrollPayment>(&format!(
        "SELECT {PAYMENT_COLUMNS} FROM payroll_payment WHERE employee_id = ? ORDER BY id DESC LIMIT ? OFFSET ?"
    ))
    .bind(employee_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(payments)
}

/// Overwrite a payment while its period is OPEN; `None` when the period
/// is no longer OPEN
pub async fn update_payment(
    pool: &SqlitePool,
    id: i64,
    figures: PaymentFigures,
) -> RepoResult<Option<PayrollPayment>> {
    let mut tx = pool.begin().await?;

    let period_id: Option<i64> = sqlx::query_scalar(
        "UPDATE payroll_payment SET regular_hours = ?, over_time = ?, breaktime_minutes = ?, hourly_rate = ?, total_amount = ? \
         WHERE id = ? AND period_id IN (SELECT id FROM payroll_period WHERE status = 'OPEN') RETURNING period_id",
    )
    .bind(figures.regular_hours)
    .bind(figures.over_time)
    .bind(figures.breaktime_minutes)
    .bind(figures.hourly_rate)
    .bind(figures.total_amount)
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?;
    let Some(period_id) = period_id else {
        return Ok(None);
    };

    recompute_totals(&mut tx, period_id).await?;
    tx.commit().await?;

    find_payment(pool, id).await
}

/// Move a period from `from` to `to` and set all its payments to
/// `payment_status`; false when the period was not in `from`
pub async fn transition(
    pool: &SqlitePool,
    id: i64,
    from: PayrollStatus,
    to: PayrollStatus,
    payment_status: PaymentStatus,
) -> RepoResult<bool> {
    let mut tx = pool.begin().await?;

    let rows = sqlx::query("UPDATE payroll_period SET status = ? WHERE id = ? AND status = ?")
        .bind(to)
        .bind(id)
        .bind(from)
        .execute(&mut *tx)
        .await?;
    if rows.rows_affected() == 0 {
        return Ok(false);
    }

    sqlx::query("UPDATE payroll_payment SET status = ? WHERE period_id = ?")
        .bind(payment_status)
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(true)
}

/// User ids of the employees paid in a period
pub async fn employee_user_ids(pool: &SqlitePool, period_id: i64) -> RepoResult<Vec<i64>> {
    let ids = sqlx::query_scalar::<_, i64>(
        "SELECT DISTINCT e.user_id FROM payroll_payment p JOIN employee e ON e.id = p.employee_id WHERE p.period_id = ?",
    )
    .bind(period_id)
    .fetch_all(pool)
    .await?;
    Ok(ids)
}
