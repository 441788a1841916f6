//! Clock-in Repository

use super::{RepoError, RepoResult};
use shared::geo::GeoPoint;
use shared::models::{Clockin, ClockinQuery};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

const COLUMNS: &str = "id, shift_id, employee_id, author_user_id, started_at, ended_at, latitude_in, longitude_in, latitude_out, longitude_out, distance_in_miles, distance_out_miles, automatically_closed, created_at";

/// A closed clock-in ready to be paid, with the shift's rate
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PayableClockin {
    pub id: i64,
    pub shift_id: i64,
    pub employee_id: i64,
    pub started_at: i64,
    pub ended_at: i64,
    pub hourly_rate: f64,
}

/// Where and how far from the venue a punch happened
#[derive(Debug, Clone, Copy)]
pub struct Punch {
    pub at: i64,
    pub point: GeoPoint,
    pub distance_miles: f64,
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Clockin>> {
    let clockin = sqlx::query_as::<_, Clockin>(&format!("SELECT {COLUMNS} FROM clockin WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(clockin)
}

/// The open clock-in of an employee on a shift, if any
pub async fn find_open(
    pool: &SqlitePool,
    shift_id: i64,
    employee_id: i64,
) -> RepoResult<Option<Clockin>> {
    let clockin = sqlx::query_as::<_, Clockin>(&format!(
        "SELECT {COLUMNS} FROM clockin WHERE shift_id = ? AND employee_id = ? AND ended_at IS NULL"
    ))
    .bind(shift_id)
    .bind(employee_id)
    .fetch_optional(pool)
    .await?;
    Ok(clockin)
}

/// Open a clock-in from an employee punch
///
/// The partial unique index on open clock-ins turns a concurrent second
/// punch into [`RepoError::Duplicate`].
pub async fn open(
    pool: &SqlitePool,
    shift_id: i64,
    employee_id: i64,
    author_user_id: i64,
    punch: Punch,
) -> RepoResult<Clockin> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO clockin (shift_id, employee_id, author_user_id, started_at, latitude_in, longitude_in, distance_in_miles, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?4) RETURNING id",
    )
    .bind(shift_id)
    .bind(employee_id)
    .bind(author_user_id)
    .bind(punch.at)
    .bind(punch.point.latitude)
    .bind(punch.point.longitude)
    .bind(punch.distance_miles)
    .fetch_one(pool)
    .await
    .map_err(|e| match RepoError::from(e) {
        RepoError::Duplicate(_) => RepoError::Duplicate("Already clocked in".into()),
        other => other,
    })?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create clock-in".into()))
}

/// Close an open clock-in from an employee punch
pub async fn close(pool: &SqlitePool, id: i64, punch: Punch) -> RepoResult<Clockin> {
    let rows = sqlx::query(
        "UPDATE clockin SET ended_at = ?, latitude_out = ?, longitude_out = ?, distance_out_miles = ? \
         WHERE id = ? AND ended_at IS NULL",
    )
    .bind(punch.at)
    .bind(punch.point.latitude)
    .bind(punch.point.longitude)
    .bind(punch.distance_miles)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Open clock-in {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Clock-in {id} not found")))
}

/// Employer-entered clock-in, no coordinates
pub async fn create_manual(
    pool: &SqlitePool,
    shift_id: i64,
    employee_id: i64,
    author_user_id: i64,
    started_at: i64,
    ended_at: Option<i64>,
    now: i64,
) -> RepoResult<Clockin> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO clockin (shift_id, employee_id, author_user_id, started_at, ended_at, created_at) \
         VALUES (?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(shift_id)
    .bind(employee_id)
    .bind(author_user_id)
    .bind(started_at)
    .bind(ended_at)
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(|e| match RepoError::from(e) {
        RepoError::Duplicate(_) => {
            RepoError::Duplicate("Employee already has an open clock-in on this shift".into())
        }
        other => other,
    })?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create clock-in".into()))
}

/// Overwrite the times of a clock-in
pub async fn update_times(
    pool: &SqlitePool,
    id: i64,
    started_at: i64,
    ended_at: Option<i64>,
) -> RepoResult<Clockin> {
    let rows = sqlx::query("UPDATE clockin SET started_at = ?, ended_at = ? WHERE id = ?")
        .bind(started_at)
        .bind(ended_at)
        .bind(id)
        .execute(pool)
        .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Clock-in {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Clock-in {id} not found")))
}

/// Clock-ins on an employer's shifts
pub async fn find_for_employer(
    pool: &SqlitePool,
    employer_id: i64,
    query: &ClockinQuery,
    limit: i64,
    offset: i64,
) -> RepoResult<Vec<Clockin>> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
        "SELECT c.id, c.shift_id, c.employee_id, c.author_user_id, c.started_at, c.ended_at, c.latitude_in, c.longitude_in, c.latitude_out, c.longitude_out, c.distance_in_miles, c.distance_out_miles, c.automatically_closed, c.created_at \
         FROM clockin c JOIN shift s ON s.id = c.shift_id WHERE s.employer_id = ",
    );
    qb.push_bind(employer_id);
    push_filters(&mut qb, query);
    qb.push(" ORDER BY c.started_at DESC LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(offset);

    let clockins = qb.build_query_as::<Clockin>().fetch_all(pool).await?;
    Ok(clockins)
}

/// An employee's own clock-ins
pub async fn find_for_employee(
    pool: &SqlitePool,
    employee_id: i64,
    query: &ClockinQuery,
    limit: i64,
    offset: i64,
) -> RepoResult<Vec<Clockin>> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
        "SELECT c.id, c.shift_id, c.employee_id, c.author_user_id, c.started_at, c.ended_at, c.latitude_in, c.longitude_in, c.latitude_out, c.longitude_out, c.distance_in_miles, c.distance_out_miles, c.automatically_closed, c.created_at \
         FROM clockin c WHERE c.employee_id = ",
    );
    qb.push_bind(employee_id);
    push_filters(&mut qb, &ClockinQuery {
        employee_id: None,
        ..query.clone()
    });
    qb.push(" ORDER BY c.started_at DESC LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(offset);

    let clockins = qb.build_query_as::<Clockin>().fetch_all(pool).await?;
    Ok(clockins)
}

fn push_filters(qb: &mut QueryBuilder<'_, Sqlite>, query: &ClockinQuery) {
    if let Some(shift_id) = query.shift_id {
        qb.push(" AND c.shift_id = ").push_bind(shift_id);
    }
    if let Some(employee_id) = query.employee_id {
        qb.push(" AND c.employee_id = ").push_bind(employee_id);
    }
    if let Some(from) = query.from {
        qb.push(" AND c.started_at >= ").push_bind(from);
    }
    if let Some(until) = query.until {
        qb.push(" AND c.started_at < ").push_bind(until);
    }
}

/// Paid for in a FINALIZED or PAID period
pub async fn is_locked(pool: &SqlitePool, clockin_id: i64) -> RepoResult<bool> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM payroll_payment p JOIN payroll_period pp ON pp.id = p.period_id \
         WHERE p.clockin_id = ? AND pp.status IN ('FINALIZED', 'PAID')",
    )
    .bind(clockin_id)
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}

/// Close open clock-ins whose shift ended longer ago than the employer's
/// clock-out delay. The end is the shift's `ending_at` (never before the
/// start). Returns the number closed.
pub async fn auto_close_due(pool: &SqlitePool, now: i64) -> RepoResult<u64> {
    let rows = sqlx::query(
        "UPDATE clockin SET \
             ended_at = (SELECT MAX(s.ending_at, clockin.started_at + 60000) FROM shift s WHERE s.id = clockin.shift_id), \
             automatically_closed = 1 \
         WHERE ended_at IS NULL AND EXISTS ( \
             SELECT 1 FROM shift s JOIN employer e ON e.id = s.employer_id \
             WHERE s.id = clockin.shift_id AND s.ending_at + e.maximum_clockout_delay_minutes * 60000 < ?)",
    )
    .bind(now)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected())
}

/// Closed clock-ins of an employer starting in `[from, until)` with no
/// payment yet, oldest first
pub async fn find_payable(
    pool: &SqlitePool,
    employer_id: i64,
    from: i64,
    until: i64,
) -> RepoResult<Vec<PayableClockin>> {
    let rows = sqlx::query_as::<_, PayableClockin>(
        "SELECT c.id, c.shift_id, c.employee_id, c.started_at, c.ended_at, s.minimum_hourly_rate AS hourly_rate \
         FROM clockin c JOIN shift s ON s.id = c.shift_id \
         WHERE s.employer_id = ? AND c.ended_at IS NOT NULL AND c.started_at >= ? AND c.started_at < ? \
         AND NOT EXISTS (SELECT 1 FROM payroll_payment p WHERE p.clockin_id = c.id) \
         ORDER BY c.employee_id, c.started_at",
    )
    .bind(employer_id)
    .bind(from)
    .bind(until)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Closed, unpaid clock-ins starting before `until` that no OPEN period
/// covers: punched out after their week was finalized, or older than the
/// first period
pub async fn find_unscheduled(
    pool: &SqlitePool,
    employer_id: i64,
    until: i64,
) -> RepoResult<Vec<PayableClockin>> {
    let rows = sqlx::query_as::<_, PayableClockin>(
        "SELECT c.id, c.shift_id, c.employee_id, c.started_at, c.ended_at, s.minimum_hourly_rate AS hourly_rate \
         FROM clockin c JOIN shift s ON s.id = c.shift_id \
         WHERE s.employer_id = ?1 AND c.ended_at IS NOT NULL AND c.started_at < ?2 \
         AND NOT EXISTS (SELECT 1 FROM payroll_payment p WHERE p.clockin_id = c.id) \
         AND NOT EXISTS (SELECT 1 FROM payroll_period pp WHERE pp.employer_id = ?1 AND pp.status = 'OPEN' \
             AND pp.starting_at <= c.started_at AND pp.ending_at > c.started_at) \
         ORDER BY c.employee_id, c.started_at",
    )
    .bind(employer_id)
    .bind(until)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Start of the oldest closed, unpaid clock-in of an employer
pub async fn earliest_payable_start(pool: &SqlitePool, employer_id: i64) -> RepoResult<Option<i64>> {
    let start: Option<i64> = sqlx::query_scalar(
        "SELECT MIN(c.started_at) FROM clockin c JOIN shift s ON s.id = c.shift_id \
         WHERE s.employer_id = ? AND c.ended_at IS NOT NULL \
         AND NOT EXISTS (SELECT 1 FROM payroll_payment p WHERE p.clockin_id = c.id)",
    )
    .bind(employer_id)
    .fetch_one(pool)
    .await?;
    Ok(start)
}
