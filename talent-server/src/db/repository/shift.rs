//! Shift Repository
//!
//! Staffing writes (assign / remove) recompute OPEN <-> FILLED in the same
//! transaction, and the capacity check is part of the insert statement so
//! head count can never exceed `maximum_allowed_employees`.

use super::{RepoError, RepoResult};
use shared::models::{Employee, Shift, ShiftCreate, ShiftQuery, ShiftStatus, ShiftUpdate};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

const COLUMNS: &str = "id, employer_id, venue_id, position_id, starting_at, ending_at, minimum_hourly_rate, maximum_allowed_employees, minimum_allowed_rating, application_restriction, status, description, created_at, updated_at";

/// Result of trying to put an employee on a shift
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOutcome {
    Assigned,
    AlreadyAssigned,
    Full,
    NotOpen(ShiftStatus),
}

/// Who has to hear about a cancellation
#[derive(Debug, Clone, Default)]
pub struct CancelOutcome {
    pub assigned_employee_ids: Vec<i64>,
    pub invited_employee_ids: Vec<i64>,
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Shift>> {
    let shift = sqlx::query_as::<_, Shift>(&format!("SELECT {COLUMNS} FROM shift WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(shift)
}

pub async fn create(
    pool: &SqlitePool,
    employer_id: i64,
    data: &ShiftCreate,
    status: ShiftStatus,
    now: i64,
) -> RepoResult<Shift> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO shift (employer_id, venue_id, position_id, starting_at, ending_at, minimum_hourly_rate, maximum_allowed_employees, minimum_allowed_rating, application_restriction, status, description, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?12) RETURNING id",
    )
    .bind(employer_id)
    .bind(data.venue_id)
    .bind(data.position_id)
    .bind(data.starting_at)
    .bind(data.ending_at)
    .bind(data.minimum_hourly_rate)
    .bind(data.maximum_allowed_employees)
    .bind(data.minimum_allowed_rating)
    .bind(data.application_restriction)
    .bind(status)
    .bind(&data.description)
    .bind(now)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create shift".into()))
}

/// Apply field changes and recompute OPEN / FILLED
pub async fn update(pool: &SqlitePool, id: i64, data: &ShiftUpdate, now: i64) -> RepoResult<Shift> {
    let mut tx = pool.begin().await?;

    let rows = sqlx::query(
        "UPDATE shift SET venue_id = COALESCE(?1, venue_id), position_id = COALESCE(?2, position_id), \
         starting_at = COALESCE(?3, starting_at), ending_at = COALESCE(?4, ending_at), \
         minimum_hourly_rate = COALESCE(?5, minimum_hourly_rate), \
         maximum_allowed_employees = COALESCE(?6, maximum_allowed_employees), \
         minimum_allowed_rating = COALESCE(?7, minimum_allowed_rating), \
         application_restriction = COALESCE(?8, application_restriction), \
         description = COALESCE(?9, description), updated_at = ?10 \
         WHERE id = ?11 AND status IN ('DRAFT', 'OPEN', 'FILLED') \
         AND (?6 IS NULL OR ?6 >= (SELECT COUNT(*) FROM shift_employee WHERE shift_id = ?11))",
    )
    .bind(data.venue_id)
    .bind(data.position_id)
    .bind(data.starting_at)
    .bind(data.ending_at)
    .bind(data.minimum_hourly_rate)
    .bind(data.maximum_allowed_employees)
    .bind(data.minimum_allowed_rating)
    .bind(data.application_restriction)
    .bind(&data.description)
    .bind(now)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    if rows.rows_affected() == 0 {
        let assigned: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM shift_employee WHERE shift_id = ?")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;
        return Err(match data.maximum_allowed_employees {
            Some(maximum) if maximum < assigned => RepoError::Validation(format!(
                "maximum_allowed_employees {maximum} is below the {assigned} assigned employees"
            )),
            _ => RepoError::NotFound(format!("Shift {id} not found or no longer editable")),
        });
    }
    recompute_status(&mut tx, id, now).await?;
    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Shift {id} not found")))
}

pub async fn find_by_employer(
    pool: &SqlitePool,
    employer_id: i64,
    query: &ShiftQuery,
    limit: i64,
    offset: i64,
) -> RepoResult<Vec<Shift>> {
    let mut qb: QueryBuilder<Sqlite> =
        QueryBuilder::new(format!("SELECT {COLUMNS} FROM shift WHERE employer_id = "));
    qb.push_bind(employer_id);
    if let Some(status) = query.status {
        qb.push(" AND status = ").push_bind(status);
    }
    if let Some(from) = query.from {
        qb.push(" AND starting_at >= ").push_bind(from);
    }
    if let Some(until) = query.until {
        qb.push(" AND starting_at < ").push_bind(until);
    }
    qb.push(" ORDER BY starting_at DESC LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(offset);

    let shifts = qb.build_query_as::<Shift>().fetch_all(pool).await?;
    Ok(shifts)
}

/// Shifts an employee is assigned to, upcoming (not yet ended) or past
pub async fn find_by_employee(
    pool: &SqlitePool,
    employee_id: i64,
    upcoming: bool,
    now: i64,
    limit: i64,
    offset: i64,
) -> RepoResult<Vec<Shift>> {
    let (condition, order) = if upcoming {
        ("s.ending_at > ?", "ASC")
    } else {
        ("s.ending_at <= ?", "DESC")
    };
    let sql = format!(
        "SELECT s.id, s.employer_id, s.venue_id, s.position_id, s.starting_at, s.ending_at, s.minimum_hourly_rate, s.maximum_allowed_employees, s.minimum_allowed_rating, s.application_restriction, s.status, s.description, s.created_at, s.updated_at \
         FROM shift s JOIN shift_employee se ON se.shift_id = s.id \
         WHERE se.employee_id = ? AND s.status <> 'CANCELLED' AND {condition} \
         ORDER BY s.starting_at {order} LIMIT ? OFFSET ?"
    );
    let shifts = sqlx::query_as::<_, Shift>(&sql)
        .bind(employee_id)
        .bind(now)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;
    Ok(shifts)
}

/// Marketplace candidates before the distance filter
///
/// OPEN, starting after `now`, paying at least `min_rate`, accepting
/// `rating`, not SPECIFIC_PEOPLE, FAVORITES only when the employee is on
/// one of the employer's lists, and not already joined.
pub async fn find_marketplace(
    pool: &SqlitePool,
    employee: &Employee,
    now: i64,
    position_id: Option<i64>,
) -> RepoResult<Vec<Shift>> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
        "SELECT {COLUMNS} FROM shift s WHERE s.status = 'OPEN' AND s.starting_at > "
    ));
    qb.push_bind(now)
        .push(" AND s.minimum_hourly_rate >= ")
        .push_bind(employee.minimum_hourly_rate)
        .push(" AND s.minimum_allowed_rating <= ")
        .push_bind(employee.rating)
        .push(" AND (s.application_restriction = 'ANYONE' OR (s.application_restriction = 'FAVORITES' AND EXISTS (SELECT 1 FROM favorite_list_employee fe JOIN favorite_list fl ON fl.id = fe.list_id WHERE fl.employer_id = s.employer_id AND fe.employee_id = ")
        .push_bind(employee.id)
        .push(")))")
        .push(" AND NOT EXISTS (SELECT 1 FROM shift_employee se WHERE se.shift_id = s.id AND se.employee_id = ")
        .push_bind(employee.id)
        .push(")");
    if let Some(position_id) = position_id {
        qb.push(" AND s.position_id = ").push_bind(position_id);
    }
    qb.push(" ORDER BY s.starting_at ASC");

    let shifts = qb.build_query_as::<Shift>().fetch_all(pool).await?;
    Ok(shifts)
}

/// Conditional status change; false when the shift is not in `from`
pub async fn transition(
    pool: &SqlitePool,
    id: i64,
    from: &[ShiftStatus],
    to: ShiftStatus,
    now: i64,
) -> RepoResult<bool> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE shift SET status = ");
    qb.push_bind(to)
        .push(", updated_at = ")
        .push_bind(now)
        .push(" WHERE id = ")
        .push_bind(id)
        .push(" AND status IN (");
    let mut separated = qb.separated(", ");
    for status in from {
        separated.push_bind(*status);
    }
    separated.push_unseparated(")");

    let rows = qb.build().execute(pool).await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM shift WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn count_employees(pool: &SqlitePool, id: i64) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM shift_employee WHERE shift_id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn is_assigned(pool: &SqlitePool, shift_id: i64, employee_id: i64) -> RepoResult<bool> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM shift_employee WHERE shift_id = ? AND employee_id = ?",
    )
    .bind(shift_id)
    .bind(employee_id)
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}

pub async fn has_clockins(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clockin WHERE shift_id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}

/// Assign inside a caller-owned transaction
///
/// Only [`AssignOutcome::Assigned`] writes anything.
pub async fn assign_in_tx(
    conn: &mut SqliteConnection,
    shift_id: i64,
    employee_id: i64,
    now: i64,
) -> RepoResult<AssignOutcome> {
    let status: Option<ShiftStatus> = sqlx::query_scalar("SELECT status FROM shift WHERE id = ?")
        .bind(shift_id)
        .fetch_optional(&mut *conn)
        .await?;
    match status {
        None => return Err(RepoError::NotFound(format!("Shift {shift_id} not found"))),
        Some(ShiftStatus::Open) => {}
        Some(ShiftStatus::Filled) => return Ok(AssignOutcome::Full),
        Some(other) => return Ok(AssignOutcome::NotOpen(other)),
    }

    let assigned: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM shift_employee WHERE shift_id = ? AND employee_id = ?",
    )
    .bind(shift_id)
    .bind(employee_id)
    .fetch_one(&mut *conn)
    .await?;
    if assigned > 0 {
        return Ok(AssignOutcome::AlreadyAssigned);
    }

    let rows = sqlx::query(
        "INSERT INTO shift_employee (shift_id, employee_id, created_at) \
         SELECT ?1, ?2, ?3 WHERE (SELECT COUNT(*) FROM shift_employee WHERE shift_id = ?1) \
         < (SELECT maximum_allowed_employees FROM shift WHERE id = ?1)",
    )
    .bind(shift_id)
    .bind(employee_id)
    .bind(now)
    .execute(&mut *conn)
    .await?;
    if rows.rows_affected() == 0 {
        return Ok(AssignOutcome::Full);
    }

    recompute_status(conn, shift_id, now).await?;
    Ok(AssignOutcome::Assigned)
}

/// Assign in its own transaction
pub async fn assign_employee(
    pool: &SqlitePool,
    shift_id: i64,
    employee_id: i64,
    now: i64,
) -> RepoResult<AssignOutcome> {
    let mut tx = pool.begin().await?;
    let outcome = assign_in_tx(&mut tx, shift_id, employee_id, now).await?;
    if outcome == AssignOutcome::Assigned {
        tx.commit().await?;
    }
    Ok(outcome)
}

/// Take an employee off a shift; false when they were not on it
pub async fn remove_employee(
    pool: &SqlitePool,
    shift_id: i64,
    employee_id: i64,
    now: i64,
) -> RepoResult<bool> {
    let mut tx = pool.begin().await?;
    let rows = sqlx::query("DELETE FROM shift_employee WHERE shift_id = ? AND employee_id = ?")
        .bind(shift_id)
        .bind(employee_id)
        .execute(&mut *tx)
        .await?;
    if rows.rows_affected() == 0 {
        return Ok(false);
    }
    recompute_status(&mut tx, shift_id, now).await?;
    tx.commit().await?;
    Ok(true)
}

/// FILLED when head count reached the maximum, OPEN otherwise
async fn recompute_status(conn: &mut SqliteConnection, shift_id: i64, now: i64) -> RepoResult<()> {
    sqlx::query(
        "UPDATE shift SET status = CASE WHEN (SELECT COUNT(*) FROM shift_employee WHERE shift_id = ?1) >= maximum_allowed_employees THEN 'FILLED' ELSE 'OPEN' END, updated_at = ?2 \
         WHERE id = ?1 AND status IN ('OPEN', 'FILLED')",
    )
    .bind(shift_id)
    .bind(now)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Cancel a DRAFT / OPEN / FILLED shift
///
/// Pending invites are cancelled and applications deleted in the same
/// transaction. `None` when the shift was not cancellable.
pub async fn cancel(pool: &SqlitePool, id: i64, now: i64) -> RepoResult<Option<CancelOutcome>> {
    let mut tx = pool.begin().await?;

    let rows = sqlx::query(
        "UPDATE shift SET status = 'CANCELLED', updated_at = ? WHERE id = ? AND status IN ('DRAFT', 'OPEN', 'FILLED')",
    )
    .bind(now)
    .bind(id)
    .execute(&mut *tx)
    .await?;
    if rows.rows_affected() == 0 {
        return Ok(None);
    }

    let assigned_employee_ids =
        sqlx::query_scalar::<_, i64>("SELECT employee_id FROM shift_employee WHERE shift_id = ?")
            .bind(id)
            .fetch_all(&mut *tx)
            .await?;

    let invited_employee_ids = sqlx::query_scalar::<_, i64>(
        "UPDATE shift_invite SET status = 'CANCELLED', responded_at = ? WHERE shift_id = ? AND status = 'PENDING' RETURNING employee_id",
    )
    .bind(now)
    .bind(id)
    .fetch_all(&mut *tx)
    .await?;

    sqlx::query("DELETE FROM shift_application WHERE shift_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(Some(CancelOutcome {
        assigned_employee_ids,
        invited_employee_ids,
    }))
}

/// Close out shifts whose end has passed
///
/// Returns `(completed, expired)`: COMPLETED when anyone was assigned,
/// EXPIRED otherwise.
pub async fn close_ended(pool: &SqlitePool, now: i64) -> RepoResult<(u64, u64)> {
    let mut tx = pool.begin().await?;

    let completed = sqlx::query(
        "UPDATE shift SET status = 'COMPLETED', updated_at = ?1 WHERE status IN ('OPEN', 'FILLED') AND ending_at <= ?1 \
         AND EXISTS (SELECT 1 FROM shift_employee se WHERE se.shift_id = shift.id)",
    )
    .bind(now)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    let expired = sqlx::query(
        "UPDATE shift SET status = 'EXPIRED', updated_at = ?1 WHERE status IN ('OPEN', 'FILLED') AND ending_at <= ?1",
    )
    .bind(now)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    // Pending invites for shifts that are over can no longer be answered
    sqlx::query(
        "UPDATE shift_invite SET status = 'CANCELLED', responded_at = ?1 WHERE status = 'PENDING' \
         AND shift_id IN (SELECT id FROM shift WHERE status IN ('COMPLETED', 'EXPIRED'))",
    )
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok((completed, expired))
}
