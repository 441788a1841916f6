//! Shift Invite Repository

use super::shift::{self, AssignOutcome};
use super::{RepoError, RepoResult};
use shared::models::{InviteQuery, InviteStatus, ShiftInvite};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

const COLUMNS: &str =
    "id, sender_user_id, employer_id, shift_id, employee_id, status, created_at, responded_at";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<ShiftInvite>> {
    let invite = sqlx::query_as::<_, ShiftInvite>(&format!(
        "SELECT {COLUMNS} FROM shift_invite WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(invite)
}

/// Invites filtered by one owner column (`employer_id` or `employee_id`)
async fn find_by_owner(
    pool: &SqlitePool,
    owner_column: &str,
    owner_id: i64,
    query: &InviteQuery,
    limit: i64,
    offset: i64,
) -> RepoResult<Vec<ShiftInvite>> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
        "SELECT {COLUMNS} FROM shift_invite WHERE {owner_column} = "
    ));
    qb.push_bind(owner_id);
    if let Some(status) = query.status {
        qb.push(" AND status = ").push_bind(status);
    }
    if let Some(shift_id) = query.shift_id {
        qb.push(" AND shift_id = ").push_bind(shift_id);
    }
    qb.push(" ORDER BY created_at DESC LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(offset);

    let invites = qb.build_query_as::<ShiftInvite>().fetch_all(pool).await?;
    Ok(invites)
}

pub async fn find_by_employee(
    pool: &SqlitePool,
    employee_id: i64,
    query: &InviteQuery,
    limit: i64,
    offset: i64,
) -> RepoResult<Vec<ShiftInvite>> {
    find_by_owner(pool, "employee_id", employee_id, query, limit, offset).await
}

pub async fn find_by_employer(
    pool: &SqlitePool,
    employer_id: i64,
    query: &InviteQuery,
    limit: i64,
    offset: i64,
) -> RepoResult<Vec<ShiftInvite>> {
    find_by_owner(pool, "employer_id", employer_id, query, limit, offset).await
}

pub async fn create(
    pool: &SqlitePool,
    sender_user_id: i64,
    employer_id: i64,
    shift_id: i64,
    employee_id: i64,
    now: i64,
) -> RepoResult<ShiftInvite> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO shift_invite (sender_user_id, employer_id, shift_id, employee_id, status, created_at) \
         VALUES (?, ?, ?, ?, 'PENDING', ?) RETURNING id",
    )
    .bind(sender_user_id)
    .bind(employer_id)
    .bind(shift_id)
    .bind(employee_id)
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(|e| match RepoError::from(e) {
        RepoError::Duplicate(_) => {
            RepoError::Duplicate("A pending invite already exists for this shift".into())
        }
        other => other,
    })?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create invite".into()))
}

/// Move a PENDING invite to `status`; false when it was no longer pending
pub async fn resolve(pool: &SqlitePool, id: i64, status: InviteStatus, now: i64) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE shift_invite SET status = ?, responded_at = ? WHERE id = ? AND status = 'PENDING'",
    )
    .bind(status)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Accept: assign the invitee and mark the invite ACCEPTED together
///
/// On any outcome other than `Assigned` the transaction is dropped and
/// the invite stays PENDING.
pub async fn accept(pool: &SqlitePool, invite: &ShiftInvite, now: i64) -> RepoResult<AssignOutcome> {
    let mut tx = pool.begin().await?;

    let outcome = shift::assign_in_tx(&mut tx, invite.shift_id, invite.employee_id, now).await?;
    if outcome != AssignOutcome::Assigned {
        return Ok(outcome);
    }

    let rows = sqlx::query(
        "UPDATE shift_invite SET status = 'ACCEPTED', responded_at = ? WHERE id = ? AND status = 'PENDING'",
    )
    .bind(now)
    .bind(invite.id)
    .execute(&mut *tx)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::Validation(format!(
            "Invite {} is no longer pending",
            invite.id
        )));
    }

    // The employee no longer needs their own application
    sqlx::query("DELETE FROM shift_application WHERE shift_id = ? AND employee_id = ?")
        .bind(invite.shift_id)
        .bind(invite.employee_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(outcome)
}
