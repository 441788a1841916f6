//! Shift Application Repository

use super::shift::{self, AssignOutcome};
use super::{RepoError, RepoResult};
use shared::models::ShiftApplication;
use sqlx::SqlitePool;

const SELECT: &str = "SELECT a.id, a.shift_id, a.employee_id, u.first_name AS employee_first_name, u.last_name AS employee_last_name, s.starting_at AS shift_starting_at, a.created_at \
     FROM shift_application a \
     JOIN employee e ON e.id = a.employee_id \
     JOIN user u ON u.id = e.user_id \
     JOIN shift s ON s.id = a.shift_id";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<ShiftApplication>> {
    let application = sqlx::query_as::<_, ShiftApplication>(&format!("{SELECT} WHERE a.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(application)
}

pub async fn find_by_shift(pool: &SqlitePool, shift_id: i64) -> RepoResult<Vec<ShiftApplication>> {
    let applications = sqlx::query_as::<_, ShiftApplication>(&format!(
        "{SELECT} WHERE a.shift_id = ? ORDER BY a.created_at"
    ))
    .bind(shift_id)
    .fetch_all(pool)
    .await?;
    Ok(applications)
}

pub async fn find_by_employee(
    pool: &SqlitePool,
    employee_id: i64,
    limit: i64,
    offset: i64,
) -> RepoResult<Vec<ShiftApplication>> {
    let applications = sqlx::query_as::<_, ShiftApplication>(&format!(
        "{SELECT} WHERE a.employee_id = ? ORDER BY s.starting_at LIMIT ? OFFSET ?"
    ))
    .bind(employee_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(applications)
}

pub async fn exists(pool: &SqlitePool, shift_id: i64, employee_id: i64) -> RepoResult<bool> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM shift_application WHERE shift_id = ? AND employee_id = ?",
    )
    .bind(shift_id)
    .bind(employee_id)
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}

pub async fn create(
    pool: &SqlitePool,
    shift_id: i64,
    employee_id: i64,
    now: i64,
) -> RepoResult<ShiftApplication> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO shift_application (shift_id, employee_id, created_at) VALUES (?, ?, ?) RETURNING id",
    )
    .bind(shift_id)
    .bind(employee_id)
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(|e| match RepoError::from(e) {
        RepoError::Duplicate(_) => {
            RepoError::Duplicate("Already applied to this shift".into())
        }
        other => other,
    })?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create application".into()))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM shift_application WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Assign the applicant and drop the application in one transaction
///
/// Nothing changes unless the outcome is [`AssignOutcome::Assigned`].
/// An applicant who is somehow already on the shift just loses the
/// application.
pub async fn accept(
    pool: &SqlitePool,
    application: &ShiftApplication,
    now: i64,
) -> RepoResult<AssignOutcome> {
    let mut tx = pool.begin().await?;

    let outcome =
        shift::assign_in_tx(&mut tx, application.shift_id, application.employee_id, now).await?;
    match outcome {
        AssignOutcome::Assigned | AssignOutcome::AlreadyAssigned => {
            sqlx::query("DELETE FROM shift_application WHERE id = ?")
                .bind(application.id)
                .execute(&mut *tx)
                .await?;
            tx.commit().await?;
        }
        AssignOutcome::Full | AssignOutcome::NotOpen(_) => {}
    }
    Ok(outcome)
}
