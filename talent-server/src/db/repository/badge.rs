//! Badge Repository

use super::{RepoError, RepoResult};
use shared::models::{Badge, BadgeCreate, BadgeUpdate};
use sqlx::SqlitePool;

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Badge>> {
    let badges = sqlx::query_as::<_, Badge>(
        "SELECT id, title, description, image_url FROM badge ORDER BY title",
    )
    .fetch_all(pool)
    .await?;
    Ok(badges)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Badge>> {
    let badge = sqlx::query_as::<_, Badge>(
        "SELECT id, title, description, image_url FROM badge WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(badge)
}

pub async fn create(pool: &SqlitePool, data: BadgeCreate) -> RepoResult<Badge> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO badge (title, description, image_url) VALUES (?, ?, ?) RETURNING id",
    )
    .bind(data.title.trim())
    .bind(&data.description)
    .bind(&data.image_url)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create badge".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: BadgeUpdate) -> RepoResult<Badge> {
    let rows = sqlx::query(
        "UPDATE badge SET title = COALESCE(?1, title), description = COALESCE(?2, description), image_url = COALESCE(?3, image_url) WHERE id = ?4",
    )
    .bind(data.title.as_deref().map(str::trim))
    .bind(&data.description)
    .bind(&data.image_url)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Badge {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Badge {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM badge WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Grant a badge; granting twice keeps the first grant
pub async fn grant(
    pool: &SqlitePool,
    employee_id: i64,
    badge_id: i64,
    employer_id: i64,
    now: i64,
) -> RepoResult<bool> {
    let rows = sqlx::query(
        "INSERT OR IGNORE INTO employee_badge (employee_id, badge_id, granted_by, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(employee_id)
    .bind(badge_id)
    .bind(employer_id)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn revoke(pool: &SqlitePool, employee_id: i64, badge_id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM employee_badge WHERE employee_id = ? AND badge_id = ?")
        .bind(employee_id)
        .bind(badge_id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
