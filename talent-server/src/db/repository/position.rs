//! Position Repository

use super::{RepoError, RepoResult};
use shared::models::{Position, PositionCreate, PositionUpdate};
use sqlx::SqlitePool;

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Position>> {
    let positions =
        sqlx::query_as::<_, Position>("SELECT id, title, description FROM position ORDER BY title")
            .fetch_all(pool)
            .await?;
    Ok(positions)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Position>> {
    let position =
        sqlx::query_as::<_, Position>("SELECT id, title, description FROM position WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(position)
}

/// Number of the given ids that exist
pub async fn count_existing(pool: &SqlitePool, ids: &[i64]) -> RepoResult<usize> {
    let mut found = 0;
    for id in ids {
        if find_by_id(pool, *id).await?.is_some() {
            found += 1;
        }
    }
    Ok(found)
}

pub async fn create(pool: &SqlitePool, data: PositionCreate) -> RepoResult<Position> {
    let id: i64 =
        sqlx::query_scalar("INSERT INTO position (title, description) VALUES (?, ?) RETURNING id")
            .bind(data.title.trim())
            .bind(&data.description)
            .fetch_one(pool)
            .await
            .map_err(|e| match RepoError::from(e) {
                RepoError::Duplicate(_) => {
                    RepoError::Duplicate(format!("Position '{}' already exists", data.title))
                }
                other => other,
            })?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create position".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: PositionUpdate) -> RepoResult<Position> {
    let rows = sqlx::query(
        "UPDATE position SET title = COALESCE(?1, title), description = COALESCE(?2, description) WHERE id = ?3",
    )
    .bind(data.title.as_deref().map(str::trim))
    .bind(&data.description)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Position {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Position {id} not found")))
}

/// Referenced by any shift
pub async fn is_in_use(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM shift WHERE position_id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM position WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
