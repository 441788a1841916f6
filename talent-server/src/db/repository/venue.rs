//! Venue Repository

use super::{RepoError, RepoResult};
use shared::models::{Venue, VenueCreate, VenueUpdate};
use sqlx::SqlitePool;

const COLUMNS: &str =
    "id, employer_id, title, street_address, city, latitude, longitude, created_at";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Venue>> {
    let venue = sqlx::query_as::<_, Venue>(&format!("SELECT {COLUMNS} FROM venue WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(venue)
}

pub async fn find_by_employer(pool: &SqlitePool, employer_id: i64) -> RepoResult<Vec<Venue>> {
    let venues = sqlx::query_as::<_, Venue>(&format!(
        "SELECT {COLUMNS} FROM venue WHERE employer_id = ? ORDER BY title"
    ))
    .bind(employer_id)
    .fetch_all(pool)
    .await?;
    Ok(venues)
}

pub async fn create(
    pool: &SqlitePool,
    employer_id: i64,
    data: VenueCreate,
    now: i64,
) -> RepoResult<Venue> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO venue (employer_id, title, street_address, city, latitude, longitude, created_at) VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(employer_id)
    .bind(data.title.trim())
    .bind(data.street_address.trim())
    .bind(&data.city)
    .bind(data.latitude)
    .bind(data.longitude)
    .bind(now)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create venue".into()))
}

/// Update a venue owned by `employer_id`
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    employer_id: i64,
    data: VenueUpdate,
) -> RepoResult<Venue> {
    let rows = sqlx::query(
        "UPDATE venue SET title = COALESCE(?1, title), street_address = COALESCE(?2, street_address), city = COALESCE(?3, city), \
         latitude = COALESCE(?4, latitude), longitude = COALESCE(?5, longitude) WHERE id = ?6 AND employer_id = ?7",
    )
    .bind(data.title.as_deref().map(str::trim))
    .bind(data.street_address.as_deref().map(str::trim))
    .bind(&data.city)
    .bind(data.latitude)
    .bind(data.longitude)
    .bind(id)
    .bind(employer_id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Venue {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Venue {id} not found")))
}

/// Referenced by any shift that is not cancelled, or that has clock-ins
pub async fn has_active_shifts(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM shift s WHERE s.venue_id = ? AND (s.status <> 'CANCELLED' OR EXISTS (SELECT 1 FROM clockin c WHERE c.shift_id = s.id))",
    )
    .bind(id)
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}

/// Delete a venue; cancelled shifts still pointing at it go with it
pub async fn delete(pool: &SqlitePool, id: i64, employer_id: i64) -> RepoResult<bool> {
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM shift WHERE venue_id = ? AND status = 'CANCELLED'")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    let rows = sqlx::query("DELETE FROM venue WHERE id = ? AND employer_id = ?")
        .bind(id)
        .bind(employer_id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(rows.rows_affected() > 0)
}
