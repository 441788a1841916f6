//! Rating Repository

use super::{RepoError, RepoResult};
use shared::models::Rating;
use sqlx::{SqliteConnection, SqlitePool};

const COLUMNS: &str =
    "id, sender_user_id, shift_id, employee_id, employer_id, rating, comments, created_at";

/// Who a rating is about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingTarget {
    Employee(i64),
    Employer(i64),
}

impl RatingTarget {
    fn table(&self) -> &'static str {
        match self {
            Self::Employee(_) => "employee",
            Self::Employer(_) => "employer",
        }
    }

    fn column(&self) -> &'static str {
        match self {
            Self::Employee(_) => "employee_id",
            Self::Employer(_) => "employer_id",
        }
    }

    fn id(&self) -> i64 {
        match self {
            Self::Employee(id) | Self::Employer(id) => *id,
        }
    }
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Rating>> {
    let rating = sqlx::query_as::<_, Rating>(&format!("SELECT {COLUMNS} FROM rating WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(rating)
}

pub async fn find_for(
    pool: &SqlitePool,
    target: RatingTarget,
    limit: i64,
    offset: i64,
) -> RepoResult<Vec<Rating>> {
    let ratings = sqlx::query_as::<_, Rating>(&format!(
        "SELECT {COLUMNS} FROM rating WHERE {} = ? ORDER BY created_at DESC LIMIT ? OFFSET ?",
        target.column()
    ))
    .bind(target.id())
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(ratings)
}

/// Store a rating and refresh the target's average and count
pub async fn create(
    pool: &SqlitePool,
    sender_user_id: i64,
    shift_id: i64,
    target: RatingTarget,
    rating: i64,
    comments: Option<&str>,
    now: i64,
) -> RepoResult<Rating> {
    let mut tx = pool.begin().await?;

    let id: i64 = sqlx::query_scalar(&format!(
        "INSERT INTO rating (sender_user_id, shift_id, {}, rating, comments, created_at) VALUES (?, ?, ?, ?, ?, ?) RETURNING id",
        target.column()
    ))
    .bind(sender_user_id)
    .bind(shift_id)
    .bind(target.id())
    .bind(rating)
    .bind(comments)
    .bind(now)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| match RepoError::from(e) {
        RepoError::Duplicate(_) => RepoError::Duplicate("Already rated for this shift".into()),
        other => other,
    })?;

    refresh_average(&mut tx, target).await?;
    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create rating".into()))
}

async fn refresh_average(conn: &mut SqliteConnection, target: RatingTarget) -> RepoResult<()> {
    let sql = format!(
        "UPDATE {table} SET \
             rating = (SELECT COALESCE(ROUND(AVG(rating), 2), 0) FROM rating WHERE {column} = ?1), \
             total_ratings = (SELECT COUNT(*) FROM rating WHERE {column} = ?1) \
         WHERE id = ?1",
        table = target.table(),
        column = target.column(),
    );
    sqlx::query(&sql).bind(target.id()).execute(&mut *conn).await?;
    Ok(())
}
