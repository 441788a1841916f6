//! Notification Repository

use super::RepoResult;
use shared::models::{Notification, NotificationKind};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

const COLUMNS: &str = "id, user_id, kind, title, body, payload, read_at, created_at";

pub async fn create(
    pool: &SqlitePool,
    user_id: i64,
    kind: NotificationKind,
    title: &str,
    body: &str,
    payload: &str,
    now: i64,
) -> RepoResult<i64> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO notification (user_id, kind, title, body, payload, created_at) VALUES (?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(user_id)
    .bind(kind)
    .bind(title)
    .bind(body)
    .bind(payload)
    .bind(now)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

pub async fn find_by_user(
    pool: &SqlitePool,
    user_id: i64,
    unread_only: bool,
    limit: i64,
    offset: i64,
) -> RepoResult<Vec<Notification>> {
    let mut qb: QueryBuilder<Sqlite> =
        QueryBuilder::new(format!("SELECT {COLUMNS} FROM notification WHERE user_id = "));
    qb.push_bind(user_id);
    if unread_only {
        qb.push(" AND read_at IS NULL");
    }
    qb.push(" ORDER BY created_at DESC, id DESC LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(offset);

    let notifications = qb.build_query_as::<Notification>().fetch_all(pool).await?;
    Ok(notifications)
}

pub async fn unread_count(pool: &SqlitePool, user_id: i64) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM notification WHERE user_id = ? AND read_at IS NULL",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

/// Mark one notification read; false when it is not the user's
pub async fn mark_read(pool: &SqlitePool, id: i64, user_id: i64, now: i64) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE notification SET read_at = COALESCE(read_at, ?) WHERE id = ? AND user_id = ?",
    )
    .bind(now)
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn mark_all_read(pool: &SqlitePool, user_id: i64, now: i64) -> RepoResult<u64> {
    let rows = sqlx::query("UPDATE notification SET read_at = ? WHERE user_id = ? AND read_at IS NULL")
        .bind(now)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected())
}
