//! User / Profile Repository

use super::{RepoError, RepoResult};
use shared::models::{Profile, ProfileUpdate, User, UserRole};
use sqlx::SqlitePool;

const USER_COLUMNS: &str =
    "id, email, first_name, last_name, role, employer_id, is_active, created_at";

/// User row plus its password hash (login only)
#[derive(Debug, sqlx::FromRow)]
pub struct UserCredentials {
    #[sqlx(flatten)]
    pub user: User,
    pub password_hash: String,
}

/// Fields common to every sign-up
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM user WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn find_credentials_by_email(
    pool: &SqlitePool,
    email: &str,
) -> RepoResult<Option<UserCredentials>> {
    let row = sqlx::query_as::<_, UserCredentials>(&format!(
        "SELECT {USER_COLUMNS}, password_hash FROM user WHERE email = ?"
    ))
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn find_password_hash(pool: &SqlitePool, id: i64) -> RepoResult<Option<String>> {
    let hash = sqlx::query_scalar::<_, String>("SELECT password_hash FROM user WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(hash)
}

pub async fn email_exists(pool: &SqlitePool, email: &str) -> RepoResult<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user WHERE email = ?")
        .bind(email)
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}

/// Create user + profile + employee in one transaction
///
/// Returns the user and the new employee id.
pub async fn create_employee_account(
    pool: &SqlitePool,
    data: NewUser,
    now: i64,
) -> RepoResult<(User, i64)> {
    let mut tx = pool.begin().await?;

    let user_id: i64 = sqlx::query_scalar(
        "INSERT INTO user (email, password_hash, first_name, last_name, role, employer_id, is_active, created_at) VALUES (?1, ?2, ?3, ?4, 'EMPLOYEE', NULL, 1, ?5) RETURNING id",
    )
    .bind(&data.email)
    .bind(&data.password_hash)
    .bind(&data.first_name)
    .bind(&data.last_name)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("INSERT INTO profile (user_id, updated_at) VALUES (?, ?)")
        .bind(user_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

    let employee_id: i64 = sqlx::query_scalar(
        "INSERT INTO employee (user_id, created_at) VALUES (?, ?) RETURNING id",
    )
    .bind(user_id)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    let user = find_by_id(pool, user_id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))?;
    Ok((user, employee_id))
}

/// Create employer + staff user + profile in one transaction
pub async fn create_employer_account(
    pool: &SqlitePool,
    data: NewUser,
    employer_title: &str,
    now: i64,
) -> RepoResult<User> {
    let mut tx = pool.begin().await?;

    let employer_id: i64 =
        sqlx::query_scalar("INSERT INTO employer (title, created_at) VALUES (?, ?) RETURNING id")
            .bind(employer_title)
            .bind(now)
            .fetch_one(&mut *tx)
            .await?;

    let user_id: i64 = sqlx::query_scalar(
        "INSERT INTO user (email, password_hash, first_name, last_name, role, employer_id, is_active, created_at) VALUES (?1, ?2, ?3, ?4, 'EMPLOYER', ?5, 1, ?6) RETURNING id",
    )
    .bind(&data.email)
    .bind(&data.password_hash)
    .bind(&data.first_name)
    .bind(&data.last_name)
    .bind(employer_id)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("INSERT INTO profile (user_id, updated_at) VALUES (?, ?)")
        .bind(user_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    find_by_id(pool, user_id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))
}

/// Insert an admin account (bootstrap and tests; admins cannot sign up)
pub async fn create_admin(pool: &SqlitePool, data: NewUser, now: i64) -> RepoResult<User> {
    let user_id: i64 = sqlx::query_scalar(
        "INSERT INTO user (email, password_hash, first_name, last_name, role, employer_id, is_active, created_at) VALUES (?1, ?2, ?3, ?4, 'ADMIN', NULL, 1, ?5) RETURNING id",
    )
    .bind(&data.email)
    .bind(&data.password_hash)
    .bind(&data.first_name)
    .bind(&data.last_name)
    .bind(now)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, user_id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))
}

pub async fn update_password(pool: &SqlitePool, id: i64, password_hash: &str) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE user SET password_hash = ? WHERE id = ?")
        .bind(password_hash)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {id} not found")));
    }
    Ok(())
}

pub async fn find_all(pool: &SqlitePool, limit: i64, offset: i64) -> RepoResult<Vec<User>> {
    let users = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM user ORDER BY id LIMIT ? OFFSET ?"
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(users)
}

pub async fn find_by_employer(pool: &SqlitePool, employer_id: i64) -> RepoResult<Vec<User>> {
    let users = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM user WHERE employer_id = ? ORDER BY id"
    ))
    .bind(employer_id)
    .fetch_all(pool)
    .await?;
    Ok(users)
}

/// Active staff user ids of an employer (notification fan-out)
pub async fn active_ids_by_employer(pool: &SqlitePool, employer_id: i64) -> RepoResult<Vec<i64>> {
    let ids = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM user WHERE employer_id = ? AND role = ? AND is_active = 1",
    )
    .bind(employer_id)
    .bind(UserRole::Employer)
    .fetch_all(pool)
    .await?;
    Ok(ids)
}

pub async fn set_active(pool: &SqlitePool, id: i64, is_active: bool) -> RepoResult<User> {
    let rows = sqlx::query("UPDATE user SET is_active = ? WHERE id = ?")
        .bind(is_active)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("User {id} not found")))
}

// ── Profile ─────────────────────────────────────────────────────────

pub async fn find_profile(pool: &SqlitePool, user_id: i64) -> RepoResult<Option<Profile>> {
    let profile = sqlx::query_as::<_, Profile>(
        "SELECT user_id, phone, bio, picture_url, city, latitude, longitude, updated_at FROM profile WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(profile)
}

/// Update names on the user and the rest on the profile (created if missing)
pub async fn update_profile(
    pool: &SqlitePool,
    user_id: i64,
    data: ProfileUpdate,
    now: i64,
) -> RepoResult<Profile> {
    let mut tx = pool.begin().await?;

    let rows = sqlx::query(
        "UPDATE user SET first_name = COALESCE(?1, first_name), last_name = COALESCE(?2, last_name) WHERE id = ?3",
    )
    .bind(&data.first_name)
    .bind(&data.last_name)
    .bind(user_id)
    .execute(&mut *tx)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {user_id} not found")));
    }

    sqlx::query(
        "INSERT INTO profile (user_id, phone, bio, picture_url, city, latitude, longitude, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8) \
         ON CONFLICT(user_id) DO UPDATE SET \
         phone = COALESCE(?2, phone), bio = COALESCE(?3, bio), picture_url = COALESCE(?4, picture_url), \
         city = COALESCE(?5, city), latitude = COALESCE(?6, latitude), longitude = COALESCE(?7, longitude), updated_at = ?8",
    )
    .bind(user_id)
    .bind(&data.phone)
    .bind(&data.bio)
    .bind(&data.picture_url)
    .bind(&data.city)
    .bind(data.latitude)
    .bind(data.longitude)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    find_profile(pool, user_id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Profile {user_id} not found")))
}
