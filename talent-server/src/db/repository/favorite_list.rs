//! Favorite List Repository

use super::{RepoError, RepoResult};
use shared::models::{Employee, FavoriteList, FavoriteListCreate, FavoriteListUpdate};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, employer_id, title, auto_accept_employees_on_this_list, created_at";

/// An employee's standing with one employer's lists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Membership {
    /// On at least one of the employer's lists
    pub on_any_list: bool,
    /// On a list with `auto_accept_employees_on_this_list`
    pub on_auto_accept_list: bool,
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<FavoriteList>> {
    let list = sqlx::query_as::<_, FavoriteList>(&format!(
        "SELECT {COLUMNS} FROM favorite_list WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(list)
}

pub async fn find_by_employer(pool: &SqlitePool, employer_id: i64) -> RepoResult<Vec<FavoriteList>> {
    let lists = sqlx::query_as::<_, FavoriteList>(&format!(
        "SELECT {COLUMNS} FROM favorite_list WHERE employer_id = ? ORDER BY title"
    ))
    .bind(employer_id)
    .fetch_all(pool)
    .await?;
    Ok(lists)
}

pub async fn create(
    pool: &SqlitePool,
    employer_id: i64,
    data: FavoriteListCreate,
    now: i64,
) -> RepoResult<FavoriteList> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO favorite_list (employer_id, title, auto_accept_employees_on_this_list, created_at) VALUES (?, ?, ?, ?) RETURNING id",
    )
    .bind(employer_id)
    .bind(data.title.trim())
    .bind(data.auto_accept_employees_on_this_list)
    .bind(now)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create favorite list".into()))
}

pub async fn update(
    pool: &SqlitePool,
    id: i64,
    employer_id: i64,
    data: FavoriteListUpdate,
) -> RepoResult<FavoriteList> {
    let rows = sqlx::query(
        "UPDATE favorite_list SET title = COALESCE(?1, title), auto_accept_employees_on_this_list = COALESCE(?2, auto_accept_employees_on_this_list) WHERE id = ?3 AND employer_id = ?4",
    )
    .bind(data.title.as_deref().map(str::trim))
    .bind(data.auto_accept_employees_on_this_list)
    .bind(id)
    .bind(employer_id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Favorite list {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Favorite list {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64, employer_id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM favorite_list WHERE id = ? AND employer_id = ?")
        .bind(id)
        .bind(employer_id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Add an employee; adding twice is a no-op
pub async fn add_employee(pool: &SqlitePool, list_id: i64, employee_id: i64) -> RepoResult<()> {
    sqlx::query("INSERT OR IGNORE INTO favorite_list_employee (list_id, employee_id) VALUES (?, ?)")
        .bind(list_id)
        .bind(employee_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn remove_employee(pool: &SqlitePool, list_id: i64, employee_id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM favorite_list_employee WHERE list_id = ? AND employee_id = ?")
        .bind(list_id)
        .bind(employee_id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn employees(pool: &SqlitePool, list_id: i64) -> RepoResult<Vec<Employee>> {
    let employees = sqlx::query_as::<_, Employee>(
        "SELECT e.id, e.user_id, u.first_name, u.last_name, e.minimum_hourly_rate, e.maximum_job_distance_miles, e.stop_receiving_invites, e.rating, e.total_ratings, e.created_at \
         FROM favorite_list_employee fe JOIN employee e ON e.id = fe.employee_id JOIN user u ON u.id = e.user_id WHERE fe.list_id = ? ORDER BY u.last_name, u.first_name",
    )
    .bind(list_id)
    .fetch_all(pool)
    .await?;
    Ok(employees)
}

pub async fn membership(
    pool: &SqlitePool,
    employer_id: i64,
    employee_id: i64,
) -> RepoResult<Membership> {
    let (lists, auto_accept): (i64, i64) = sqlx::query_as(
        "SELECT COUNT(*), COALESCE(SUM(fl.auto_accept_employees_on_this_list), 0) FROM favorite_list_employee fe JOIN favorite_list fl ON fl.id = fe.list_id WHERE fl.employer_id = ? AND fe.employee_id = ?",
    )
    .bind(employer_id)
    .bind(employee_id)
    .fetch_one(pool)
    .await?;

    Ok(Membership {
        on_any_list: lists > 0,
        on_auto_accept_list: auto_accept > 0,
    })
}
