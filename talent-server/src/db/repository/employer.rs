//! Employer Repository

use super::{RepoError, RepoResult};
use shared::models::{Employer, EmployerUpdate};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, title, website, bio, rating, total_ratings, maximum_clockin_delta_minutes, maximum_clockout_delay_minutes, automatically_accept_from_favlists, payroll_period_starting_weekday, payroll_period_starting_time, created_at";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Employer>> {
    let employer =
        sqlx::query_as::<_, Employer>(&format!("SELECT {COLUMNS} FROM employer WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(employer)
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Employer>> {
    let employers =
        sqlx::query_as::<_, Employer>(&format!("SELECT {COLUMNS} FROM employer ORDER BY id"))
            .fetch_all(pool)
            .await?;
    Ok(employers)
}

pub async fn update(pool: &SqlitePool, id: i64, data: EmployerUpdate) -> RepoResult<Employer> {
    let rows = sqlx::query(
        "UPDATE employer SET title = COALESCE(?1, title), website = COALESCE(?2, website), bio = COALESCE(?3, bio), \
         maximum_clockin_delta_minutes = COALESCE(?4, maximum_clockin_delta_minutes), \
         maximum_clockout_delay_minutes = COALESCE(?5, maximum_clockout_delay_minutes), \
         automatically_accept_from_favlists = COALESCE(?6, automatically_accept_from_favlists), \
         payroll_period_starting_weekday = COALESCE(?7, payroll_period_starting_weekday), \
         payroll_period_starting_time = COALESCE(?8, payroll_period_starting_time) WHERE id = ?9",
    )
    .bind(&data.title)
    .bind(&data.website)
    .bind(&data.bio)
    .bind(data.maximum_clockin_delta_minutes)
    .bind(data.maximum_clockout_delay_minutes)
    .bind(data.automatically_accept_from_favlists)
    .bind(data.payroll_period_starting_weekday)
    .bind(data.payroll_period_starting_time)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Employer {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Employer {id} not found")))
}
