//! Employee Repository
//!
//! Employee rows are always read joined with `user` for the display names.

use super::{RepoError, RepoResult};
use shared::geo::GeoPoint;
use shared::models::{Badge, Employee, EmployeeQuery, EmployeeUpdate, Position};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

const SELECT: &str = "SELECT e.id, e.user_id, u.first_name, u.last_name, e.minimum_hourly_rate, e.maximum_job_distance_miles, e.stop_receiving_invites, e.rating, e.total_ratings, e.created_at FROM employee e JOIN user u ON u.id = e.user_id";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Employee>> {
    let employee = sqlx::query_as::<_, Employee>(&format!("{SELECT} WHERE e.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(employee)
}

pub async fn find_id_by_user(pool: &SqlitePool, user_id: i64) -> RepoResult<Option<i64>> {
    let id = sqlx::query_scalar::<_, i64>("SELECT id FROM employee WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(id)
}

pub async fn find_user_id(pool: &SqlitePool, employee_id: i64) -> RepoResult<Option<i64>> {
    let id = sqlx::query_scalar::<_, i64>("SELECT user_id FROM employee WHERE id = ?")
        .bind(employee_id)
        .fetch_optional(pool)
        .await?;
    Ok(id)
}

/// Search active talent
pub async fn search(
    pool: &SqlitePool,
    query: &EmployeeQuery,
    limit: i64,
    offset: i64,
) -> RepoResult<Vec<Employee>> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(SELECT);
    qb.push(" WHERE u.is_active = 1");
    if let Some(position_id) = query.position_id {
        qb.push(" AND EXISTS (SELECT 1 FROM employee_position ep WHERE ep.employee_id = e.id AND ep.position_id = ")
            .push_bind(position_id)
            .push(")");
    }
    if let Some(badge_id) = query.badge_id {
        qb.push(" AND EXISTS (SELECT 1 FROM employee_badge eb WHERE eb.employee_id = e.id AND eb.badge_id = ")
            .push_bind(badge_id)
            .push(")");
    }
    if let Some(minimum_rating) = query.minimum_rating {
        qb.push(" AND e.rating >= ").push_bind(minimum_rating);
    }
    qb.push(" ORDER BY e.rating DESC, e.id LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(offset);

    let employees = qb.build_query_as::<Employee>().fetch_all(pool).await?;
    Ok(employees)
}

/// Update own settings; `position_ids` replaces the whole set
pub async fn update(pool: &SqlitePool, id: i64, data: EmployeeUpdate) -> RepoResult<Employee> {
    let mut tx = pool.begin().await?;

    let rows = sqlx::query(
        "UPDATE employee SET minimum_hourly_rate = COALESCE(?1, minimum_hourly_rate), \
         maximum_job_distance_miles = COALESCE(?2, maximum_job_distance_miles), \
         stop_receiving_invites = COALESCE(?3, stop_receiving_invites) WHERE id = ?4",
    )
    .bind(data.minimum_hourly_rate)
    .bind(data.maximum_job_distance_miles)
    .bind(data.stop_receiving_invites)
    .bind(id)
    .execute(&mut *tx)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Employee {id} not found")));
    }

    if let Some(position_ids) = &data.position_ids {
        sqlx::query("DELETE FROM employee_position WHERE employee_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        for position_id in position_ids {
            sqlx::query(
                "INSERT OR IGNORE INTO employee_position (employee_id, position_id) VALUES (?, ?)",
            )
            .bind(id)
            .bind(position_id)
            .execute(&mut *tx)
            .await?;
        }
    }

    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Employee {id} not found")))
}

pub async fn positions(pool: &SqlitePool, employee_id: i64) -> RepoResult<Vec<Position>> {
    let positions = sqlx::query_as::<_, Position>(
        "SELECT p.id, p.title, p.description FROM position p JOIN employee_position ep ON ep.position_id = p.id WHERE ep.employee_id = ? ORDER BY p.title",
    )
    .bind(employee_id)
    .fetch_all(pool)
    .await?;
    Ok(positions)
}

pub async fn badges(pool: &SqlitePool, employee_id: i64) -> RepoResult<Vec<Badge>> {
    let badges = sqlx::query_as::<_, Badge>(
        "SELECT b.id, b.title, b.description, b.image_url FROM badge b JOIN employee_badge eb ON eb.badge_id = b.id WHERE eb.employee_id = ? ORDER BY b.title",
    )
    .bind(employee_id)
    .fetch_all(pool)
    .await?;
    Ok(badges)
}

/// Employees assigned to a shift
pub async fn find_by_shift(pool: &SqlitePool, shift_id: i64) -> RepoResult<Vec<Employee>> {
    let employees = sqlx::query_as::<_, Employee>(&format!(
        "{SELECT} JOIN shift_employee se ON se.employee_id = e.id WHERE se.shift_id = ? ORDER BY se.created_at"
    ))
    .bind(shift_id)
    .fetch_all(pool)
    .await?;
    Ok(employees)
}

/// Home location from the employee's profile, when both coordinates are set
pub async fn find_location(pool: &SqlitePool, employee_id: i64) -> RepoResult<Option<GeoPoint>> {
    let row = sqlx::query_as::<_, (Option<f64>, Option<f64>)>(
        "SELECT p.latitude, p.longitude FROM employee e JOIN profile p ON p.user_id = e.user_id WHERE e.id = ?",
    )
    .bind(employee_id)
    .fetch_optional(pool)
    .await?;

    Ok(match row {
        Some((Some(lat), Some(lng))) => Some(GeoPoint::new(lat, lng)),
        _ => None,
    })
}

/// Whether the employee was ever assigned to one of the employer's shifts
pub async fn has_worked_for(
    pool: &SqlitePool,
    employee_id: i64,
    employer_id: i64,
) -> RepoResult<bool> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM shift_employee se JOIN shift s ON s.id = se.shift_id WHERE se.employee_id = ? AND s.employer_id = ?",
    )
    .bind(employee_id)
    .bind(employer_id)
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}
