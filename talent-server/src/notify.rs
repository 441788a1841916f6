//! In-app notifications
//!
//! Every workflow transition that the other side should hear about goes
//! through [`send`]. Delivery never fails the caller: storage errors are
//! logged and swallowed, the business write has already happened.

use shared::models::NotificationKind;
use shared::util::now_millis;
use sqlx::SqlitePool;

use crate::db::repository::{employee, notification, user};

/// Store a notification for one user
pub async fn send(
    pool: &SqlitePool,
    user_id: i64,
    kind: NotificationKind,
    title: impl Into<String>,
    body: impl Into<String>,
    payload: serde_json::Value,
) {
    let title = title.into();
    let body = body.into();
    let payload = payload.to_string();

    match notification::create(pool, user_id, kind, &title, &body, &payload, now_millis()).await {
        Ok(id) => {
            tracing::info!(
                notification_id = id,
                user_id,
                kind = kind.as_str(),
                "Notification stored: {}",
                title
            );
        }
        Err(e) => {
            tracing::error!(user_id, kind = kind.as_str(), error = %e, "Failed to store notification");
        }
    }
}

/// Notify the user behind an employee record
pub async fn send_to_employee(
    pool: &SqlitePool,
    employee_id: i64,
    kind: NotificationKind,
    title: impl Into<String>,
    body: impl Into<String>,
    payload: serde_json::Value,
) {
    match employee::find_user_id(pool, employee_id).await {
        Ok(Some(user_id)) => send(pool, user_id, kind, title, body, payload).await,
        Ok(None) => tracing::warn!(employee_id, "Notification target employee not found"),
        Err(e) => tracing::error!(employee_id, error = %e, "Failed to resolve employee user"),
    }
}

/// Notify every active staff user of an employer
pub async fn send_to_employer(
    pool: &SqlitePool,
    employer_id: i64,
    kind: NotificationKind,
    title: impl Into<String>,
    body: impl Into<String>,
    payload: serde_json::Value,
) {
    let user_ids = match user::active_ids_by_employer(pool, employer_id).await {
        Ok(ids) => ids,
        Err(e) => {
            tracing::error!(employer_id, error = %e, "Failed to resolve employer staff");
            return;
        }
    };
    let title = title.into();
    let body = body.into();
    for user_id in user_ids {
        send(pool, user_id, kind, title.clone(), body.clone(), payload.clone()).await;
    }
}
