mod common;

use common::TestApp;
use serde_json::json;
use shared::models::{ClockinQuery, InviteStatus, ShiftStatus};
use shared::util::{DAY_MS, HOUR_MS, MINUTE_MS, now_millis};
use talent_server::db::repository::clockin::{self, Punch};
use talent_server::db::repository::{employee, invite, shift};
use talent_server::scheduler::{ShiftScheduler, SweepReport};
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn test_sweep_closes_ended_shifts() {
    let app = TestApp::new().await;
    let (employer, _) = app.employer("boss@acme.test").await;
    let (_, talent_id) = app.employee("worker@example.com").await;
    let (_, invited_id) = app.employee("invited@example.com").await;
    let venue_id = app.venue(&employer).await;
    let position_id = app.position("Runner").await;

    let start = now_millis() + DAY_MS;
    let staffed = app
        .open_shift(&employer, venue_id, position_id, start, start + 4 * HOUR_MS, 2)
        .await;
    let empty = app
        .open_shift(&employer, venue_id, position_id, start, start + 2 * HOUR_MS, 2)
        .await;
    let later = app
        .open_shift(
            &employer,
            venue_id,
            position_id,
            start + 7 * DAY_MS,
            start + 7 * DAY_MS + HOUR_MS,
            1,
        )
        .await;

    app.post(
        &format!("/api/shifts/{staffed}/employees/{talent_id}"),
        &employer,
        json!({}),
    )
    .await;
    let (_, sent) = app
        .post(
            "/api/invites",
            &employer,
            json!({ "shift_id": empty, "employee_id": invited_id }),
        )
        .await;
    let invite_id = sent["id"].as_i64().expect("invite");

    // Talent forgot to clock out
    let talent = employee::find_by_id(&app.state.pool, talent_id)
        .await
        .expect("find")
        .expect("employee");
    clockin::open(
        &app.state.pool,
        staffed,
        talent_id,
        talent.user_id,
        Punch {
            at: start,
            point: shared::geo::GeoPoint::new(common::VENUE_LAT, common::VENUE_LNG),
            distance_miles: 0.0,
        },
    )
    .await
    .expect("clock in");

    let scheduler = ShiftScheduler::new(app.state.clone(), CancellationToken::new());

    // Nothing has ended yet
    let report = scheduler.run_once(now_millis()).await.expect("sweep");
    assert_eq!(report, SweepReport::default());

    // After the shifts and the default one-hour clock-out delay
    let after = start + 6 * HOUR_MS;
    let report = scheduler.run_once(after).await.expect("sweep");
    assert_eq!(
        report,
        SweepReport {
            completed: 1,
            expired: 1,
            clocked_out: 1,
        }
    );

    let pool = &app.state.pool;
    let status = |id| async move {
        shift::find_by_id(pool, id)
            .await
            .expect("find")
            .expect("shift")
            .status
    };
    assert_eq!(status(staffed).await, ShiftStatus::Completed);
    assert_eq!(status(empty).await, ShiftStatus::Expired);
    assert_eq!(status(later).await, ShiftStatus::Open);

    let invite = invite::find_by_id(pool, invite_id)
        .await
        .expect("find")
        .expect("invite");
    assert_eq!(invite.status, InviteStatus::Cancelled);

    let closed = clockin::find_for_employee(pool, talent_id, &ClockinQuery::default(), 10, 0)
        .await
        .expect("clockins");
    assert_eq!(closed.len(), 1);
    assert!(closed[0].automatically_closed);
    assert_eq!(closed[0].ended_at, Some(start + 4 * HOUR_MS));

    // Terminal shifts are left alone on the next pass
    let report = scheduler.run_once(after + MINUTE_MS).await.expect("sweep");
    assert_eq!(report, SweepReport::default());
}

#[tokio::test]
async fn test_scheduler_stops_on_cancel() {
    let app = TestApp::new().await;
    let token = CancellationToken::new();
    let scheduler = ShiftScheduler::new(app.state.clone(), token.clone());
    let handle = tokio::spawn(scheduler.run());
    token.cancel();
    tokio::time::timeout(std::time::Duration::from_secs(5), handle)
        .await
        .expect("scheduler stopped")
        .expect("join");
}
