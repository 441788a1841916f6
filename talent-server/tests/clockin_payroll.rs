mod common;

use std::time::Duration;

use common::{TestApp, VENUE_LAT, VENUE_LNG};
use http::StatusCode;
use serde_json::{Value, json};
use shared::ErrorCode;
use shared::util::{DAY_MS, HOUR_MS, MINUTE_MS, WEEK_MS, now_millis};
use talent_server::db::repository::{payroll, shift};
use talent_server::payroll::period_start_for;
use talent_server::scheduler::ShiftScheduler;
use tokio_util::sync::CancellationToken;

/// Employer, talent and a shift that has already happened, with the
/// talent assigned to it
struct Worked {
    app: TestApp,
    employer: String,
    employer_id: i64,
    talent: String,
    talent_id: i64,
    shift_id: i64,
    starting_at: i64,
}

async fn worked_shift() -> Worked {
    let app = TestApp::new().await;
    let (employer, employer_id) = app.employer("boss@acme.test").await;
    let (talent, talent_id) = app.employee("worker@example.com").await;
    let venue_id = app.venue(&employer).await;
    let position_id = app.position("Bartender").await;

    let starting_at = now_millis() - 10 * DAY_MS;
    let shift_id = app
        .past_shift(
            employer_id,
            venue_id,
            position_id,
            starting_at,
            starting_at + 8 * HOUR_MS,
        )
        .await;
    shift::assign_employee(&app.state.pool, shift_id, talent_id, starting_at - DAY_MS)
        .await
        .expect("assign");

    Worked {
        app,
        employer,
        employer_id,
        talent,
        talent_id,
        shift_id,
        starting_at,
    }
}

impl Worked {
    async fn manual_clockin(&self) -> Value {
        let (status, body) = self
            .app
            .post(
                "/api/clockins",
                &self.employer,
                json!({
                    "shift_id": self.shift_id,
                    "employee_id": self.talent_id,
                    "started_at": self.starting_at,
                    "ended_at": self.starting_at + 8 * HOUR_MS,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "manual clock-in: {body}");
        body
    }
}

#[tokio::test]
async fn test_clock_in_and_out_at_the_venue() {
    let app = TestApp::new().await;
    let (employer, _) = app.employer("boss@acme.test").await;
    let (talent, talent_id) = app.employee("punch@example.com").await;
    let venue_id = app.venue(&employer).await;
    let position_id = app.position("Host").await;

    let start = now_millis() + 5 * MINUTE_MS;
    let shift_id = app
        .open_shift(&employer, venue_id, position_id, start, start + 2 * HOUR_MS, 1)
        .await;

    // Not on the shift yet
    let at_venue = json!({ "shift_id": shift_id, "latitude": VENUE_LAT, "longitude": VENUE_LNG });
    let (status, body) = app.post("/api/clockins/in", &talent, at_venue.clone()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    common::assert_error(&body, ErrorCode::NotInShift);

    let (status, _) = app
        .post(
            &format!("/api/shifts/{shift_id}/employees/{talent_id}"),
            &employer,
            json!({}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // About three miles north of the venue
    let (status, body) = app
        .post(
            "/api/clockins/in",
            &talent,
            json!({ "shift_id": shift_id, "latitude": 25.80, "longitude": -80.19 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    common::assert_error(&body, ErrorCode::OutsideGeofence);

    let (status, clockin) = app.post("/api/clockins/in", &talent, at_venue.clone()).await;
    assert_eq!(status, StatusCode::OK, "{clockin}");
    assert!(clockin["ended_at"].is_null());
    assert!(clockin["distance_in_miles"].as_f64().expect("distance") < 0.01);

    let (status, body) = app.post("/api/clockins/in", &talent, at_venue.clone()).await;
    assert_eq!(status, StatusCode::CONFLICT);
    common::assert_error(&body, ErrorCode::AlreadyClockedIn);

    tokio::time::sleep(Duration::from_millis(5)).await;
    let (status, closed) = app.post("/api/clockins/out", &talent, at_venue.clone()).await;
    assert_eq!(status, StatusCode::OK, "{closed}");
    assert_eq!(closed["id"], clockin["id"]);
    assert!(closed["ended_at"].as_i64().is_some());

    let (status, body) = app.post("/api/clockins/out", &talent, at_venue).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    common::assert_error(&body, ErrorCode::NotClockedIn);

    let (_, mine) = app.get("/api/clockins", &talent).await;
    assert_eq!(mine.as_array().map(Vec::len), Some(1));
    let (_, theirs) = app
        .get(&format!("/api/clockins?shift_id={shift_id}"), &employer)
        .await;
    assert_eq!(theirs[0]["employee_id"], talent_id);
}

#[tokio::test]
async fn test_clock_in_too_early() {
    let app = TestApp::new().await;
    let (employer, _) = app.employer("boss@acme.test").await;
    let (talent, talent_id) = app.employee("early@example.com").await;
    let venue_id = app.venue(&employer).await;
    let position_id = app.position("Host").await;

    let start = now_millis() + DAY_MS;
    let shift_id = app
        .open_shift(&employer, venue_id, position_id, start, start + HOUR_MS, 1)
        .await;
    app.post(
        &format!("/api/shifts/{shift_id}/employees/{talent_id}"),
        &employer,
        json!({}),
    )
    .await;

    let (status, body) = app
        .post(
            "/api/clockins/in",
            &talent,
            json!({ "shift_id": shift_id, "latitude": VENUE_LAT, "longitude": VENUE_LNG }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    common::assert_error(&body, ErrorCode::ClockinTooEarly);
}

#[tokio::test]
async fn test_manual_clockin_rejects_reversed_times() {
    let w = worked_shift().await;
    let (status, body) = w
        .app
        .post(
            "/api/clockins",
            &w.employer,
            json!({
                "shift_id": w.shift_id,
                "employee_id": w.talent_id,
                "started_at": w.starting_at,
                "ended_at": w.starting_at - HOUR_MS,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    common::assert_error(&body, ErrorCode::ValidationFailed);

    // Talent cannot record their own hours
    let (status, body) = w
        .app
        .post(
            "/api/clockins",
            &w.talent,
            json!({
                "shift_id": w.shift_id,
                "employee_id": w.talent_id,
                "started_at": w.starting_at,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    common::assert_error(&body, ErrorCode::EmployerRequired);
}

#[tokio::test]
async fn test_payroll_generate_finalize_and_pay() {
    let w = worked_shift().await;
    let clockin = w.manual_clockin().await;
    let clockin_id = clockin["id"].as_i64().expect("clockin id");

    let (status, generated) = w
        .app
        .post("/api/payroll/periods/generate", &w.employer, json!({}))
        .await;
    assert_eq!(status, StatusCode::OK, "{generated}");
    assert_eq!(generated["payments_created"], 1);
    let period_id = generated["periods"][0]["id"].as_i64().expect("period");

    // A second run finds nothing new
    let (_, again) = w
        .app
        .post("/api/payroll/periods/generate", &w.employer, json!({}))
        .await;
    assert_eq!(again["periods_created"], 0);
    assert_eq!(again["payments_created"], 0);

    let (status, detail) = w
        .app
        .get(&format!("/api/payroll/periods/{period_id}"), &w.employer)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["status"], "OPEN");
    let payment = &detail["payments"][0];
    assert_eq!(payment["employee_id"], w.talent_id);
    assert_eq!(payment["regular_hours"], 8.0);
    assert_eq!(payment["over_time"], 0.0);
    assert_eq!(payment["total_amount"], 160.0);
    let payment_id = payment["id"].as_i64().expect("payment id");

    // Changing the break alone recomputes the hours
    let (status, edited) = w
        .app
        .put(
            &format!("/api/payroll/payments/{payment_id}"),
            &w.employer,
            json!({ "breaktime_minutes": 30 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{edited}");
    assert_eq!(edited["regular_hours"], 7.5);
    assert_eq!(edited["total_amount"], 150.0);

    let (status, finalized) = w
        .app
        .post(
            &format!("/api/payroll/periods/{period_id}/finalize"),
            &w.employer,
            json!({}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(finalized["status"], "FINALIZED");

    let (_, notes) = w.app.get("/api/notifications", &w.talent).await;
    assert_eq!(notes[0]["kind"], "PAYROLL_FINALIZED");

    let (_, body) = w
        .app
        .put(
            &format!("/api/clockins/{clockin_id}"),
            &w.employer,
            json!({ "ended_at": w.starting_at + 9 * HOUR_MS }),
        )
        .await;
    common::assert_error(&body, ErrorCode::ClockinLocked);

    let (status, body) = w
        .app
        .put(
            &format!("/api/payroll/payments/{payment_id}"),
            &w.employer,
            json!({ "regular_hours": 1.0 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    common::assert_error(&body, ErrorCode::PayrollPeriodNotOpen);

    let (status, body) = w
        .app
        .post(
            &format!("/api/payroll/periods/{period_id}/finalize"),
            &w.employer,
            json!({}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    common::assert_error(&body, ErrorCode::PayrollInvalidTransition);

    let (status, paid) = w
        .app
        .post(
            &format!("/api/payroll/periods/{period_id}/paid"),
            &w.employer,
            json!({}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(paid["status"], "PAID");
    assert_eq!(paid["total_amount"], 150.0);

    let (_, mine) = w.app.get("/api/payroll/payments/me", &w.talent).await;
    assert_eq!(mine[0]["status"], "PAID");
    assert_eq!(mine[0]["clockin_id"], clockin_id);
}

#[tokio::test]
async fn test_editing_open_period_clockin_detaches_payment() {
    let w = worked_shift().await;
    let clockin = w.manual_clockin().await;
    let clockin_id = clockin["id"].as_i64().expect("clockin id");

    let (_, generated) = w
        .app
        .post("/api/payroll/periods/generate", &w.employer, json!({}))
        .await;
    let period_id = generated["periods"][0]["id"].as_i64().expect("period");

    let (status, _) = w
        .app
        .put(
            &format!("/api/clockins/{clockin_id}"),
            &w.employer,
            json!({ "ended_at": w.starting_at + 4 * HOUR_MS }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, detail) = w
        .app
        .get(&format!("/api/payroll/periods/{period_id}"), &w.employer)
        .await;
    assert_eq!(detail["payments"].as_array().map(Vec::len), Some(0));

    // The next run picks the corrected clock-in up again
    let (_, again) = w
        .app
        .post("/api/payroll/periods/generate", &w.employer, json!({}))
        .await;
    assert_eq!(again["payments_created"], 1);
    let (_, detail) = w
        .app
        .get(&format!("/api/payroll/periods/{period_id}"), &w.employer)
        .await;
    assert_eq!(detail["payments"][0]["regular_hours"], 4.0);
    assert_eq!(detail["payments"][0]["total_amount"], 80.0);
}

#[tokio::test]
async fn test_ratings_after_the_shift() {
    let w = worked_shift().await;

    let (status, rating) = w
        .app
        .post(
            "/api/ratings",
            &w.talent,
            json!({ "shift_id": w.shift_id, "rating": 5, "comments": "  Great crew  " }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{rating}");
    assert_eq!(rating["employer_id"], w.employer_id);
    assert_eq!(rating["comments"], "Great crew");

    let (status, body) = w
        .app
        .post(
            "/api/ratings",
            &w.talent,
            json!({ "shift_id": w.shift_id, "rating": 4 }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    common::assert_error(&body, ErrorCode::AlreadyRated);

    let (status, body) = w
        .app
        .post("/api/ratings", &w.employer, json!({ "shift_id": w.shift_id, "rating": 4 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    common::assert_error(&body, ErrorCode::RequiredField);

    let (status, _) = w
        .app
        .post(
            "/api/ratings",
            &w.employer,
            json!({ "shift_id": w.shift_id, "employee_id": w.talent_id, "rating": 4 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, talent) = w
        .app
        .get(&format!("/api/employees/{}", w.talent_id), &w.employer)
        .await;
    assert_eq!(talent["rating"], 4.0);
    assert_eq!(talent["total_ratings"], 1);

    let (status, public) = w
        .app
        .request(
            http::Method::GET,
            &format!("/api/employers/{}/ratings", w.employer_id),
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(public[0]["rating"], 5);
}

#[tokio::test]
async fn test_rating_before_the_shift_ends_is_refused() {
    let app = TestApp::new().await;
    let (employer, _) = app.employer("boss@acme.test").await;
    let (talent, talent_id) = app.employee("soon@example.com").await;
    let venue_id = app.venue(&employer).await;
    let position_id = app.position("Host").await;
    let start = now_millis() + DAY_MS;
    let shift_id = app
        .open_shift(&employer, venue_id, position_id, start, start + HOUR_MS, 1)
        .await;
    app.post(
        &format!("/api/shifts/{shift_id}/employees/{talent_id}"),
        &employer,
        json!({}),
    )
    .await;

    let (status, body) = app
        .post("/api/ratings", &talent, json!({ "shift_id": shift_id, "rating": 5 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    common::assert_error(&body, ErrorCode::RatingNotAllowed);
}

#[tokio::test]
async fn test_payment_update_surfaces_database_failure() {
    let w = worked_shift().await;
    w.manual_clockin().await;
    let (_, generated) = w
        .app
        .post("/api/payroll/periods/generate", &w.employer, json!({}))
        .await;
    let period_id = generated["periods"][0]["id"].as_i64().expect("period");
    let (_, detail) = w
        .app
        .get(&format!("/api/payroll/periods/{period_id}"), &w.employer)
        .await;
    let payment_id = detail["payments"][0]["id"].as_i64().expect("payment id");

    sqlx::query(
        "CREATE TRIGGER payment_write_fails BEFORE UPDATE ON payroll_payment \
         BEGIN SELECT RAISE(ABORT, 'disk I/O error'); END",
    )
    .execute(&w.app.state.pool)
    .await
    .expect("trigger");

    let (status, body) = w
        .app
        .put(
            &format!("/api/payroll/payments/{payment_id}"),
            &w.employer,
            json!({ "regular_hours": 6.0 }),
        )
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{body}");
    common::assert_error(&body, ErrorCode::DatabaseError);
}

#[tokio::test]
async fn test_manual_clockin_refused_in_finalized_week() {
    let w = worked_shift().await;
    w.manual_clockin().await;
    let (_, generated) = w
        .app
        .post("/api/payroll/periods/generate", &w.employer, json!({}))
        .await;
    let period_id = generated["periods"][0]["id"].as_i64().expect("period");
    let (status, _) = w
        .app
        .post(
            &format!("/api/payroll/periods/{period_id}/finalize"),
            &w.employer,
            json!({}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, late_id) = w.app.employee("late@example.com").await;
    shift::assign_employee(&w.app.state.pool, w.shift_id, late_id, w.starting_at - DAY_MS)
        .await
        .expect("assign");

    let (status, body) = w
        .app
        .post(
            "/api/clockins",
            &w.employer,
            json!({
                "shift_id": w.shift_id,
                "employee_id": late_id,
                "started_at": w.starting_at,
                "ended_at": w.starting_at + 8 * HOUR_MS,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    common::assert_error(&body, ErrorCode::ClockinLocked);
    assert_eq!(body["details"]["period_id"], period_id);

    let (_, again) = w
        .app
        .post("/api/payroll/periods/generate", &w.employer, json!({}))
        .await;
    assert_eq!(again["payments_created"], 0);
}

#[tokio::test]
async fn test_auto_clock_out_is_paid() {
    let w = worked_shift().await;
    let (status, open) = w
        .app
        .post(
            "/api/clockins",
            &w.employer,
            json!({
                "shift_id": w.shift_id,
                "employee_id": w.talent_id,
                "started_at": w.starting_at,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{open}");
    assert!(open["ended_at"].is_null());

    // Still open: nothing to pay
    let (_, generated) = w
        .app
        .post("/api/payroll/periods/generate", &w.employer, json!({}))
        .await;
    assert_eq!(generated["periods_created"], 0);

    let report = ShiftScheduler::new(w.app.state.clone(), CancellationToken::new())
        .run_once(now_millis())
        .await
        .expect("sweep");
    assert_eq!(report.clocked_out, 1);

    let (_, generated) = w
        .app
        .post("/api/payroll/periods/generate", &w.employer, json!({}))
        .await;
    assert_eq!(generated["payments_created"], 1, "{generated}");
    let period_id = generated["periods"][0]["id"].as_i64().expect("period");
    let (_, detail) = w
        .app
        .get(&format!("/api/payroll/periods/{period_id}"), &w.employer)
        .await;
    assert_eq!(detail["payments"][0]["employee_id"], w.talent_id);
    assert_eq!(detail["payments"][0]["regular_hours"], 8.0);
}

#[tokio::test]
async fn test_punch_closed_after_finalize_goes_to_next_open_period() {
    let app = TestApp::new().await;
    let (employer, employer_id) = app.employer("boss@acme.test").await;
    let (_, early_id) = app.employee("early@example.com").await;
    let (_, late_id) = app.employee("late@example.com").await;
    let venue_id = app.venue(&employer).await;
    let position_id = app.position("Bartender").await;

    // Old enough that the following week is complete as well
    let starting_at = now_millis() - 20 * DAY_MS;
    let shift_id = app
        .past_shift(employer_id, venue_id, position_id, starting_at, starting_at + 8 * HOUR_MS)
        .await;
    for talent_id in [early_id, late_id] {
        shift::assign_employee(&app.state.pool, shift_id, talent_id, starting_at - DAY_MS)
            .await
            .expect("assign");
    }

    let (status, _) = app
        .post(
            "/api/clockins",
            &employer,
            json!({
                "shift_id": shift_id,
                "employee_id": early_id,
                "started_at": starting_at,
                "ended_at": starting_at + 8 * HOUR_MS,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, open) = app
        .post(
            "/api/clockins",
            &employer,
            json!({ "shift_id": shift_id, "employee_id": late_id, "started_at": starting_at }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let open_id = open["id"].as_i64().expect("clockin id");

    let (_, generated) = app
        .post("/api/payroll/periods/generate", &employer, json!({}))
        .await;
    assert!(generated["periods_created"].as_u64().expect("count") >= 2, "{generated}");
    assert_eq!(generated["payments_created"], 1);
    let first = generated["periods"][0]["id"].as_i64().expect("first");
    let second = generated["periods"][1]["id"].as_i64().expect("second");

    let (status, _) = app
        .post(
            &format!("/api/payroll/periods/{first}/finalize"),
            &employer,
            json!({}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // The employer can no longer set hours in that week
    let (_, body) = app
        .put(
            &format!("/api/clockins/{open_id}"),
            &employer,
            json!({ "ended_at": starting_at + 8 * HOUR_MS }),
        )
        .await;
    common::assert_error(&body, ErrorCode::ClockinLocked);

    ShiftScheduler::new(app.state.clone(), CancellationToken::new())
        .run_once(now_millis())
        .await
        .expect("sweep");

    let (_, again) = app
        .post("/api/payroll/periods/generate", &employer, json!({}))
        .await;
    assert_eq!(again["payments_created"], 1, "{again}");

    let (_, detail) = app
        .get(&format!("/api/payroll/periods/{second}"), &employer)
        .await;
    assert_eq!(detail["status"], "OPEN");
    assert_eq!(detail["payments"][0]["employee_id"], late_id);
    assert_eq!(detail["payments"][0]["clockin_id"], open_id);
    assert_eq!(detail["payments"][0]["regular_hours"], 8.0);

    let (_, closed) = app
        .get(&format!("/api/payroll/periods/{first}"), &employer)
        .await;
    assert_eq!(closed["payments"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_new_start_weekday_applies_after_a_bridging_period() {
    let app = TestApp::new().await;
    let (employer, employer_id) = app.employer("boss@acme.test").await;

    // Last period ended on a Monday midnight a few weeks back
    let monday = period_start_for(now_millis() - 35 * DAY_MS, 0, 0);
    payroll::create_period(
        &app.state.pool,
        employer_id,
        monday - WEEK_MS,
        monday,
        &[],
        monday,
    )
    .await
        .expect("period")
        .expect("inserted");

    let (status, _) = app
        .put(
            "/api/employers/me",
            &employer,
            json!({ "payroll_period_starting_weekday": 3 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, generated) = app
        .post("/api/payroll/periods/generate", &employer, json!({}))
        .await;
    assert_eq!(status, StatusCode::OK, "{generated}");
    let periods = generated["periods"].as_array().expect("periods");
    assert!(periods.len() >= 4, "{generated}");

    // Monday -> Thursday, then whole weeks from Thursday
    assert_eq!(periods[0]["starting_at"], monday);
    assert_eq!(periods[0]["ending_at"], monday + 3 * DAY_MS);
    for pair in periods.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        assert_eq!(next["starting_at"], prev["ending_at"]);
        let start = next["starting_at"].as_i64().expect("start");
        assert_eq!(next["ending_at"], start + WEEK_MS);
    }
}
