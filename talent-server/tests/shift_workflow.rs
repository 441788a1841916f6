mod common;

use common::TestApp;
use http::StatusCode;
use serde_json::json;
use shared::ErrorCode;
use shared::util::{DAY_MS, HOUR_MS, now_millis};

struct Setup {
    app: TestApp,
    employer: String,
    employer_id: i64,
    venue_id: i64,
    position_id: i64,
}

async fn setup() -> Setup {
    let app = TestApp::new().await;
    let (employer, employer_id) = app.employer("boss@acme.test").await;
    let venue_id = app.venue(&employer).await;
    let position_id = app.position("Server").await;
    Setup {
        app,
        employer,
        employer_id,
        venue_id,
        position_id,
    }
}

impl Setup {
    async fn shift_tomorrow(&self, max_employees: i64) -> i64 {
        let start = now_millis() + DAY_MS;
        self.app
            .open_shift(
                &self.employer,
                self.venue_id,
                self.position_id,
                start,
                start + 4 * HOUR_MS,
                max_employees,
            )
            .await
    }
}

#[tokio::test]
async fn test_shift_create_rejects_bad_window() {
    let s = setup().await;
    let start = now_millis() + DAY_MS;
    let (status, body) = s
        .app
        .post(
            "/api/shifts",
            &s.employer,
            json!({
                "venue_id": s.venue_id,
                "position_id": s.position_id,
                "starting_at": start,
                "ending_at": start,
                "minimum_hourly_rate": 20.0,
                "maximum_allowed_employees": 1,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    common::assert_error(&body, ErrorCode::ShiftInvalidWindow);
}

#[tokio::test]
async fn test_shift_create_rejects_out_of_range_timestamp() {
    let s = setup().await;
    let start = now_millis() + DAY_MS;
    let (status, body) = s
        .app
        .post(
            "/api/shifts",
            &s.employer,
            json!({
                "venue_id": s.venue_id,
                "position_id": s.position_id,
                "starting_at": start,
                "ending_at": i64::MAX - 1,
                "minimum_hourly_rate": 20.0,
                "maximum_allowed_employees": 1,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    common::assert_error(&body, ErrorCode::ValidationFailed);
    assert!(body["message"].as_str().unwrap().contains("ending_at"), "{body}");
}

#[tokio::test]
async fn test_draft_hidden_until_published() {
    let s = setup().await;
    let (talent, _) = s.app.employee("t1@example.com").await;
    let start = now_millis() + DAY_MS;

    let (status, draft) = s
        .app
        .post(
            "/api/shifts",
            &s.employer,
            json!({
                "venue_id": s.venue_id,
                "position_id": s.position_id,
                "starting_at": start,
                "ending_at": start + 2 * HOUR_MS,
                "minimum_hourly_rate": 18.5,
                "maximum_allowed_employees": 2,
                "status": "DRAFT",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{draft}");
    assert_eq!(draft["status"], "DRAFT");
    let shift_id = draft["id"].as_i64().expect("id");

    let (_, market) = s.app.get("/api/marketplace/shifts", &talent).await;
    assert_eq!(market.as_array().map(Vec::len), Some(0));

    let (status, published) = s
        .app
        .post(&format!("/api/shifts/{shift_id}/publish"), &s.employer, json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(published["status"], "OPEN");

    let (_, market) = s.app.get("/api/marketplace/shifts", &talent).await;
    assert_eq!(market[0]["id"], shift_id);
    assert_eq!(market[0]["venue"]["id"], s.venue_id);

    // Publishing twice is an invalid transition
    let (status, body) = s
        .app
        .post(&format!("/api/shifts/{shift_id}/publish"), &s.employer, json!({}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    common::assert_error(&body, ErrorCode::ShiftInvalidTransition);
}

#[tokio::test]
async fn test_apply_accept_fills_shift() {
    let s = setup().await;
    let shift_id = s.shift_tomorrow(1).await;
    let (first, first_id) = s.app.employee("first@example.com").await;
    let (second, _) = s.app.employee("second@example.com").await;

    let (status, applied) = s
        .app
        .post(&format!("/api/shifts/{shift_id}/apply"), &first, json!({}))
        .await;
    assert_eq!(status, StatusCode::OK, "{applied}");
    assert_eq!(applied["auto_accepted"], false);
    let application_id = applied["application"]["id"].as_i64().expect("application");

    let (status, body) = s
        .app
        .post(&format!("/api/shifts/{shift_id}/apply"), &first, json!({}))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    common::assert_error(&body, ErrorCode::AlreadyApplied);

    let (_, pending) = s
        .app
        .get(&format!("/api/shifts/{shift_id}/applications"), &s.employer)
        .await;
    assert_eq!(pending[0]["employee_id"], first_id);

    let (status, _) = s
        .app
        .post(
            &format!("/api/applications/{application_id}/accept"),
            &s.employer,
            json!({}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, detail) = s.app.get(&format!("/api/shifts/{shift_id}"), &s.employer).await;
    assert_eq!(detail["status"], "FILLED");
    assert_eq!(detail["employees"][0]["id"], first_id);

    // Full shifts refuse new applicants
    let (status, body) = s
        .app
        .post(&format!("/api/shifts/{shift_id}/apply"), &second, json!({}))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    common::assert_error(&body, ErrorCode::ShiftFull);

    let (_, mine) = s.app.get("/api/employees/me/shifts", &first).await;
    assert_eq!(mine[0]["id"], shift_id);

    let (_, count) = s.app.get("/api/notifications/unread-count", &first).await;
    assert_eq!(count["count"], 1);

    // Leaving reopens the spot
    let (status, _) = s
        .app
        .post(&format!("/api/shifts/{shift_id}/leave"), &first, json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    let (_, detail) = s.app.get(&format!("/api/shifts/{shift_id}"), &s.employer).await;
    assert_eq!(detail["status"], "OPEN");
}

#[tokio::test]
async fn test_capacity_cannot_drop_below_assigned() {
    let s = setup().await;
    let shift_id = s.shift_tomorrow(2).await;
    for email in ["a@example.com", "b@example.com"] {
        let (_, talent_id) = s.app.employee(email).await;
        let (status, body) = s
            .app
            .post(
                &format!("/api/shifts/{shift_id}/employees/{talent_id}"),
                &s.employer,
                json!({}),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
    }

    let (status, body) = s
        .app
        .put(
            &format!("/api/shifts/{shift_id}"),
            &s.employer,
            json!({ "maximum_allowed_employees": 1, "description": "Smaller crew" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    common::assert_error(&body, ErrorCode::ValidationFailed);

    // Nothing from the refused update was written
    let (_, detail) = s.app.get(&format!("/api/shifts/{shift_id}"), &s.employer).await;
    assert_eq!(detail["maximum_allowed_employees"], 2);
    assert_eq!(detail["status"], "FILLED");
    assert!(detail["description"].is_null());

    let (status, raised) = s
        .app
        .put(
            &format!("/api/shifts/{shift_id}"),
            &s.employer,
            json!({ "maximum_allowed_employees": 3 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{raised}");
    assert_eq!(raised["status"], "OPEN");
}

#[tokio::test]
async fn test_withdraw_and_reject_applications() {
    let s = setup().await;
    let shift_id = s.shift_tomorrow(3).await;
    let (talent, _) = s.app.employee("t@example.com").await;

    let (_, applied) = s
        .app
        .post(&format!("/api/shifts/{shift_id}/apply"), &talent, json!({}))
        .await;
    let application_id = applied["application"]["id"].as_i64().expect("application");

    let (status, _) = s
        .app
        .delete(&format!("/api/applications/{application_id}"), &talent)
        .await;
    assert_eq!(status, StatusCode::OK);
    let (_, mine) = s.app.get("/api/applications/me", &talent).await;
    assert_eq!(mine.as_array().map(Vec::len), Some(0));

    let (_, applied) = s
        .app
        .post(&format!("/api/shifts/{shift_id}/apply"), &talent, json!({}))
        .await;
    let application_id = applied["application"]["id"].as_i64().expect("application");
    let (status, _) = s
        .app
        .post(
            &format!("/api/applications/{application_id}/reject"),
            &s.employer,
            json!({}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, notes) = s.app.get("/api/notifications", &talent).await;
    assert_eq!(notes[0]["kind"], "APPLICATION_REJECTED");
}

#[tokio::test]
async fn test_favorites_restriction_and_auto_accept() {
    let s = setup().await;
    let (fav, fav_id) = s.app.employee("fav@example.com").await;
    let (stranger, _) = s.app.employee("stranger@example.com").await;

    let start = now_millis() + DAY_MS;
    let (status, created) = s
        .app
        .post(
            "/api/shifts",
            &s.employer,
            json!({
                "venue_id": s.venue_id,
                "position_id": s.position_id,
                "starting_at": start,
                "ending_at": start + 3 * HOUR_MS,
                "minimum_hourly_rate": 25.0,
                "maximum_allowed_employees": 2,
                "application_restriction": "FAVORITES",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{created}");
    let shift_id = created["id"].as_i64().expect("id");

    let (status, body) = s
        .app
        .post(&format!("/api/shifts/{shift_id}/apply"), &stranger, json!({}))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    common::assert_error(&body, ErrorCode::ApplicationRestricted);

    let (_, list) = s
        .app
        .post(
            "/api/favlists",
            &s.employer,
            json!({ "title": "Regulars", "auto_accept_employees_on_this_list": true }),
        )
        .await;
    let list_id = list["id"].as_i64().expect("list");
    let (status, detail) = s
        .app
        .post(
            &format!("/api/favlists/{list_id}/employees/{fav_id}"),
            &s.employer,
            json!({}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["employees"][0]["id"], fav_id);

    let (status, applied) = s
        .app
        .post(&format!("/api/shifts/{shift_id}/apply"), &fav, json!({}))
        .await;
    assert_eq!(status, StatusCode::OK, "{applied}");
    assert_eq!(applied["auto_accepted"], true);

    let (_, detail) = s.app.get(&format!("/api/shifts/{shift_id}"), &s.employer).await;
    assert_eq!(detail["employees"][0]["id"], fav_id);
    assert_eq!(detail["status"], "OPEN");
}

#[tokio::test]
async fn test_invite_accept_and_cancel_flow() {
    let s = setup().await;
    let shift_id = s.shift_tomorrow(1).await;
    let (talent, talent_id) = s.app.employee("invitee@example.com").await;
    let (other, other_id) = s.app.employee("other@example.com").await;

    let (status, invite) = s
        .app
        .post(
            "/api/invites",
            &s.employer,
            json!({ "shift_id": shift_id, "employee_id": talent_id }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{invite}");
    assert_eq!(invite["status"], "PENDING");
    let invite_id = invite["id"].as_i64().expect("invite");

    let (status, body) = s
        .app
        .post(
            "/api/invites",
            &s.employer,
            json!({ "shift_id": shift_id, "employee_id": talent_id }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    common::assert_error(&body, ErrorCode::InviteAlreadyPending);

    let (_, other_invite) = s
        .app
        .post(
            "/api/invites",
            &s.employer,
            json!({ "shift_id": shift_id, "employee_id": other_id }),
        )
        .await;
    let other_invite_id = other_invite["id"].as_i64().expect("invite");

    let (_, mine) = s.app.get("/api/invites/me", &talent).await;
    assert_eq!(mine[0]["id"], invite_id);

    let (status, accepted) = s
        .app
        .post(
            &format!("/api/invites/{invite_id}/respond"),
            &talent,
            json!({ "accept": true }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{accepted}");
    assert_eq!(accepted["status"], "ACCEPTED");

    // The only spot is taken; the other invite stays pending
    let (status, body) = s
        .app
        .post(
            &format!("/api/invites/{other_invite_id}/respond"),
            &other,
            json!({ "accept": true }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    common::assert_error(&body, ErrorCode::ShiftFull);
    let (_, pending) = s.app.get("/api/invites/me?status=PENDING", &other).await;
    assert_eq!(pending[0]["id"], other_invite_id);

    let (status, cancelled) = s
        .app
        .delete(&format!("/api/invites/{other_invite_id}"), &s.employer)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["status"], "CANCELLED");

    let (_, sent) = s.app.get("/api/invites", &s.employer).await;
    assert_eq!(sent.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_invites_respect_opt_out() {
    let s = setup().await;
    let shift_id = s.shift_tomorrow(2).await;
    let (talent, talent_id) = s.app.employee("quiet@example.com").await;

    let (status, _) = s
        .app
        .put(
            "/api/employees/me",
            &talent,
            json!({ "stop_receiving_invites": true }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = s
        .app
        .post(
            "/api/invites",
            &s.employer,
            json!({ "shift_id": shift_id, "employee_id": talent_id }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    common::assert_error(&body, ErrorCode::InvitesDisabled);
}

#[tokio::test]
async fn test_cancel_shift_notifies_assigned_talent() {
    let s = setup().await;
    let shift_id = s.shift_tomorrow(2).await;
    let (talent, talent_id) = s.app.employee("assigned@example.com").await;

    let (status, detail) = s
        .app
        .post(
            &format!("/api/shifts/{shift_id}/employees/{talent_id}"),
            &s.employer,
            json!({}),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{detail}");

    let (status, cancelled) = s
        .app
        .post(&format!("/api/shifts/{shift_id}/cancel"), &s.employer, json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["status"], "CANCELLED");

    let (_, notes) = s.app.get("/api/notifications?unread=true", &talent).await;
    let kinds: Vec<&str> = notes
        .as_array()
        .map(|all| all.iter().filter_map(|n| n["kind"].as_str()).collect())
        .unwrap_or_default();
    assert!(kinds.contains(&"SHIFT_CANCELLED"), "{kinds:?}");
    assert!(kinds.contains(&"ADDED_TO_SHIFT"), "{kinds:?}");

    let (status, _) = s.app.post("/api/notifications/read-all", &talent, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    let (_, count) = s.app.get("/api/notifications/unread-count", &talent).await;
    assert_eq!(count["count"], 0);
}

#[tokio::test]
async fn test_employers_only_see_their_own_shifts() {
    let s = setup().await;
    let shift_id = s.shift_tomorrow(1).await;
    let (rival, _) = s.app.employer("rival@other.test").await;

    let (status, body) = s.app.get(&format!("/api/shifts/{shift_id}"), &rival).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    common::assert_error(&body, ErrorCode::ShiftNotFound);

    let (status, _) = s
        .app
        .post(&format!("/api/shifts/{shift_id}/cancel"), &rival, json!({}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, list) = s.app.get("/api/shifts", &s.employer).await;
    assert_eq!(list[0]["employer_id"], s.employer_id);
}

#[tokio::test]
async fn test_role_guards() {
    let s = setup().await;
    let (talent, _) = s.app.employee("guard@example.com").await;

    let (status, body) = s.app.get("/api/shifts", &talent).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    common::assert_error(&body, ErrorCode::EmployerRequired);

    let (status, body) = s.app.get("/api/marketplace/shifts", &s.employer).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    common::assert_error(&body, ErrorCode::EmployeeRequired);
}

#[tokio::test]
async fn test_venue_in_use_cannot_be_deleted() {
    let s = setup().await;
    s.shift_tomorrow(1).await;

    let (status, body) = s
        .app
        .delete(&format!("/api/venues/{}", s.venue_id), &s.employer)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    common::assert_error(&body, ErrorCode::VenueInUse);

    let spare = s.app.venue(&s.employer).await;
    let (status, _) = s.app.delete(&format!("/api/venues/{spare}"), &s.employer).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_apply_refused_below_minimum_rating() {
    let s = setup().await;
    let (talent, _) = s.app.employee("new@example.com").await;
    let start = now_millis() + DAY_MS;
    let (status, picky) = s
        .app
        .post(
            "/api/shifts",
            &s.employer,
            json!({
                "venue_id": s.venue_id,
                "position_id": s.position_id,
                "starting_at": start,
                "ending_at": start + 4 * HOUR_MS,
                "minimum_hourly_rate": 20.0,
                "maximum_allowed_employees": 1,
                "minimum_allowed_rating": 4.0,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{picky}");
    let shift_id = picky["id"].as_i64().expect("shift id");

    let (status, body) = s
        .app
        .post(&format!("/api/shifts/{shift_id}/apply"), &talent, json!({}))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    common::assert_error(&body, ErrorCode::RatingTooLow);
    assert_eq!(body["details"]["minimum_allowed_rating"], 4.0);

    let (_, listed) = s.app.get("/api/marketplace/shifts", &talent).await;
    assert_eq!(listed.as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn test_marketplace_honours_job_distance() {
    let s = setup().await;
    let (talent, _) = s.app.employee("far@example.com").await;
    let shift_id = s.shift_tomorrow(1).await;

    // No location on file: listed without a distance
    let (_, listed) = s.app.get("/api/marketplace/shifts", &talent).await;
    assert_eq!(listed[0]["id"], shift_id);
    assert!(listed[0]["distance_miles"].is_null());

    // About ten miles north of the venue
    let (status, _) = s
        .app
        .put(
            "/api/profile",
            &talent,
            json!({ "latitude": common::VENUE_LAT + 0.145, "longitude": common::VENUE_LNG }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = s
        .app
        .put("/api/employees/me", &talent, json!({ "maximum_job_distance_miles": 5.0 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    let (_, listed) = s.app.get("/api/marketplace/shifts", &talent).await;
    assert_eq!(listed.as_array().map(Vec::len), Some(0));

    s.app
        .put("/api/employees/me", &talent, json!({ "maximum_job_distance_miles": 20.0 }))
        .await;
    let (_, listed) = s.app.get("/api/marketplace/shifts", &talent).await;
    assert_eq!(listed[0]["id"], shift_id);
    let distance = listed[0]["distance_miles"].as_f64().expect("distance");
    assert!(distance > 9.5 && distance < 10.5, "got {distance}");
}

#[tokio::test]
async fn test_badges_need_a_shared_shift() {
    let s = setup().await;
    let admin = s.app.admin().await;
    let (_, talent_id) = s.app.employee("badge@example.com").await;
    let (other, _) = s.app.employer("rival@other.test").await;

    let (status, badge) = s
        .app
        .post("/api/badges", &admin, json!({ "title": "Reliable" }))
        .await;
    assert_eq!(status, StatusCode::OK, "{badge}");
    let badge_uri = format!(
        "/api/employees/{talent_id}/badges/{}",
        badge["id"].as_i64().expect("badge id")
    );

    let (status, body) = s.app.post(&badge_uri, &s.employer, json!({})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    common::assert_error(&body, ErrorCode::PermissionDenied);
    let (status, body) = s.app.delete(&badge_uri, &s.employer).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    common::assert_error(&body, ErrorCode::PermissionDenied);

    let shift_id = s.shift_tomorrow(1).await;
    s.app
        .post(
            &format!("/api/shifts/{shift_id}/employees/{talent_id}"),
            &s.employer,
            json!({}),
        )
        .await;

    let (status, granted) = s.app.post(&badge_uri, &s.employer, json!({})).await;
    assert_eq!(status, StatusCode::OK, "{granted}");
    assert_eq!(granted["badges"][0]["title"], "Reliable");

    // Another employer still has no claim on this talent
    let (status, body) = s.app.delete(&badge_uri, &other).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    common::assert_error(&body, ErrorCode::PermissionDenied);

    let (status, revoked) = s.app.delete(&badge_uri, &s.employer).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(revoked["badges"].as_array().map(Vec::len), Some(0));
}
