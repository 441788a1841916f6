//! Test harness: in-memory server driven through `oneshot`

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use shared::ErrorCode;
use shared::models::{PositionCreate, ShiftCreate, ShiftStatus};
use talent_server::ServerState;
use talent_server::core::AdminSeed;
use talent_server::db::repository::{position, shift};
use talent_server::routes::build_app;

pub const VENUE_LAT: f64 = 25.7617;
pub const VENUE_LNG: f64 = -80.1918;

pub const ADMIN_EMAIL: &str = "admin@talent.test";
pub const ADMIN_PASSWORD: &str = "admin-password-1";

pub struct TestApp {
    pub state: ServerState,
    pub router: Router,
}

impl TestApp {
    pub async fn new() -> Self {
        let state = ServerState::in_memory().await.expect("in-memory state");
        let router = build_app(&state).with_state(state.clone());
        Self { state, router }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(http::header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(http::header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        let response = self.router.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, Some(token), None).await
    }

    /// Register a talent account; returns (token, employee_id)
    pub async fn employee(&self, email: &str) -> (String, i64) {
        let (status, body) = self
            .request(
                Method::POST,
                "/api/auth/register",
                None,
                Some(json!({
                    "email": email,
                    "password": "password-123",
                    "first_name": "Tal",
                    "last_name": "Ent",
                    "role": "EMPLOYEE",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "register employee: {body}");
        (
            body["token"].as_str().expect("token").to_string(),
            body["employee_id"].as_i64().expect("employee_id"),
        )
    }

    /// Register an employer account; returns (token, employer_id)
    pub async fn employer(&self, email: &str) -> (String, i64) {
        let (status, body) = self
            .request(
                Method::POST,
                "/api/auth/register",
                None,
                Some(json!({
                    "email": email,
                    "password": "password-123",
                    "first_name": "Em",
                    "last_name": "Ployer",
                    "role": "EMPLOYER",
                    "employer_title": "Acme Events",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "register employer: {body}");
        (
            body["token"].as_str().expect("token").to_string(),
            body["user"]["employer_id"].as_i64().expect("employer_id"),
        )
    }

    /// Seed the bootstrap admin and log in
    pub async fn admin(&self) -> String {
        self.state
            .ensure_admin(&AdminSeed {
                email: ADMIN_EMAIL.into(),
                password: ADMIN_PASSWORD.into(),
            })
            .await
            .expect("admin seed");
        let (status, body) = self
            .request(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "admin login: {body}");
        body["token"].as_str().expect("token").to_string()
    }

    pub async fn position(&self, title: &str) -> i64 {
        position::create(
            &self.state.pool,
            PositionCreate {
                title: title.into(),
                description: None,
            },
        )
        .await
        .expect("position")
        .id
    }

    pub async fn venue(&self, token: &str) -> i64 {
        let (status, body) = self
            .post(
                "/api/venues",
                token,
                json!({
                    "title": "Main Hall",
                    "street_address": "1 Bay St",
                    "city": "Miami",
                    "latitude": VENUE_LAT,
                    "longitude": VENUE_LNG,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "venue: {body}");
        body["id"].as_i64().expect("venue id")
    }

    /// Create an OPEN shift through the API
    pub async fn open_shift(
        &self,
        token: &str,
        venue_id: i64,
        position_id: i64,
        starting_at: i64,
        ending_at: i64,
        max_employees: i64,
    ) -> i64 {
        let (status, body) = self
            .post(
                "/api/shifts",
                token,
                json!({
                    "venue_id": venue_id,
                    "position_id": position_id,
                    "starting_at": starting_at,
                    "ending_at": ending_at,
                    "minimum_hourly_rate": 20.0,
                    "maximum_allowed_employees": max_employees,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "shift: {body}");
        body["id"].as_i64().expect("shift id")
    }

    /// Insert a shift directly, bypassing the start-in-the-future rule
    pub async fn past_shift(
        &self,
        employer_id: i64,
        venue_id: i64,
        position_id: i64,
        starting_at: i64,
        ending_at: i64,
    ) -> i64 {
        let data = ShiftCreate {
            venue_id,
            position_id,
            starting_at,
            ending_at,
            minimum_hourly_rate: 20.0,
            maximum_allowed_employees: 5,
            minimum_allowed_rating: 0.0,
            application_restriction: Default::default(),
            status: None,
            description: None,
        };
        shift::create(
            &self.state.pool,
            employer_id,
            &data,
            ShiftStatus::Open,
            starting_at - 86_400_000,
        )
        .await
        .expect("shift")
        .id
    }
}

pub fn assert_error(body: &Value, code: ErrorCode) {
    assert_eq!(
        body["code"].as_u64(),
        Some(code.code() as u64),
        "expected {code:?}, got {body}"
    );
}
