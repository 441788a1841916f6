//! Rating API
//!
//! Submission only; the public lists hang off the employer and
//! employee routers.

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/ratings", post(handler::create))
}
