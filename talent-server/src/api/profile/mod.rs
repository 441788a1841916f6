//! Own profile API

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/profile", get(handler::get).put(handler::update))
}
