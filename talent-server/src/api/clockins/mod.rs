//! Clock-in API

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/clockins", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/in", post(handler::clock_in))
        .route("/out", post(handler::clock_out))
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", put(handler::update))
}
