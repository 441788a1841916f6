//! Invite API

mod handler;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/invites", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::sent).post(handler::send))
        .route("/me", get(handler::mine))
        .route("/{id}/respond", post(handler::respond))
        .route("/{id}", delete(handler::cancel))
}
