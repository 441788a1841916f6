//! Shift API
//!
//! Employer shift management plus the employee-side join / leave
//! actions that hang off a shift.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/shifts", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/publish", post(handler::publish))
        .route("/{id}/cancel", post(handler::cancel))
        .route(
            "/{id}/employees/{employee_id}",
            post(handler::assign).delete(handler::remove),
        )
        .route("/{id}/leave", post(handler::leave))
        .route("/{id}/applications", get(handler::applications))
        .route("/{id}/apply", post(handler::apply))
}
