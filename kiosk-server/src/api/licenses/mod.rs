//! License API 模块

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/licenses", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/validate", post(handler::validate))
        .route("/state", get(handler::state))
}
