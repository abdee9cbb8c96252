//! Tenant API 模块

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/tenants", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route(
            "/current",
            get(handler::get_current).post(handler::set_current),
        )
        .route("/{slug}", get(handler::get_by_slug))
}
