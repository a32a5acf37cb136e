pub mod error;
pub mod routes;

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use biolink_core::AppState;

/// Documents embed base64 images and audio, so bodies can get large.
pub const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

pub fn build_router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/config",
            get(routes::config::get_config).post(routes::config::save_config),
        )
        .route(
            "/api/view",
            get(routes::views::get_views).post(routes::views::record_view),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}
