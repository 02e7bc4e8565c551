pub mod health;
pub mod pages;

use axum::{routing::get, Router};
use tower_http::services::ServeDir;

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let static_dir = state.config.static_dir.clone();

    Router::new()
        .route("/", get(pages::home))
        .route("/index", get(pages::command))
        .route("/health", get(health::health_handler))
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
}
