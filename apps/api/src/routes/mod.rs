pub mod health;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

use crate::generation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    // Anything that is not an API route falls through to the form UI
    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/tweets/generate", post(handlers::handle_generate))
        .route(
            "/api/v1/hashtags/suggest",
            get(handlers::handle_suggest_hashtags),
        )
        .fallback_service(static_files)
        .with_state(state)
}
