pub mod pages;
pub mod story;

use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/health", get(pages::health_check))
        .route("/api/options", get(pages::options))
        .route(
            "/api/story",
            post(story::create_story).get(story::current_story),
        )
        .route(
            "/api/story/pages/:page_id/panels/:panel_id/regenerate",
            post(story::regenerate_panel),
        )
        .route(
            "/api/story/pages/:page_id/panels/:panel_id/dialogue",
            put(story::update_dialogue),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::AllowMethods::any())
                .allow_headers(tower_http::cors::AllowHeaders::any()),
        )
}
