use axum::{routing::get, Router};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::handlers::{
    api_search, index, map_page, property_page, robots_txt, sitemap_xml,
};
use crate::state::AppState;

pub fn app_router(state: AppState) -> Router {
    let content_dir = state.config.content_dir.clone();
    Router::new()
        .route("/", get(index))
        .route("/imoveis/:id", get(property_page))
        .route("/mapa", get(map_page))
        .route("/api/search", get(api_search))
        .route("/sitemap.xml", get(sitemap_xml))
        .route("/robots.txt", get(robots_txt))
        .nest_service("/static", ServeDir::new("static"))
        .nest_service("/content", ServeDir::new(content_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
