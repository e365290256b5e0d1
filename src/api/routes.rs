use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

use super::handlers;
use super::AppState;

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        // Outermost, so the trace span already sees the request id
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/catalog", get(handlers::get_catalog))
        // Browsing session
        .route("/session", get(handlers::get_session))
        .route("/session/tab", post(handlers::change_tab))
        .route("/session/chip", post(handlers::select_chip))
        .route(
            "/session/search",
            put(handlers::set_search_query).post(handlers::submit_search),
        )
        .route("/session/search/focus", post(handlers::set_search_focus))
        .route("/session/profile", post(handlers::submit_profile))
        .route("/session/more", post(handlers::load_more))
        .route("/session/refresh", post(handlers::refresh))
        // Preferences
        .route("/favorites", get(handlers::get_favorites))
        .route("/favorites/toggle", post(handlers::toggle_favorite))
        .route("/history", get(handlers::get_history))
        .route("/history/:term", delete(handlers::remove_history_term))
        .route(
            "/profile",
            get(handlers::get_profile).put(handlers::set_profile),
        )
        .route(
            "/settings/font-size",
            get(handlers::get_font_size).put(handlers::set_font_size),
        )
        // Stateless
        .route("/recommendations", post(handlers::recommend))
}
