use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        // Catalog
        .route("/titles", get(handlers::list_titles))
        .route("/titles/:id", get(handlers::get_title))
        .route("/genres", get(handlers::list_genres))
        .route("/platforms", get(handlers::list_platforms))
        // Session
        .route("/auth/login", post(handlers::login))
        .route("/auth/signup", post(handlers::signup))
        .route("/auth/logout", post(handlers::logout))
        .route("/me", get(handlers::get_me).patch(handlers::update_me))
        // Library
        .route(
            "/watchlist",
            get(handlers::get_watchlist)
                .post(handlers::add_to_watchlist)
                .delete(handlers::clear_watchlist),
        )
        .route("/watchlist/:id", delete(handlers::remove_from_watchlist))
        .route(
            "/purchases",
            get(handlers::get_purchases).post(handlers::create_purchase),
        )
        .route("/dashboard", get(handlers::get_dashboard))
}
