use axum::{
    error_handling::HandleErrorLayer,
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;
use crate::middleware::rate_limit::{handle_rate_limit_error, RATE_LIMIT_QUEUE, RATE_LIMIT_WINDOW};
use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    let defaults = state.defaults;

    // Each layered route gets its own quota; shed requests become 429s
    let recommend_limit = ServiceBuilder::new()
        .layer(HandleErrorLayer::new(handle_rate_limit_error))
        .buffer(RATE_LIMIT_QUEUE)
        .load_shed()
        .rate_limit(defaults.recommend_per_minute, RATE_LIMIT_WINDOW);
    let lookup_limit = ServiceBuilder::new()
        .layer(HandleErrorLayer::new(handle_rate_limit_error))
        .buffer(RATE_LIMIT_QUEUE)
        .load_shed()
        .rate_limit(defaults.lookup_per_minute, RATE_LIMIT_WINDOW);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        // Recommendations
        .route("/recommend", post(handlers::recommend).layer(recommend_limit))
        // Catalog lookups
        .route("/search", get(handlers::search).layer(lookup_limit.clone()))
        .route("/movie/:title", get(handlers::movie_details).layer(lookup_limit))
        .layer(
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
        .with_state(state)
}
