use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::{handlers, middleware as api_middleware, review};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Review routes carry a learner session
    let review_routes = Router::new()
        .route("/next", get(review::next_word))
        .route("/table", get(review::table_words))
        .route("/counts", get(review::review_counts))
        .route("/tomorrow", get(review::tomorrow_count))
        .route("/criteria", get(review::current_criteria))
        .route("/status", post(review::update_status))
        .route("/sentence/{term_id}", get(review::sentence))
        .layer(middleware::from_fn(api_middleware::session_middleware));

    // API routes
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .nest("/review", review_routes)
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/metrics", get(handlers::metrics))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(api_middleware::metrics_middleware)),
        )
}
