use axum::{
    Router,
    routing::{get, post},
};
use std::path::Path;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};

use crate::exa::SearchBackend;
use crate::feedback_store::FeedbackStore;
use crate::orchestrator::SearchOrchestrator;

pub mod handlers;
pub mod models;

pub struct AppState<B> {
    pub orchestrator: SearchOrchestrator<B>,
    pub feedback: FeedbackStore,
}

pub fn create_router<B: SearchBackend + 'static>(
    state: Arc<AppState<B>>,
    static_dir: impl AsRef<Path>,
) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // API routes
        .route("/api/search", post(handlers::search_handler::<B>))
        .route("/api/similar", post(handlers::similar_handler::<B>))
        .route(
            "/api/feedback",
            post(handlers::add_feedback_handler::<B>).get(handlers::feedback_history_handler::<B>),
        )
        .route("/api/metrics", get(handlers::metrics_handler::<B>))
        .with_state(state)
        // Static file serving for the UI
        .fallback_service(ServeDir::new(static_dir.as_ref()))
        .layer(cors)
}
