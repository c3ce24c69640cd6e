// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{quiz, topics},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Merges the topic and session sub-routers.
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (question bank, sessions, explainer).
pub fn create_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    let topic_routes = Router::new().route("/", get(topics::list_topics));

    let session_routes = Router::new()
        .route("/", post(quiz::create_session))
        .route(
            "/{id}",
            get(quiz::get_session).delete(quiz::delete_session),
        )
        .route("/{id}/reset", post(quiz::reset_session))
        .route("/{id}/answer", post(quiz::submit_answer))
        .route("/{id}/score", get(quiz::get_score));

    Router::new()
        .nest("/api/topics", topic_routes)
        .nest("/api/sessions", session_routes)
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
