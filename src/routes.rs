// src/routes.rs

use axum::{
    Router,
    http::Method,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{admin, quiz},
    state::AppState,
};

/// Assembles the main application router.
///
/// * `/api/quiz` - the candidate surface (start, answer, attempts).
/// * `/api/admin` - configuration: tracks, blocks, questions, composition.
/// * Applies global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:3000".parse().unwrap(),
        "http://127.0.0.1:3000".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let quiz_routes = Router::new()
        .route("/start", post(quiz::start_quiz))
        .route("/answer", post(quiz::submit_answer))
        .route("/attempts", get(quiz::get_attempts));

    let admin_routes = Router::new()
        .route("/tracks", post(admin::create_track))
        .route("/tracks/{id}/blocks", get(admin::list_track_blocks))
        .route("/blocks", get(admin::list_blocks).post(admin::create_block))
        .route("/questions", post(admin::create_question))
        .route("/track-blocks", post(admin::link_track_block));

    Router::new()
        .nest("/api/quiz", quiz_routes)
        .nest("/api/admin", admin_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
