//! Route assembly, CORS, and middleware layering
//! (`Router::new().route(...).layer(...)`).

use axum::http::Method;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::handlers;
use crate::api::state::AppState;
use crate::middleware::cancellation::inject_cancellation;
use crate::middleware::logging::request_logging_simple;

/// Builds the full router. CORS is an explicit allow-list rather than
/// `CorsLayer::permissive()` so only the intended origins/methods/headers
/// are admitted.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    let mut router = Router::new()
        .route("/api/v1/health", get(handlers::health))
        .route("/api/v1/sessions", post(handlers::create_session))
        .route("/api/v1/sessions/:id", get(handlers::get_session))
        .route(
            "/api/v1/sessions/:id/signals",
            post(handlers::ingest_signals),
        )
        .route(
            "/api/v1/sessions/:id/complete",
            post(handlers::complete_session),
        )
        .route(
            "/api/v1/sessions/:id/analysis",
            get(handlers::get_analysis),
        )
        .route("/api/v1/analyze", post(handlers::analyze))
        .route(
            "/api/v1/clients/:clientId/sessions",
            get(handlers::list_client_sessions),
        );

    if state.config.environment.is_development() {
        router = router.route(
            "/api/v1/debug/sessions/:id/signals",
            get(handlers::debug_session_signals),
        );
    }

    let router = router.with_state(state.clone());

    router
        .layer(cors)
        .layer(axum::middleware::from_fn(request_logging_simple))
        .layer(axum::middleware::from_fn_with_state(
            state,
            inject_cancellation,
        ))
}
