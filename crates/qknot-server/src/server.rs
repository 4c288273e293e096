//! Axum server setup and routing.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::api;
use crate::state::AppState;

/// Create the Axum router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route("/health", get(api::health::health))
        // Offline knot routes
        .route("/knot/ingest", post(api::knot::ingest))
        .route("/knot/verify", post(api::knot::verify))
        .route("/knot/circuit/generate", post(api::knot::generate_circuit))
        // Runtime routes
        .route("/backends", post(api::backends::list_backends))
        .route("/jobs/submit", post(api::jobs::submit))
        .route("/jobs/poll", post(api::jobs::poll))
        .route("/jobs/cancel", post(api::jobs::cancel))
        .route("/run-experiment", post(api::jobs::run_experiment));

    let mut router = Router::new().nest("/api", api_routes);

    if state.config.serve_frontend {
        let dir = &state.config.frontend_dir;
        tracing::info!(dir = %dir.display(), "serving frontend bundle");
        let spa = ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html")));
        router = router.fallback_service(spa);
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}
