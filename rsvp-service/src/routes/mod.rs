use axum::{
    extract::{DefaultBodyLimit, Request},
    middleware,
    routing::{get, post},
    Router,
};
use log::{info, warn};
use tower_http::cors::{Any, CorsLayer};

use crate::config::AppConfig;
use crate::handlers::{health_handlers::health, rsvp_handlers::submit_rsvp};
use crate::state::AppState;

/// Largest request body accepted; bigger bodies get a 413 before any handler runs
pub const MAX_RSVP_BODY_BYTES: usize = 64 * 1024;

/// Creates a router with the collaborators described by `config`
pub fn create_router(config: &AppConfig) -> Router {
    info!("Creating router from configuration");
    info!("Using API route prefix: '{}'", config.route_prefix);

    create_router_with_state(AppState::from_config(config), &config.route_prefix)
}

/// Creates a router around a given state
pub fn create_router_with_state(state: AppState, prefix: &str) -> Router {
    info!("Setting up API routes with prefix: '{}'", prefix);

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Logging middleware to trace all requests
    async fn logging_middleware(
        req: Request,
        next: axum::middleware::Next,
    ) -> impl axum::response::IntoResponse {
        info!(
            "Router received request: method={}, uri={}",
            req.method(),
            req.uri()
        );
        next.run(req).await
    }

    let api_routes = Router::new()
        .route("/api/rsvp", post(submit_rsvp))
        .route("/api/health", get(health))
        .layer(DefaultBodyLimit::max(MAX_RSVP_BODY_BYTES))
        .with_state(state);

    let router = if prefix.is_empty() {
        api_routes
    } else {
        Router::new().nest(prefix, api_routes)
    };

    router
        .layer(cors)
        .layer(middleware::from_fn(logging_middleware))
        .fallback(|req: Request| async move {
            warn!("No route matched for: {} {}", req.method(), req.uri());
            (
                axum::http::StatusCode::NOT_FOUND,
                "The requested resource was not found".to_string(),
            )
        })
}
