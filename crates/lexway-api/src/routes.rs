//! Router setup with all API routes and middleware.
//!
//! Configures the axum Router with CORS, tracing, body limits, and all
//! endpoint handlers.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use lexway_core::error::LexwayError;

use crate::handlers;
use crate::state::AppState;

/// Extra headroom over the configured upload size for multipart framing.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Create the axum Router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let upload_limit = state.config.upload.max_bytes + MULTIPART_OVERHEAD;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/chat", post(handlers::chat))
        .route(
            "/upload_file",
            post(handlers::upload_file).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/doc_analysis", post(handlers::doc_analysis))
        .route("/extract_user_details", post(handlers::extract_user_details))
        .layer(DefaultBodyLimit::max(256 * 1024))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server on the configured address.
pub async fn start_server(state: AppState) -> Result<(), LexwayError> {
    let addr = format!(
        "{}:{}",
        state.config.general.host, state.config.general.port
    );
    let router = create_router(state);

    tracing::info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| LexwayError::Server(format!("Failed to bind {}: {}", addr, e)))?;

    axum::serve(listener, router)
        .await
        .map_err(|e| LexwayError::Server(format!("Server error: {}", e)))?;

    Ok(())
}
