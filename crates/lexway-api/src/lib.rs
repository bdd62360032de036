//! Lexway API crate - axum HTTP server and route handlers.
//!
//! Provides the REST surface for the guidance service: the phase-gated
//! chat endpoint, document upload, document analysis, text extraction,
//! and a health check.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{create_router, start_server};
pub use state::AppState;
