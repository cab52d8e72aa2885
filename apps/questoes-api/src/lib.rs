//! Questões API - REST surface over the question store
//!
//! Provides endpoints for:
//! - Question listing and lookup
//! - Ad hoc extraction of pasted exam text
//! - Simulado (practice exam) management for professors

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod error;
pub mod handlers;
pub mod models;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

/// Builds the application router
pub fn router(state: Arc<AppState>) -> Router {
    // CORS configuration for web clients
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/api/health", get(handlers::health))
        // Questions
        .route("/api/questoes", get(handlers::list_questoes))
        .route("/api/questoes/extrair", post(handlers::extrair))
        .route("/api/questoes/:id", get(handlers::get_questao))
        // Simulados
        .route(
            "/api/professor/simulados",
            get(handlers::list_simulados).post(handlers::create_simulado),
        )
        .route(
            "/api/professor/simulados/:id",
            get(handlers::get_simulado).delete(handlers::delete_simulado),
        )
        // Add middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
