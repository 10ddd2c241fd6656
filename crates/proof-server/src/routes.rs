//! API route definitions for the allowlist service.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::sync::RwLock;

use crate::handlers;
use crate::AppState;

/// Create API routes
pub fn api_routes() -> Router<Arc<RwLock<AppState>>> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Allowlist commitment lifecycle
        .route("/api/allowlist/publish", post(handlers::publish_allowlist))
        .route("/api/allowlist/root", get(handlers::current_root))
        // Proof distribution and verification
        .route("/api/proof/generate", post(handlers::generate_proof))
        .route("/api/proof/verify", post(handlers::verify_proof))
        // Claim gate
        .route("/api/claim", post(handlers::claim))
}
