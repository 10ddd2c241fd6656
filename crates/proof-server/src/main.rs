//! HTTP API server for allowlist roots, proofs, and claims.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use allowlist_merkle::AllowlistTree;
use allowlist_registry::{ClaimLedger, RootRegistry};

mod handlers;
mod routes;

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_STATE_FILE: &str = "allowlist_state.json";

/// Application state shared across handlers.
pub struct AppState {
    pub registry: RootRegistry,
    pub ledger: ClaimLedger,
    /// Epoch -> tree, for epochs published during this process lifetime.
    /// The registry file stores roots only, so proofs for epochs published
    /// before a restart require republishing the allowlist.
    pub trees: HashMap<u64, AllowlistTree>,
    pub state_path: PathBuf,
}

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .init();

    let state_path = PathBuf::from(
        std::env::var("ALLOWLIST_STATE").unwrap_or_else(|_| DEFAULT_STATE_FILE.to_string()),
    );

    // Load previously published roots so verification and claims keep
    // working across restarts.
    let registry = if state_path.exists() {
        info!("loading published roots from {:?}", state_path);
        RootRegistry::load_from_path(&state_path).expect("Failed to load registry state")
    } else {
        info!("no registry state at {:?}, starting empty", state_path);
        RootRegistry::new()
    };

    let mut ledger = ClaimLedger::new();
    if let Ok(current) = registry.current() {
        info!(
            epoch = current.epoch,
            root = %format!("0x{}", hex::encode(current.root)),
            "resuming with current root"
        );
        ledger.update_root(current.root);
    }

    let state = Arc::new(RwLock::new(AppState {
        registry,
        ledger,
        trees: HashMap::new(),
        state_path,
    }));

    let app = Router::new()
        .merge(routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app).await.expect("Server error");
}
