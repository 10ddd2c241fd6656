//! HTTP request handlers for the allowlist service.
//!
//! Hashes and proofs cross the wire as `0x`-prefixed hex strings; errors
//! come back as `{ "error": "..." }` with a 4xx status.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{info, warn};

use allowlist_merkle::{verify, Address, AllowlistTree, Hash, InclusionProof};

use crate::AppState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn bad_request(error: String) -> axum::response::Response {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse { error })).into_response()
}

fn not_found(error: String) -> axum::response::Response {
    (StatusCode::NOT_FOUND, Json(ErrorResponse { error })).into_response()
}

/// Parse a hex string into a 32-byte hash
fn parse_hash(hex_str: &str) -> Result<Hash, String> {
    let bytes = hex::decode(hex_str.trim_start_matches("0x"))
        .map_err(|e| format!("Invalid hex: {}", e))?;

    bytes
        .try_into()
        .map_err(|_| "Hash must be 32 bytes".to_string())
}

/// Serialize a hash to a hex string
fn encode_hash(hash: &Hash) -> String {
    format!("0x{}", hex::encode(hash))
}

/// Parse a sibling path of hex strings into a proof, checking its structure
fn parse_proof(siblings: &[String]) -> Result<InclusionProof, String> {
    let siblings: Vec<Hash> = siblings
        .iter()
        .map(|s| parse_hash(s))
        .collect::<Result<_, _>>()?;

    let proof = InclusionProof::new(siblings);
    proof.validate().map_err(|e| e.to_string())?;
    Ok(proof)
}

fn encode_proof(proof: &InclusionProof) -> Vec<String> {
    proof.siblings().iter().map(encode_hash).collect()
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

// ============ Allowlist publication ============

#[derive(Deserialize)]
pub struct PublishRequest {
    pub addresses: Vec<String>,
    /// Optional claim window start (unix seconds). Omitted means the window
    /// opens immediately.
    pub claim_start_time: Option<u64>,
}

#[derive(Serialize)]
pub struct PublishResponse {
    pub epoch: u64,
    pub root: String,
    pub leaves: usize,
}

pub async fn publish_allowlist(
    State(state): State<Arc<RwLock<AppState>>>,
    Json(req): Json<PublishRequest>,
) -> impl IntoResponse {
    let mut addresses = Vec::with_capacity(req.addresses.len());
    for raw in &req.addresses {
        match raw.parse::<Address>() {
            Ok(addr) => addresses.push(addr),
            Err(e) => return bad_request(format!("{raw:?}: {e}")),
        }
    }

    let tree = match AllowlistTree::build(&addresses) {
        Ok(tree) => tree,
        Err(e) => return bad_request(e.to_string()),
    };

    let mut state = state.write().await;
    let root = tree.root();
    let epoch = state.registry.publish(root);
    let leaves = tree.len();

    state.ledger.update_root(root);
    if let Some(start_time) = req.claim_start_time {
        state.ledger.update_claim_start_time(start_time);
    }
    state.trees.insert(epoch, tree);

    // Persist the published roots; the in-memory tree is rebuilt from the
    // address list on republish.
    if let Err(e) = state.registry.save_to_path(&state.state_path) {
        warn!("failed to persist registry state: {e}");
    }

    info!(epoch, root = %encode_hash(&root), leaves, "published allowlist root");

    (
        StatusCode::OK,
        Json(PublishResponse {
            epoch,
            root: encode_hash(&root),
            leaves,
        }),
    )
        .into_response()
}

#[derive(Serialize)]
pub struct RootResponse {
    pub epoch: u64,
    pub root: String,
}

pub async fn current_root(State(state): State<Arc<RwLock<AppState>>>) -> impl IntoResponse {
    let state = state.read().await;

    match state.registry.current() {
        Ok(current) => (
            StatusCode::OK,
            Json(RootResponse {
                epoch: current.epoch,
                root: encode_hash(&current.root),
            }),
        )
            .into_response(),
        Err(e) => not_found(e.to_string()),
    }
}

// ============ Proof distribution ============

#[derive(Deserialize)]
pub struct GenerateProofRequest {
    pub address: String,
}

#[derive(Serialize)]
pub struct GenerateProofResponse {
    pub epoch: u64,
    pub root: String,
    pub proof: Vec<String>,
}

pub async fn generate_proof(
    State(state): State<Arc<RwLock<AppState>>>,
    Json(req): Json<GenerateProofRequest>,
) -> impl IntoResponse {
    let address = match req.address.parse::<Address>() {
        Ok(addr) => addr,
        Err(e) => return bad_request(e.to_string()),
    };

    let state = state.read().await;

    let current = match state.registry.current() {
        Ok(current) => current,
        Err(e) => return not_found(e.to_string()),
    };

    let Some(tree) = state.trees.get(&current.epoch) else {
        return not_found("no allowlist loaded for the current epoch; republish it".to_string());
    };

    match tree.proof(&address) {
        Ok(proof) => (
            StatusCode::OK,
            Json(GenerateProofResponse {
                epoch: current.epoch,
                root: encode_hash(&current.root),
                proof: encode_proof(&proof),
            }),
        )
            .into_response(),
        Err(e) => not_found(e.to_string()),
    }
}

#[derive(Deserialize)]
pub struct VerifyRequest {
    pub root: String,
    pub address: String,
    pub proof: Vec<String>,
}

#[derive(Serialize)]
pub struct VerifyResponse {
    pub valid: bool,
}

/// Stateless verification against any root, current or superseded.
pub async fn verify_proof(Json(req): Json<VerifyRequest>) -> impl IntoResponse {
    let root = match parse_hash(&req.root) {
        Ok(root) => root,
        Err(e) => return bad_request(e),
    };
    let address = match req.address.parse::<Address>() {
        Ok(addr) => addr,
        Err(e) => return bad_request(e.to_string()),
    };
    let proof = match parse_proof(&req.proof) {
        Ok(proof) => proof,
        Err(e) => return bad_request(e),
    };

    (
        StatusCode::OK,
        Json(VerifyResponse {
            valid: verify(&root, &address, &proof),
        }),
    )
        .into_response()
}

// ============ Claims ============

#[derive(Deserialize)]
pub struct ClaimRequest {
    pub address: String,
    pub proof: Vec<String>,
}

#[derive(Serialize)]
pub struct ClaimResponse {
    pub claimed: bool,
    pub epoch: u64,
}

pub async fn claim(
    State(state): State<Arc<RwLock<AppState>>>,
    Json(req): Json<ClaimRequest>,
) -> impl IntoResponse {
    let address = match req.address.parse::<Address>() {
        Ok(addr) => addr,
        Err(e) => return bad_request(e.to_string()),
    };
    let proof = match parse_proof(&req.proof) {
        Ok(proof) => proof,
        Err(e) => return bad_request(e),
    };

    let mut state = state.write().await;

    let epoch = match state.registry.current() {
        Ok(current) => current.epoch,
        Err(e) => return not_found(e.to_string()),
    };

    match state.ledger.claim(address, &proof, unix_now()) {
        Ok(()) => {
            info!(%address, epoch, "claim accepted");
            (StatusCode::OK, Json(ClaimResponse { claimed: true, epoch })).into_response()
        }
        Err(e) => bad_request(e.to_string()),
    }
}
