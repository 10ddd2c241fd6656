//! Claim gating against the stored allowlist root.
//!
//! Models the ledger side of the system: a claim arrives as an (address,
//! proof) pair and is accepted or rejected against the currently stored
//! root. Rejects are named failures, never silent no-ops, and the failure
//! strings match the on-chain revert reasons ("Not Active", "Invalid Proof",
//! "Not Eligible to Mint").

use std::collections::HashSet;

use thiserror::Error;

use allowlist_merkle::{verify, Address, Hash, InclusionProof};

/// Why a claim was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClaimError {
    /// The claim window has not opened yet.
    #[error("Not Active")]
    NotActive,
    /// No root is stored, or the proof does not recompute the stored root.
    #[error("Invalid Proof")]
    InvalidProof,
    /// The address already claimed in this epoch.
    #[error("Not Eligible to Mint")]
    AlreadyClaimed,
}

/// Per-epoch claim state: the stored root, the claim window, and which
/// addresses have already claimed.
#[derive(Clone, Debug, Default)]
pub struct ClaimLedger {
    root: Option<Hash>,
    /// Unix seconds; claims before this instant are rejected. Zero means
    /// the window is open immediately.
    claim_start_time: u64,
    claimed: HashSet<Address>,
}

impl ClaimLedger {
    /// Create a ledger with no stored root and an immediately open window.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new root commitment.
    ///
    /// When the root actually changes, the claimed set resets: a new epoch
    /// restores everyone's eligibility. Re-storing the same root is a no-op.
    pub fn update_root(&mut self, root: Hash) {
        if self.root != Some(root) {
            self.root = Some(root);
            self.claimed.clear();
        }
    }

    /// Move the claim window start.
    pub fn update_claim_start_time(&mut self, start_time: u64) {
        self.claim_start_time = start_time;
    }

    /// The stored root, if any.
    pub fn root(&self) -> Option<Hash> {
        self.root
    }

    /// Whether the address has already claimed in the current epoch.
    pub fn has_claimed(&self, address: &Address) -> bool {
        self.claimed.contains(address)
    }

    /// Number of successful claims in the current epoch.
    pub fn claim_count(&self) -> usize {
        self.claimed.len()
    }

    /// Accept or reject a claim at time `now` (unix seconds).
    ///
    /// Checks run in the same order as the original contract: the claim
    /// window first, then proof validity, then one-claim-per-address.
    pub fn claim(
        &mut self,
        address: Address,
        proof: &InclusionProof,
        now: u64,
    ) -> Result<(), ClaimError> {
        if now < self.claim_start_time {
            return Err(ClaimError::NotActive);
        }

        let root = self.root.ok_or(ClaimError::InvalidProof)?;
        if !verify(&root, &address, proof) {
            return Err(ClaimError::InvalidProof);
        }

        if !self.claimed.insert(address) {
            return Err(ClaimError::AlreadyClaimed);
        }

        Ok(())
    }
}
