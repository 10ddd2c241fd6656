//! Collaborator models around the allowlist Merkle engine.
//!
//! This crate provides:
//! - `RootRegistry`: the contract-registry side — versioned, persisted root
//!   commitments, one per allowlist epoch
//! - `ClaimLedger`: the ledger side — accepts (address, proof) claims against
//!   the stored root and surfaces rejects as named failures

pub mod claims;
pub mod roots;

pub use claims::{ClaimError, ClaimLedger};
pub use roots::{PublishedRoot, RegistryError, RootRegistry};
