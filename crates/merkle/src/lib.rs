//! Merkle tree commitment for allowlisted addresses.
//!
//! This crate provides:
//! - `Address`: a 20-byte account address (the allowlist identity)
//! - `AllowlistTree`: commitment to a fixed address set, with proof generation
//! - `InclusionProof`: compact membership proof verifiable from the root alone
//!
//! Leaves are `keccak256(address)`. Interior nodes hash the two children in
//! canonical (byte-wise sorted) order, so proofs carry no left/right
//! directions and interoperate with any verifier that applies the same rule.

pub mod address;
pub mod error;
pub mod keccak;
pub mod proof;
pub mod tree;

#[cfg(test)]
mod tests;

pub use address::Address;
pub use error::MerkleError;
pub use keccak::{hash_leaf, hash_pair, keccak256, Hash};
pub use proof::{verify, InclusionProof, MAX_PROOF_DEPTH};
pub use tree::AllowlistTree;
