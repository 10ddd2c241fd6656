//! Errors for tree construction and proof generation.

use thiserror::Error;

use crate::address::Address;

/// Errors from the allowlist Merkle engine.
///
/// All of these indicate caller-supplied bad input; none are transient, so
/// none are worth retrying with the same arguments.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum MerkleError {
    #[error("cannot build a tree from an empty identity set")]
    EmptySet,

    #[error("identity {0} is not in the committed set")]
    NotFound(Address),

    #[error("malformed proof: {0}")]
    MalformedProof(String),
}
