//! Inclusion proofs for allowlist membership.
//!
//! A proof is the ordered sibling hashes from an address's leaf up to the
//! root. Because interior nodes hash their children in canonical sorted
//! order, the proof needs no direction bits: verification folds the leaf
//! through the siblings with the same pair rule and compares the result to
//! the root. Only the root, the address, and the proof are needed, which is
//! what lets the real verifier run inside an on-chain contract that cannot
//! hold the full set.

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::error::MerkleError;
use crate::keccak::{hash_leaf, hash_pair, Hash};

/// Maximum number of proof levels (supports up to 2^32 leaves). Anything
/// longer is structurally malformed, not just unverifiable.
pub const MAX_PROOF_DEPTH: usize = 32;

/// A membership proof: sibling hashes from leaf level to root.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InclusionProof {
    siblings: Vec<Hash>,
}

impl InclusionProof {
    /// Create a proof from an ordered sibling path.
    pub fn new(siblings: Vec<Hash>) -> Self {
        Self { siblings }
    }

    /// The sibling hashes, leaf level first.
    pub fn siblings(&self) -> &[Hash] {
        &self.siblings
    }

    /// Number of levels the proof climbs.
    pub fn depth(&self) -> usize {
        self.siblings.len()
    }

    /// Structural validation for externally supplied proofs.
    ///
    /// Call this after deserializing a proof from an untrusted source to
    /// distinguish a malformed proof from one that merely fails to verify.
    pub fn validate(&self) -> Result<(), MerkleError> {
        if self.siblings.len() > MAX_PROOF_DEPTH {
            return Err(MerkleError::MalformedProof(format!(
                "proof depth {} exceeds maximum {}",
                self.siblings.len(),
                MAX_PROOF_DEPTH
            )));
        }
        Ok(())
    }

    /// Recompute the candidate root for an address under this proof.
    pub fn compute_root(&self, address: &Address) -> Hash {
        let mut node = hash_leaf(address);
        for sibling in &self.siblings {
            node = hash_pair(&node, sibling);
        }
        node
    }

    /// Check this proof against a root for an address.
    pub fn verify(&self, root: &Hash, address: &Address) -> bool {
        verify(root, address, self)
    }
}

/// Verify that `proof` places `address` under `root`.
///
/// Pure and stateless: safe to call concurrently and repeatedly. Malformed
/// proofs simply fail to verify here; use [`InclusionProof::validate`] when
/// the caller needs the distinction.
pub fn verify(root: &Hash, address: &Address, proof: &InclusionProof) -> bool {
    if proof.validate().is_err() {
        return false;
    }
    proof.compute_root(address) == *root
}

#[cfg(test)]
mod proof_tests {
    use super::*;
    use crate::keccak::keccak256;

    fn addr(n: u8) -> Address {
        let mut bytes = [0u8; 20];
        bytes[19] = n;
        Address::new(bytes)
    }

    #[test]
    fn test_empty_proof_roots_at_leaf() {
        let a = addr(1);
        let proof = InclusionProof::new(Vec::new());

        assert_eq!(proof.compute_root(&a), hash_leaf(&a));
        assert!(verify(&hash_leaf(&a), &a, &proof));
    }

    #[test]
    fn test_two_leaf_worked_example() {
        // With {A, B}: proof(A) = [Leaf(B)], root = H(sort(Leaf(A), Leaf(B))).
        let (a, b) = (addr(1), addr(2));
        let root = hash_pair(&hash_leaf(&a), &hash_leaf(&b));
        let proof = InclusionProof::new(vec![hash_leaf(&b)]);

        assert!(verify(&root, &a, &proof));
        // The same proof must not verify for any third address.
        assert!(!verify(&root, &addr(3), &proof));
    }

    #[test]
    fn test_validate_rejects_overlong_proof() {
        let proof = InclusionProof::new(vec![[0u8; 32]; MAX_PROOF_DEPTH + 1]);

        assert!(matches!(
            proof.validate(),
            Err(MerkleError::MalformedProof(_))
        ));
        // And verification treats it as invalid rather than panicking.
        assert!(!verify(&[0u8; 32], &addr(1), &proof));
    }

    #[test]
    fn test_validate_accepts_max_depth() {
        let proof = InclusionProof::new(vec![[0u8; 32]; MAX_PROOF_DEPTH]);
        assert!(proof.validate().is_ok());
    }

    #[test]
    fn test_serde_roundtrip() {
        let proof = InclusionProof::new(vec![keccak256(b"sibling-0"), keccak256(b"sibling-1")]);
        let json = serde_json::to_string(&proof).unwrap();
        let back: InclusionProof = serde_json::from_str(&json).unwrap();

        assert_eq!(back, proof);
    }
}
