//! Keccak-256 hashing primitives for the allowlist tree.
//!
//! Two fixed rules make the commitment reproducible across implementations:
//! a leaf is `keccak256(address bytes)`, and an interior node hashes its two
//! children in canonical (byte-wise sorted) order. Verifiers that apply the
//! same rules agree bit-for-bit on every root.

use sha3::{Digest, Keccak256};

use crate::address::Address;

/// A 32-byte Keccak-256 digest.
pub type Hash = [u8; 32];

/// Keccak-256 of arbitrary bytes.
pub fn keccak256(data: &[u8]) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Hash an address into its leaf: `keccak256(address bytes)`.
pub fn hash_leaf(address: &Address) -> Hash {
    keccak256(address.as_bytes())
}

/// Hash two sibling nodes into their parent.
///
/// The smaller hash (byte-wise) always goes first, so callers never need to
/// track which side a sibling was on.
pub fn hash_pair(a: &Hash, b: &Hash) -> Hash {
    let mut hasher = Keccak256::new();
    if a <= b {
        hasher.update(a);
        hasher.update(b);
    } else {
        hasher.update(b);
        hasher.update(a);
    }
    hasher.finalize().into()
}
