//! Merkle tree over a fixed set of allowlisted addresses.
//!
//! Construction contract (all of it load-bearing for interop):
//! 1. Every address hashes to `keccak256(address)`.
//! 2. Leaves are sorted byte-wise ascending and deduplicated, so the root is
//!    a function of the address *set*: input order and duplicates never
//!    change it.
//! 3. Adjacent nodes combine pairwise with the canonical sorted-pair hash.
//! 4. An unpaired last node is promoted unchanged to the next level.

use std::collections::HashMap;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::address::Address;
use crate::error::MerkleError;
use crate::keccak::{hash_leaf, hash_pair, Hash};
use crate::proof::InclusionProof;

/// Immutable Merkle commitment to an address set.
///
/// Building is the only way to change the committed set; a new allowlist
/// epoch means a new tree and a new root.
#[derive(Clone, Debug)]
pub struct AllowlistTree {
    /// All node hashes, bottom-up: `levels[0]` is the sorted, deduplicated
    /// leaf level and the last level holds the single root.
    levels: Vec<Vec<Hash>>,

    /// Leaf hash -> index in `levels[0]`.
    leaf_index: HashMap<Hash, usize>,
}

impl AllowlistTree {
    /// Build a tree committing to the given addresses.
    ///
    /// Duplicate addresses collapse to a single leaf. Fails with
    /// [`MerkleError::EmptySet`] when no addresses are supplied.
    pub fn build(addresses: &[Address]) -> Result<Self, MerkleError> {
        if addresses.is_empty() {
            return Err(MerkleError::EmptySet);
        }

        #[cfg(feature = "parallel")]
        let mut leaves: Vec<Hash> = addresses.par_iter().map(hash_leaf).collect();
        #[cfg(not(feature = "parallel"))]
        let mut leaves: Vec<Hash> = addresses.iter().map(hash_leaf).collect();

        leaves.sort_unstable();
        leaves.dedup();

        let leaf_index = leaves
            .iter()
            .enumerate()
            .map(|(i, leaf)| (*leaf, i))
            .collect();

        let mut levels = vec![leaves];
        while levels.last().is_some_and(|level| level.len() > 1) {
            let current = levels.last().expect("levels is never empty");
            let mut next = Vec::with_capacity(current.len().div_ceil(2));

            for pair in current.chunks(2) {
                match pair {
                    [left, right] => next.push(hash_pair(left, right)),
                    // Odd node: promoted unchanged.
                    [last] => next.push(*last),
                    _ => unreachable!("chunks(2) yields one or two nodes"),
                }
            }

            levels.push(next);
        }

        Ok(Self { levels, leaf_index })
    }

    /// The root commitment.
    pub fn root(&self) -> Hash {
        self.levels.last().expect("levels is never empty")[0]
    }

    /// Whether the address is part of the committed set.
    pub fn contains(&self, address: &Address) -> bool {
        self.leaf_index.contains_key(&hash_leaf(address))
    }

    /// Generate the inclusion proof for an address.
    ///
    /// Fails with [`MerkleError::NotFound`] when the address was not part of
    /// the set this tree was built from.
    pub fn proof(&self, address: &Address) -> Result<InclusionProof, MerkleError> {
        let leaf = hash_leaf(address);
        let mut index = *self
            .leaf_index
            .get(&leaf)
            .ok_or(MerkleError::NotFound(*address))?;

        let mut siblings = Vec::with_capacity(self.levels.len() - 1);
        for level in &self.levels[..self.levels.len() - 1] {
            let sibling_index = index ^ 1;
            // A promoted node has no sibling at this level.
            if sibling_index < level.len() {
                siblings.push(level[sibling_index]);
            }
            index >>= 1;
        }

        Ok(InclusionProof::new(siblings))
    }

    /// Number of distinct committed leaves.
    pub fn len(&self) -> usize {
        self.levels[0].len()
    }

    /// A built tree always holds at least one leaf.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The sorted, deduplicated leaf hashes.
    pub fn leaves(&self) -> &[Hash] {
        &self.levels[0]
    }

    /// Depth of the tree in levels, counting the leaf level and the root.
    pub fn depth(&self) -> usize {
        self.levels.len()
    }
}

#[cfg(test)]
mod tree_tests {
    use super::*;

    fn addr(n: u8) -> Address {
        let mut bytes = [0u8; 20];
        bytes[19] = n;
        Address::new(bytes)
    }

    #[test]
    fn test_empty_set_rejected() {
        assert_eq!(AllowlistTree::build(&[]).unwrap_err(), MerkleError::EmptySet);
    }

    #[test]
    fn test_single_leaf_root_is_leaf() {
        let a = addr(1);
        let tree = AllowlistTree::build(&[a]).unwrap();

        assert_eq!(tree.root(), hash_leaf(&a));
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.depth(), 1);
    }

    #[test]
    fn test_two_leaf_root() {
        let (a, b) = (addr(1), addr(2));
        let tree = AllowlistTree::build(&[a, b]).unwrap();

        let expected = hash_pair(&hash_leaf(&a), &hash_leaf(&b));
        assert_eq!(tree.root(), expected);
    }

    #[test]
    fn test_duplicates_collapse() {
        let (a, b) = (addr(1), addr(2));
        let deduped = AllowlistTree::build(&[a, b]).unwrap();
        let duplicated = AllowlistTree::build(&[a, b, a, a, b]).unwrap();

        assert_eq!(deduped.root(), duplicated.root());
        assert_eq!(duplicated.len(), 2);
    }

    #[test]
    fn test_input_order_irrelevant() {
        let set = [addr(1), addr(2), addr(3), addr(4), addr(5)];
        let mut reversed = set;
        reversed.reverse();

        let t1 = AllowlistTree::build(&set).unwrap();
        let t2 = AllowlistTree::build(&reversed).unwrap();

        assert_eq!(t1.root(), t2.root());
    }

    #[test]
    fn test_odd_leaf_promoted_unchanged() {
        // Three leaves: the unpaired third leaf is carried up as-is, so
        // root = H(H(l0, l1), l2) over the sorted leaf order. Asserting the
        // exact value rules out duplication-based padding.
        let set = [addr(1), addr(2), addr(3)];
        let tree = AllowlistTree::build(&set).unwrap();

        let mut leaves: Vec<Hash> = set.iter().map(hash_leaf).collect();
        leaves.sort_unstable();

        let paired = hash_pair(&leaves[0], &leaves[1]);
        let expected = hash_pair(&paired, &leaves[2]);
        assert_eq!(tree.root(), expected);
    }

    #[test]
    fn test_contains() {
        let tree = AllowlistTree::build(&[addr(1), addr(2)]).unwrap();

        assert!(tree.contains(&addr(1)));
        assert!(tree.contains(&addr(2)));
        assert!(!tree.contains(&addr(3)));
    }

    #[test]
    fn test_proof_for_absent_address_fails() {
        let tree = AllowlistTree::build(&[addr(1), addr(2)]).unwrap();

        assert_eq!(
            tree.proof(&addr(9)).unwrap_err(),
            MerkleError::NotFound(addr(9))
        );
    }

    #[test]
    fn test_different_sets_different_roots() {
        let t1 = AllowlistTree::build(&[addr(1), addr(2)]).unwrap();
        let t2 = AllowlistTree::build(&[addr(1), addr(3)]).unwrap();

        assert_ne!(t1.root(), t2.root());
    }
}
