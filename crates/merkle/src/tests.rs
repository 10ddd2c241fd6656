//! Cross-module property tests for the allowlist engine.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::address::Address;
use crate::error::MerkleError;
use crate::proof::{verify, InclusionProof};
use crate::tree::AllowlistTree;

fn random_addresses(rng: &mut StdRng, count: usize) -> Vec<Address> {
    (0..count)
        .map(|_| {
            let mut bytes = [0u8; 20];
            rng.fill_bytes(&mut bytes);
            Address::new(bytes)
        })
        .collect()
}

#[test]
fn test_completeness_every_member_verifies() {
    let mut rng = StdRng::seed_from_u64(42);

    // Odd count forces promotion on several levels.
    for count in [1, 2, 3, 7, 11, 64] {
        let addresses = random_addresses(&mut rng, count);
        let tree = AllowlistTree::build(&addresses).unwrap();
        let root = tree.root();

        for address in &addresses {
            let proof = tree.proof(address).unwrap();
            assert!(
                verify(&root, address, &proof),
                "member {address} failed to verify in a {count}-leaf tree"
            );
        }
    }
}

#[test]
fn test_determinism_under_permutation() {
    let mut rng = StdRng::seed_from_u64(7);
    let addresses = random_addresses(&mut rng, 9);

    let root = AllowlistTree::build(&addresses).unwrap().root();

    let mut shuffled = addresses.clone();
    shuffled.rotate_left(4);
    shuffled.swap(0, 7);
    assert_eq!(AllowlistTree::build(&shuffled).unwrap().root(), root);

    let mut reversed = addresses;
    reversed.reverse();
    assert_eq!(AllowlistTree::build(&reversed).unwrap().root(), root);
}

#[test]
fn test_soundness_proof_does_not_transfer() {
    let mut rng = StdRng::seed_from_u64(11);
    let addresses = random_addresses(&mut rng, 8);
    let outsider = random_addresses(&mut rng, 1)[0];

    let tree = AllowlistTree::build(&addresses).unwrap();
    let root = tree.root();

    assert_eq!(
        tree.proof(&outsider).unwrap_err(),
        MerkleError::NotFound(outsider)
    );

    // A member's proof must not verify for anyone else, member or not.
    let proof = tree.proof(&addresses[0]).unwrap();
    assert!(!verify(&root, &addresses[1], &proof));
    assert!(!verify(&root, &outsider, &proof));
}

#[test]
fn test_tamper_sensitivity_single_bit() {
    let mut rng = StdRng::seed_from_u64(3);
    let addresses = random_addresses(&mut rng, 6);

    let tree = AllowlistTree::build(&addresses).unwrap();
    let root = tree.root();
    let target = addresses[2];
    let proof = tree.proof(&target).unwrap();
    assert!(verify(&root, &target, &proof));

    // Flip every bit of every sibling, one at a time.
    for level in 0..proof.depth() {
        for byte in 0..32 {
            for bit in 0..8 {
                let mut siblings = proof.siblings().to_vec();
                siblings[level][byte] ^= 1 << bit;
                let tampered = InclusionProof::new(siblings);
                assert!(
                    !verify(&root, &target, &tampered),
                    "bit flip at level {level} byte {byte} bit {bit} went undetected"
                );
            }
        }
    }

    // Any single-bit change to the root also rejects.
    for byte in 0..32 {
        let mut bad_root = root;
        bad_root[byte] ^= 0x01;
        assert!(!verify(&bad_root, &target, &proof));
    }
}

#[test]
fn test_idempotence_repeated_calls() {
    let mut rng = StdRng::seed_from_u64(5);
    let addresses = random_addresses(&mut rng, 5);

    let tree = AllowlistTree::build(&addresses).unwrap();
    let first = tree.proof(&addresses[0]).unwrap();

    for _ in 0..10 {
        assert_eq!(tree.proof(&addresses[0]).unwrap(), first);
        assert_eq!(tree.root(), tree.root());
        assert!(verify(&tree.root(), &addresses[0], &first));
    }
}

#[test]
fn test_proofs_go_stale_across_epochs() {
    let mut rng = StdRng::seed_from_u64(13);
    let mut addresses = random_addresses(&mut rng, 6);

    let old_tree = AllowlistTree::build(&addresses).unwrap();
    let old_proof = old_tree.proof(&addresses[0]).unwrap();

    // The allowlist grows for the next epoch; old proofs must be
    // regenerated.
    addresses.extend(random_addresses(&mut rng, 2));
    let new_tree = AllowlistTree::build(&addresses).unwrap();

    assert_ne!(old_tree.root(), new_tree.root());
    assert!(verify(&old_tree.root(), &addresses[0], &old_proof));
    assert!(!verify(&new_tree.root(), &addresses[0], &old_proof));
}
