//! Versioned root commitments, one per allowlist epoch.
//!
//! Models the on-chain registry that stores the published allowlist root.
//! Each rebuild of the allowlist publishes a new immutable epoch; superseded
//! epochs are retained so proofs against an old root can still be checked
//! during a transition window.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use allowlist_merkle::Hash;

/// Errors from the root registry.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("no root has been published")]
    NoRoot,
    #[error("unknown epoch {0}")]
    UnknownEpoch(u64),
    #[error("serialization failed: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A root commitment published for one epoch. Immutable once recorded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedRoot {
    pub epoch: u64,
    #[serde(with = "hash_hex")]
    pub root: Hash,
}

/// Append-only record of published roots. The highest epoch is current;
/// earlier epochs are superseded but remain readable.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RootRegistry {
    epochs: Vec<PublishedRoot>,
}

impl RootRegistry {
    /// Create an empty registry with no published root.
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a new root, superseding the current one.
    /// Returns the epoch assigned to it.
    pub fn publish(&mut self, root: Hash) -> u64 {
        let epoch = self.epochs.last().map_or(0, |p| p.epoch + 1);
        self.epochs.push(PublishedRoot { epoch, root });
        epoch
    }

    /// The current (most recently published) root.
    pub fn current(&self) -> Result<PublishedRoot, RegistryError> {
        self.epochs.last().copied().ok_or(RegistryError::NoRoot)
    }

    /// Read back the root stored for a given epoch.
    pub fn root_at(&self, epoch: u64) -> Result<Hash, RegistryError> {
        self.epochs
            .iter()
            .find(|p| p.epoch == epoch)
            .map(|p| p.root)
            .ok_or(RegistryError::UnknownEpoch(epoch))
    }

    /// Whether the given root is the current commitment.
    pub fn is_current(&self, root: &Hash) -> bool {
        self.epochs.last().is_some_and(|p| p.root == *root)
    }

    /// Number of published epochs.
    pub fn len(&self) -> usize {
        self.epochs.len()
    }

    /// Whether any root has been published.
    pub fn is_empty(&self) -> bool {
        self.epochs.is_empty()
    }

    /// Save the registry to a JSON file.
    pub fn save_to_path(&self, path: &Path) -> Result<(), RegistryError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| RegistryError::Serialization(e.to_string()))?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load a registry previously saved with [`save_to_path`].
    ///
    /// [`save_to_path`]: RootRegistry::save_to_path
    pub fn load_from_path(path: &Path) -> Result<Self, RegistryError> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(|e| RegistryError::Serialization(e.to_string()))
    }
}

/// Serde helper storing a 32-byte hash as `0x`-prefixed hex.
mod hash_hex {
    use serde::{de, Deserialize, Deserializer, Serializer};

    use allowlist_merkle::Hash;

    pub fn serialize<S: Serializer>(hash: &Hash, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{}", hex::encode(hash)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Hash, D::Error> {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(s.trim_start_matches("0x")).map_err(de::Error::custom)?;
        bytes
            .try_into()
            .map_err(|_| de::Error::custom("root must be 32 bytes"))
    }
}
