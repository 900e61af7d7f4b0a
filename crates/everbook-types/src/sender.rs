use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Material a [`SenderId`] is derived from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdentitySource {
    /// A caller-held secret (e.g. a bearer token). The secret itself never
    /// leaves the derivation; only the hash is recorded.
    Secret(Vec<u8>),
    /// An ed25519-style public key (32 bytes).
    PublicKey([u8; 32]),
}

/// Identity of a submitting party, bound to an entry by the ledger at
/// append time.
///
/// A `SenderId` is derived deterministically from [`IdentitySource`] using
/// BLAKE3 with domain separation. The same material always produces the
/// same identity, and callers can never supply a `SenderId` directly on the
/// wire — attribution is decided by whoever holds the material.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SenderId {
    hash: [u8; 32],
}

impl SenderId {
    /// Derive a `SenderId` from identity material.
    pub fn derive(source: &IdentitySource) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"everbook-sender-v1:");
        match source {
            IdentitySource::Secret(bytes) => {
                hasher.update(b"secret:");
                hasher.update(bytes);
            }
            IdentitySource::PublicKey(pk) => {
                hasher.update(b"pubkey:");
                hasher.update(pk);
            }
        }
        Self {
            hash: *hasher.finalize().as_bytes(),
        }
    }

    /// Create an ephemeral (random) sender for tests and demos.
    pub fn ephemeral() -> Self {
        let mut bytes = [0u8; 32];
        rand::Rng::fill(&mut rand::thread_rng(), &mut bytes);
        Self::derive(&IdentitySource::Secret(bytes.to_vec()))
    }

    /// The raw 32-byte hash.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.hash
    }

    /// Full hex-encoded string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.hash)
    }

    /// Short identifier (first 8 hex characters).
    pub fn short_id(&self) -> String {
        format!("eb:{}", hex::encode(&self.hash[..4]))
    }

    /// Parse from a hex string (64 hex characters, optional `eb:` prefix).
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let s = s.strip_prefix("eb:").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != 32 {
            return Err(TypeError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self { hash: arr })
    }

    /// Create from a raw 32-byte hash. Use `derive()` for production code.
    pub fn from_raw(hash: [u8; 32]) -> Self {
        Self { hash }
    }
}

impl fmt::Debug for SenderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SenderId({})", self.short_id())
    }
}

impl fmt::Display for SenderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_id())
    }
}
