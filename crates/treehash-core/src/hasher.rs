//! SHA-256 digest primitive.

use sha2::{Digest as _, Sha256};

use crate::error::{Result, TreeHashError};
use crate::Digest;

/// Hash capability consumed by the digester and reducer.
///
/// Every call starts from a fresh state; implementations keep nothing
/// between calls.
pub trait DigestPrimitive {
    /// Digest a byte slice.
    fn digest(&self, data: &[u8]) -> Digest;

    /// Digest the concatenation of two digests (64 bytes, left first).
    fn digest_pair(&self, left: &Digest, right: &Digest) -> Digest {
        let mut joined = [0u8; 64];
        joined[..32].copy_from_slice(left);
        joined[32..].copy_from_slice(right);
        self.digest(&joined)
    }
}

/// SHA-256 backed by the `sha2` crate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sha256Primitive;

impl Sha256Primitive {
    /// Canonical algorithm name.
    pub const NAME: &'static str = "SHA-256";
}

impl DigestPrimitive for Sha256Primitive {
    fn digest(&self, data: &[u8]) -> Digest {
        Sha256::digest(data).into()
    }

    fn digest_pair(&self, left: &Digest, right: &Digest) -> Digest {
        let mut hasher = Sha256::new();
        hasher.update(left);
        hasher.update(right);
        hasher.finalize().into()
    }
}

/// Look up a hash primitive by name.
///
/// Accepts `SHA-256`, `SHA256` and `sha256` in any case.
///
/// # Errors
///
/// Returns [`TreeHashError::UnsupportedAlgorithm`] for any other name.
pub fn primitive_for(name: &str) -> Result<Sha256Primitive> {
    let normalized = name.trim().replace('-', "").to_ascii_lowercase();
    if normalized == "sha256" {
        Ok(Sha256Primitive)
    } else {
        Err(TreeHashError::UnsupportedAlgorithm(name.to_string()))
    }
}

/// Hash a single chunk with SHA-256
#[must_use]
pub fn hash_chunk(data: &[u8]) -> Digest {
    Sha256Primitive.digest(data)
}

/// Verify a chunk against its expected digest
#[must_use]
pub fn verify_chunk(data: &[u8], expected: &Digest) -> bool {
    hash_chunk(data) == *expected
}
