//! Hex encoding of digests.

use crate::error::{Result, TreeHashError};
use crate::{DIGEST_SIZE, Digest};

/// Encode a digest as 64 lowercase hex characters.
#[must_use]
pub fn to_hex(digest: &Digest) -> String {
    hex::encode(digest)
}

/// Decode 64 hex characters (either case) into a digest.
///
/// # Errors
///
/// Returns [`TreeHashError::InvalidHexDigest`] if the input is not exactly
/// 64 hex characters.
pub fn from_hex(s: &str) -> Result<Digest> {
    let mut digest = [0u8; DIGEST_SIZE];
    hex::decode_to_slice(s, &mut digest)
        .map_err(|e| TreeHashError::InvalidHexDigest(format!("{s:?}: {e}")))?;
    Ok(digest)
}
