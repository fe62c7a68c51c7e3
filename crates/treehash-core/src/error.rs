//! Tree hash error types.

use thiserror::Error;

/// Tree hashing errors
#[derive(Debug, Error)]
pub enum TreeHashError {
    /// Reading the byte source failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The requested hash primitive is not available
    #[error("hash algorithm not available: {0}")]
    UnsupportedAlgorithm(String),

    /// A leaf sequence must contain at least one digest
    #[error("leaf sequence is empty")]
    EmptyLeafSequence,

    /// A hex string could not be decoded into a digest
    #[error("invalid hex digest: {0}")]
    InvalidHexDigest(String),
}

/// Result alias for tree hash operations
pub type Result<T> = std::result::Result<T, TreeHashError>;
