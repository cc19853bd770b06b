//! Crypto error types.

use thiserror::Error;

/// Cryptographic operation errors.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The MAC key was rejected by the primitive.
    #[error("invalid MAC key")]
    InvalidKey,
}
