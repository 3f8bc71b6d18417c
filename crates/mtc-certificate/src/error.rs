//! Error types for mtc-certificate

use thiserror::Error;

/// Errors reported by certificate and validity-window verification.
///
/// Each failure carries the specific reason; none is retried.
#[derive(Error, Debug)]
pub enum VerificationError {
    /// The certificate names a different issuer
    #[error("certificate issuer {found:?} does not match expected issuer {expected:?}")]
    IssuerMismatch { expected: String, found: String },

    /// The claimed batch is not covered by the validity window
    #[error("batch {batch_number} outside validity window {oldest}..={newest}")]
    OutOfWindow {
        batch_number: u32,
        oldest: u32,
        newest: u32,
    },

    /// The window signature does not verify under the issuer key
    #[error("validity window signature invalid: {0}")]
    Signature(#[from] mtc_crypto::Error),

    /// The inclusion path is longer than any tree this scheme can produce
    #[error("inclusion path has {got} entries, more than the {max} supported levels")]
    PathTooLong { got: usize, max: usize },

    /// The leaf index does not resolve to the root within the path
    #[error("leaf index {index} does not resolve within an inclusion path of {path_len} entries")]
    IndexOutsidePath { index: u64, path_len: usize },

    /// The recomputed root differs from the covered tree head
    #[error("recomputed root {computed} does not match tree head {expected}")]
    RootMismatch { expected: String, computed: String },

    /// A rotation skipped or repeated a batch number
    #[error("batch {requested} does not follow previous validity window batch {previous}")]
    NonContiguousBatch { previous: u32, requested: u32 },

    /// A window must retain at least one tree head
    #[error("validity window size must be at least 1")]
    ZeroWindowSize,
}

/// Result type for verification operations
pub type Result<T> = std::result::Result<T, VerificationError>;
