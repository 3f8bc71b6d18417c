//! Error types for mtc-merkle

use thiserror::Error;

/// Errors that can occur while building a tree or extracting a proof
#[derive(Error, Debug)]
pub enum Error {
    /// A batch must commit to at least one assertion
    #[error("batch contains no assertions")]
    EmptyBatch,

    /// Requested leaf index does not exist in this batch
    #[error("leaf index {index} out of range for batch of {count} assertion(s)")]
    IndexOutOfRange { index: u64, count: u64 },

    /// The issuer identifier breaks its invariants
    #[error("invalid issuer id: {0}")]
    InvalidIssuer(#[from] mtc_codec::ValidationError),
}

/// Result type for Merkle tree operations
pub type Result<T> = std::result::Result<T, Error>;
