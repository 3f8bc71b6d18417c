//! Error type for the issuance pipeline and glue

use thiserror::Error;

/// Errors surfaced by the umbrella crate
#[derive(Error, Debug)]
pub enum Error {
    /// A byte stream could not be decoded
    #[error(transparent)]
    Parsing(#[from] mtc_codec::ParsingError),

    /// A value broke a semantic invariant
    #[error(transparent)]
    Validation(#[from] mtc_codec::ValidationError),

    /// A certificate or window failed verification
    #[error(transparent)]
    Verification(#[from] mtc_certificate::VerificationError),

    /// Tree construction or proof extraction failed
    #[error(transparent)]
    Merkle(#[from] mtc_merkle::Error),

    /// Key handling or signing failed
    #[error(transparent)]
    Crypto(#[from] mtc_crypto::Error),

    /// A batch input document could not be translated
    #[error("invalid batch input: {0}")]
    Input(String),

    /// Filesystem error in the publication layout
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON error in the batch input
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type for the issuance pipeline
pub type Result<T> = std::result::Result<T, Error>;
