//! Error types for mtc-crypto

use thiserror::Error;

/// Errors that can occur in cryptographic operations
#[derive(Error, Debug)]
pub enum Error {
    /// Key generation error
    #[error("key generation error: {0}")]
    KeyGeneration(String),

    /// Invalid key material
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// Signature verification failed
    #[error("verification error: {0}")]
    Verification(String),

    /// PEM encoding/decoding error
    #[error("PEM error: {0}")]
    Pem(String),
}

impl From<aws_lc_rs::error::Unspecified> for Error {
    fn from(_: aws_lc_rs::error::Unspecified) -> Self {
        Error::KeyGeneration("unspecified error".to_string())
    }
}

impl From<aws_lc_rs::error::KeyRejected> for Error {
    fn from(e: aws_lc_rs::error::KeyRejected) -> Self {
        Error::InvalidKey(e.to_string())
    }
}

/// Result type for cryptographic operations
pub type Result<T> = std::result::Result<T, Error>;
