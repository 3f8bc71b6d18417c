//! Cryptographic primitives for Merkle Tree Certificates
//!
//! This crate provides Ed25519 signing and verification over raw 32-byte
//! seeds and public points, using aws-lc-rs as the cryptographic backend,
//! plus PEM encoding for key files.

mod error;
mod keys;
mod signing;

pub use error::{Error, Result};
pub use keys::{
    signing_key_from_pem, signing_key_to_pem, verifying_key_from_pem, verifying_key_to_pem,
};
pub use signing::{SigningKey, VerifyingKey, PUBLIC_KEY_LEN, SEED_LEN, SIGNATURE_LEN};
