//! Merkle tree construction for Merkle Tree Certificates
//!
//! This crate builds the per-batch tree over an ordered assertion list with
//! domain-separated SHA-256 hashing: every hash input is prefixed by a
//! [`HashHead`] naming the input kind, the issuer and the batch. Unpopulated
//! subtrees hash a dedicated empty input instead of duplicating children, so
//! they are computed on demand rather than materialized.

mod error;
mod hash;
mod tree;

pub use error::{Error, Result};
pub use hash::{
    Distinguisher, HashAssertionInput, HashEmptyInput, HashHead, HashNodeInput, HASH_HEAD_LEN,
};
pub use tree::MerkleTree;
