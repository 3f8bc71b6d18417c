//! Domain-separated hash inputs
//!
//! Every SHA-256 input in the tree starts with a [`HashHead`] naming the
//! input kind, the issuer and the batch, so leaf, node and empty-subtree
//! hashes can never collide across types, issuers or batches.
//!
//! Hash inputs are one-way: they are serialized and hashed during issuance
//! and verification but never appear on the wire, so they expose `to_bytes`
//! rather than implementing the full codec.

use mtc_codec::{codec_enum, Codec};
use mtc_types::{Assertion, IssuerId, Sha256Hash};
use sha2::{Digest, Sha256};

/// Serialized width of a hash head: the head is zero-padded to the SHA-256
/// block size so the fixed prefix occupies exactly one compression block.
pub const HASH_HEAD_LEN: usize = 64;

codec_enum! {
    /// Domain-separation tag naming the kind of hash input
    pub enum Distinguisher: u8 {
        EmptyInput = 0,
        NodeInput = 1,
        AssertionInput = 2,
    }
}

/// The shared prefix of every hash input: `(distinguisher, issuer_id,
/// batch_number)`, zero-padded to [`HASH_HEAD_LEN`] bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashHead {
    distinguisher: Distinguisher,
    issuer_id: IssuerId,
    batch_number: u32,
}

impl HashHead {
    /// Creates a head for the given input kind.
    ///
    /// The issuer id's 32-byte bound keeps the head inside one block; callers
    /// validate it before building heads.
    pub fn new(distinguisher: Distinguisher, issuer_id: IssuerId, batch_number: u32) -> Self {
        Self {
            distinguisher,
            issuer_id,
            batch_number,
        }
    }

    /// Serializes the head into its padded block.
    pub fn to_block(&self) -> [u8; HASH_HEAD_LEN] {
        let mut buf = Vec::with_capacity(HASH_HEAD_LEN);
        self.distinguisher.encode(&mut buf);
        self.issuer_id.encode(&mut buf);
        self.batch_number.encode(&mut buf);
        debug_assert!(buf.len() <= HASH_HEAD_LEN);
        let mut block = [0u8; HASH_HEAD_LEN];
        block[..buf.len()].copy_from_slice(&buf);
        block
    }
}

/// Hash input for an empty subtree at `(level, index)`.
pub struct HashEmptyInput<'a> {
    pub head: &'a HashHead,
    pub index: u64,
    pub level: u8,
}

impl HashEmptyInput<'_> {
    pub fn hash(&self) -> Sha256Hash {
        let mut hasher = Sha256::new();
        hasher.update(self.head.to_block());
        hasher.update(self.index.to_be_bytes());
        hasher.update([self.level]);
        Sha256Hash::new(hasher.finalize().into())
    }
}

/// Hash input for an internal node with both children present.
pub struct HashNodeInput<'a> {
    pub head: &'a HashHead,
    pub index: u64,
    pub level: u8,
    pub left: &'a Sha256Hash,
    pub right: &'a Sha256Hash,
}

impl HashNodeInput<'_> {
    pub fn hash(&self) -> Sha256Hash {
        let mut hasher = Sha256::new();
        hasher.update(self.head.to_block());
        hasher.update(self.index.to_be_bytes());
        hasher.update([self.level]);
        hasher.update(self.left.as_bytes());
        hasher.update(self.right.as_bytes());
        Sha256Hash::new(hasher.finalize().into())
    }
}

/// Hash input for the leaf committing to one assertion.
pub struct HashAssertionInput<'a> {
    pub head: &'a HashHead,
    pub index: u64,
    pub assertion: &'a Assertion,
}

impl HashAssertionInput<'_> {
    pub fn hash(&self) -> Sha256Hash {
        let mut hasher = Sha256::new();
        hasher.update(self.head.to_block());
        hasher.update(self.index.to_be_bytes());
        hasher.update(self.assertion.to_bytes());
        Sha256Hash::new(hasher.finalize().into())
    }
}
