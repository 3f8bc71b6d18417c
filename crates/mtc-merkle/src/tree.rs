//! The per-batch Merkle tree
//!
//! The tree commits to the ordered assertions of one batch. Only nodes
//! reachable from real leaves are materialized: level `l` holds exactly
//! `ceil(n / 2^l)` hashes, and the hash of any unpopulated subtree is
//! computed on demand from its `(level, index)` position.

use mtc_codec::Codec;
use mtc_types::{Assertion, IssuerId, Sha256Hash};

use crate::error::{Error, Result};
use crate::hash::{
    Distinguisher, HashAssertionInput, HashEmptyInput, HashHead, HashNodeInput,
};

/// The layered node table for one batch.
///
/// Level 0 is the leaf layer; the top level holds the root. For `n`
/// assertions the table holds at most `2n - 1` hashes.
#[derive(Debug, Clone)]
pub struct MerkleTree {
    issuer_id: IssuerId,
    batch_number: u32,
    levels: Vec<Vec<Sha256Hash>>,
    empty_head: HashHead,
}

impl MerkleTree {
    /// Builds the tree for a batch.
    ///
    /// The result is byte-identical across runs for the same
    /// `(issuer_id, batch_number, assertions)` input.
    pub fn build(assertions: &[Assertion], issuer_id: &IssuerId, batch_number: u32) -> Result<Self> {
        let n = assertions.len();
        if n == 0 {
            return Err(Error::EmptyBatch);
        }
        issuer_id.validate()?;

        let assertion_head = HashHead::new(
            Distinguisher::AssertionInput,
            issuer_id.clone(),
            batch_number,
        );
        let node_head = HashHead::new(Distinguisher::NodeInput, issuer_id.clone(), batch_number);
        let empty_head = HashHead::new(Distinguisher::EmptyInput, issuer_id.clone(), batch_number);

        let leaves: Vec<Sha256Hash> = assertions
            .iter()
            .enumerate()
            .map(|(index, assertion)| {
                HashAssertionInput {
                    head: &assertion_head,
                    index: index as u64,
                    assertion,
                }
                .hash()
            })
            .collect();

        let depth = depth_for(n as u64);
        let mut levels = Vec::with_capacity(depth + 1);
        levels.push(leaves);

        for level in 1..=depth {
            let nodes = {
                let prev: &Vec<Sha256Hash> = &levels[level - 1];
                let count = (prev.len() + 1) / 2;
                (0..count)
                    .map(|index| {
                        let left = &prev[2 * index];
                        let right_index = (2 * index + 1) as u64;
                        let empty;
                        let right = match prev.get(2 * index + 1) {
                            Some(hash) => hash,
                            None => {
                                empty = HashEmptyInput {
                                    head: &empty_head,
                                    index: right_index,
                                    level: (level - 1) as u8,
                                }
                                .hash();
                                &empty
                            }
                        };
                        HashNodeInput {
                            head: &node_head,
                            index: index as u64,
                            level: level as u8,
                            left,
                            right,
                        }
                        .hash()
                    })
                    .collect()
            };
            levels.push(nodes);
        }

        Ok(Self {
            issuer_id: issuer_id.clone(),
            batch_number,
            levels,
            empty_head,
        })
    }

    /// The Merkle root: the single hash at the top level.
    pub fn root(&self) -> Sha256Hash {
        self.levels[self.depth()][0]
    }

    /// Number of levels above the leaves: `ceil(log2(n))`, 0 for a single
    /// leaf.
    pub fn depth(&self) -> usize {
        self.levels.len() - 1
    }

    /// Number of assertions committed by this tree.
    pub fn leaf_count(&self) -> u64 {
        self.levels[0].len() as u64
    }

    pub fn issuer_id(&self) -> &IssuerId {
        &self.issuer_id
    }

    pub fn batch_number(&self) -> u32 {
        self.batch_number
    }

    /// Materialized node at `(level, index)`, if one exists.
    pub fn node(&self, level: usize, index: u64) -> Option<&Sha256Hash> {
        self.levels.get(level)?.get(index as usize)
    }

    /// Hash of the unpopulated subtree at `(level, index)`, computed on
    /// demand.
    pub fn empty_hash(&self, level: u8, index: u64) -> Sha256Hash {
        HashEmptyInput {
            head: &self.empty_head,
            index,
            level,
        }
        .hash()
    }

    /// Sibling hashes from the leaf at `index` up to (but excluding) the
    /// root, bottom-up.
    ///
    /// Siblings outside the populated range are empty-subtree hashes.
    pub fn inclusion_path(&self, index: u64) -> Result<Vec<Sha256Hash>> {
        let count = self.leaf_count();
        if index >= count {
            return Err(Error::IndexOutOfRange { index, count });
        }
        let path = (0..self.depth())
            .map(|level| {
                let sibling = (index >> level) ^ 1;
                match self.levels[level].get(sibling as usize) {
                    Some(hash) => *hash,
                    None => self.empty_hash(level as u8, sibling),
                }
            })
            .collect();
        Ok(path)
    }
}

/// `ceil(log2(n))` for `n >= 1`.
fn depth_for(n: u64) -> usize {
    if n <= 1 {
        0
    } else {
        (u64::BITS - (n - 1).leading_zeros()) as usize
    }
}
