//! End-to-end batch issuance

use mtc_certificate::{
    create_bikeshed_certificate, create_signed_validity_window, BikeshedCertificate,
    SignedValidityWindow,
};
use mtc_crypto::SigningKey;
use mtc_merkle::MerkleTree;
use mtc_types::{Assertion, IssuerId};
use tracing::{debug, info};

use crate::error::Result;

/// The output of one issuance run: the batch tree and its signed window.
///
/// The tree is retained so certificates for any index can be emitted without
/// rebuilding it.
#[derive(Debug)]
pub struct IssuedBatch {
    tree: MerkleTree,
    signed_window: SignedValidityWindow,
}

impl IssuedBatch {
    pub fn tree(&self) -> &MerkleTree {
        &self.tree
    }

    pub fn signed_window(&self) -> &SignedValidityWindow {
        &self.signed_window
    }

    pub fn batch_number(&self) -> u32 {
        self.tree.batch_number()
    }

    /// Emits the certificate for the assertion at `index`.
    pub fn certificate(&self, assertion: &Assertion, index: u64) -> Result<BikeshedCertificate> {
        Ok(create_bikeshed_certificate(assertion, &self.tree, index)?)
    }
}

/// Commits a batch of assertions: builds the Merkle tree, rotates the
/// validity window and signs it.
pub fn issue_batch(
    assertions: &[Assertion],
    issuer_id: &IssuerId,
    batch_number: u32,
    signing_key: &SigningKey,
    previous: Option<&SignedValidityWindow>,
    window_size: usize,
) -> Result<IssuedBatch> {
    debug!(batch_number, assertions = assertions.len(), "building batch tree");
    let tree = MerkleTree::build(assertions, issuer_id, batch_number)?;
    let signed_window =
        create_signed_validity_window(&tree, signing_key, previous, window_size)?;
    info!(
        batch_number,
        assertions = assertions.len(),
        root = %tree.root(),
        window_size = signed_window.window.window_size(),
        "issued batch"
    );
    Ok(IssuedBatch {
        tree,
        signed_window,
    })
}
