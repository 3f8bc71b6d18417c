//! Certificates and certificate verification

use mtc_codec::codec_struct;
use mtc_crypto::VerifyingKey;
use mtc_merkle::{
    Distinguisher, HashAssertionInput, HashHead, HashNodeInput, MerkleTree,
};
use mtc_types::{Assertion, IssuerId};

use crate::error::{Result, VerificationError};
use crate::proof::{
    MerkleTreeProofSha256, MerkleTreeTrustAnchor, Proof, ProofBody, Sha256Vector, TrustAnchor,
};
use crate::window::{verify_validity_window, SignedValidityWindow};

/// Longest inclusion path a u64 leaf index can produce.
pub const MAX_PATH_LEN: usize = 64;

codec_struct! {
    /// A self-contained certificate: the assertion plus its inclusion proof
    pub struct BikeshedCertificate {
        pub assertion: Assertion,
        pub proof: Proof,
    }
}

/// Packages the certificate for the assertion at `index` in a built batch
/// tree.
pub fn create_bikeshed_certificate(
    assertion: &Assertion,
    tree: &MerkleTree,
    index: u64,
) -> mtc_merkle::Result<BikeshedCertificate> {
    let path = tree.inclusion_path(index)?;
    Ok(BikeshedCertificate {
        assertion: assertion.clone(),
        proof: Proof {
            trust_anchor: TrustAnchor::MerkleTreeSha256(MerkleTreeTrustAnchor {
                issuer_id: tree.issuer_id().clone(),
                batch_number: tree.batch_number(),
            }),
            body: ProofBody::MerkleTreeSha256(MerkleTreeProofSha256 {
                index,
                path: Sha256Vector::new_unchecked(path),
            }),
        },
    })
}

/// Verifies a certificate against a signed validity window.
///
/// Checks run cheapest first: the trust anchor's issuer, the window's
/// coverage of the claimed batch, then the window signature, and only then
/// the Merkle recomputation against the covered tree head.
pub fn verify_certificate(
    certificate: &BikeshedCertificate,
    signed_window: &SignedValidityWindow,
    expected_issuer: &IssuerId,
    issuer_key: &VerifyingKey,
) -> Result<()> {
    let TrustAnchor::MerkleTreeSha256(anchor) = &certificate.proof.trust_anchor;
    let ProofBody::MerkleTreeSha256(proof) = &certificate.proof.body;

    if anchor.issuer_id != *expected_issuer {
        return Err(VerificationError::IssuerMismatch {
            expected: expected_issuer.display_string(),
            found: anchor.issuer_id.display_string(),
        });
    }

    let batch_number = anchor.batch_number;
    let window = &signed_window.window;
    let expected_head = match window.head_for_batch(batch_number) {
        Some(head) => *head,
        None => {
            return Err(VerificationError::OutOfWindow {
                batch_number,
                oldest: window.oldest_batch(),
                newest: window.batch_number,
            })
        }
    };

    verify_validity_window(signed_window, expected_issuer, issuer_key)?;

    let path = proof.path.items();
    if path.len() > MAX_PATH_LEN {
        return Err(VerificationError::PathTooLong {
            got: path.len(),
            max: MAX_PATH_LEN,
        });
    }

    let assertion_head = HashHead::new(
        Distinguisher::AssertionInput,
        expected_issuer.clone(),
        batch_number,
    );
    let mut hash = HashAssertionInput {
        head: &assertion_head,
        index: proof.index,
        assertion: &certificate.assertion,
    }
    .hash();

    let node_head = HashHead::new(
        Distinguisher::NodeInput,
        expected_issuer.clone(),
        batch_number,
    );
    let mut remaining = proof.index;
    for (level, sibling) in path.iter().enumerate() {
        let (left, right) = if remaining & 1 == 1 {
            (sibling, &hash)
        } else {
            (&hash, sibling)
        };
        let parent = HashNodeInput {
            head: &node_head,
            index: remaining >> 1,
            level: (level + 1) as u8,
            left,
            right,
        }
        .hash();
        hash = parent;
        remaining >>= 1;
    }
    if remaining != 0 {
        return Err(VerificationError::IndexOutsidePath {
            index: proof.index,
            path_len: path.len(),
        });
    }

    if hash != expected_head {
        return Err(VerificationError::RootMismatch {
            expected: expected_head.to_hex(),
            computed: hash.to_hex(),
        });
    }

    Ok(())
}
