//! End-to-end certificate scenarios
//!
//! Issues small batches, emits certificates, and exercises verification
//! against tampering, window rotation and cross-issuer checks.

use mtc::{
    issue_batch, verify_certificate, Assertion, AssertionBuilder, Codec, IssuerId, ProofBody,
    Sha256Hash, SigningKey, TrustAnchor, VerificationError,
};
use mtc_certificate::Sha256Vector;
use mtc_merkle::{Distinguisher, HashAssertionInput, HashHead, HashNodeInput, MerkleTree};

fn issuer() -> IssuerId {
    IssuerId::new(b"test.issuer".as_slice()).unwrap()
}

fn assertion(name: &str) -> Assertion {
    AssertionBuilder::tls(Vec::new())
        .dns_name(name)
        .build()
        .unwrap()
}

fn batch(count: usize) -> Vec<Assertion> {
    (0..count)
        .map(|i| assertion(&format!("host{i}.example.com")))
        .collect()
}

fn leaf_hash(assertions: &[Assertion], index: u64, batch_number: u32) -> Sha256Hash {
    let head = HashHead::new(Distinguisher::AssertionInput, issuer(), batch_number);
    HashAssertionInput {
        head: &head,
        index,
        assertion: &assertions[index as usize],
    }
    .hash()
}

#[test]
fn single_leaf_batch() {
    let key = SigningKey::generate().unwrap();
    let assertions = vec![assertion("example.com")];
    let batch = issue_batch(&assertions, &issuer(), 0, &key, None, 14).unwrap();

    // with one leaf the root is the leaf hash itself
    assert_eq!(batch.tree().root(), leaf_hash(&assertions, 0, 0));

    let certificate = batch.certificate(&assertions[0], 0).unwrap();
    let ProofBody::MerkleTreeSha256(proof) = &certificate.proof.body;
    assert!(proof.path.is_empty());

    verify_certificate(
        &certificate,
        batch.signed_window(),
        &issuer(),
        &key.verifying_key(),
    )
    .unwrap();
}

#[test]
fn two_leaf_batch() {
    let key = SigningKey::generate().unwrap();
    let assertions = batch(2);
    let issued = issue_batch(&assertions, &issuer(), 0, &key, None, 14).unwrap();

    let leaf0 = leaf_hash(&assertions, 0, 0);
    let leaf1 = leaf_hash(&assertions, 1, 0);
    let node_head = HashHead::new(Distinguisher::NodeInput, issuer(), 0);
    let expected_root = HashNodeInput {
        head: &node_head,
        index: 0,
        level: 1,
        left: &leaf0,
        right: &leaf1,
    }
    .hash();
    assert_eq!(issued.tree().root(), expected_root);

    let certificate = issued.certificate(&assertions[1], 1).unwrap();
    let ProofBody::MerkleTreeSha256(proof) = &certificate.proof.body;
    assert_eq!(proof.path.items(), &[leaf0]);

    verify_certificate(
        &certificate,
        issued.signed_window(),
        &issuer(),
        &key.verifying_key(),
    )
    .unwrap();

    // flipping the first path byte must flip the verdict
    let mut tampered = certificate.clone();
    let ProofBody::MerkleTreeSha256(proof) = &mut tampered.proof.body;
    let mut sibling = *proof.path.items()[0].as_bytes();
    sibling[0] ^= 1;
    proof.path = Sha256Vector::new_unchecked(vec![Sha256Hash::new(sibling)]);
    assert!(matches!(
        verify_certificate(
            &tampered,
            issued.signed_window(),
            &issuer(),
            &key.verifying_key(),
        ),
        Err(VerificationError::RootMismatch { .. })
    ));
}

#[test]
fn three_leaf_batch_is_padded_with_empty_subtrees() {
    let key = SigningKey::generate().unwrap();
    let assertions = batch(3);
    let issued = issue_batch(&assertions, &issuer(), 0, &key, None, 14).unwrap();
    let tree = issued.tree();

    // node (1, 1) hashes leaf 2 against the empty subtree at (0, 3)
    let node_head = HashHead::new(Distinguisher::NodeInput, issuer(), 0);
    let expected = HashNodeInput {
        head: &node_head,
        index: 1,
        level: 1,
        left: &leaf_hash(&assertions, 2, 0),
        right: &tree.empty_hash(0, 3),
    }
    .hash();
    assert_eq!(tree.node(1, 1), Some(&expected));

    let certificate = issued.certificate(&assertions[2], 2).unwrap();
    let ProofBody::MerkleTreeSha256(proof) = &certificate.proof.body;
    assert_eq!(
        proof.path.items(),
        &[tree.empty_hash(0, 3), *tree.node(1, 0).unwrap()]
    );

    verify_certificate(
        &certificate,
        issued.signed_window(),
        &issuer(),
        &key.verifying_key(),
    )
    .unwrap();
}

#[test]
fn every_index_of_a_batch_verifies() {
    let key = SigningKey::generate().unwrap();
    let assertions = batch(9);
    let issued = issue_batch(&assertions, &issuer(), 4, &key, None, 14).unwrap();
    // a fresh window's heads only reach back to its first batch
    assert_eq!(issued.signed_window().window.window_size(), 1);

    for (index, assertion) in assertions.iter().enumerate() {
        let certificate = issued.certificate(assertion, index as u64).unwrap();
        verify_certificate(
            &certificate,
            issued.signed_window(),
            &issuer(),
            &key.verifying_key(),
        )
        .unwrap_or_else(|e| panic!("index {index}: {e}"));
    }
}

#[test]
fn window_rotation_covers_recent_batches_only() {
    let key = SigningKey::generate().unwrap();
    let window_size = 3;

    let mut issued = Vec::new();
    let mut previous = None;
    for batch_number in 0..=3u32 {
        let assertions = batch(2 + batch_number as usize);
        let issued_batch = issue_batch(
            &assertions,
            &issuer(),
            batch_number,
            &key,
            previous.as_ref(),
            window_size,
        )
        .unwrap();
        previous = Some(issued_batch.signed_window().clone());
        issued.push((assertions, issued_batch));
    }

    let latest = &issued[3].1;
    let window = &latest.signed_window().window;
    assert_eq!(window.batch_number, 3);
    let expected_heads: Vec<Sha256Hash> =
        (1..=3).map(|b| issued[b].1.tree().root()).collect();
    assert_eq!(window.tree_heads.heads(), expected_heads.as_slice());

    // batch 0 fell out of the window
    let (assertions0, batch0) = &issued[0];
    let stale = batch0.certificate(&assertions0[0], 0).unwrap();
    assert!(matches!(
        verify_certificate(
            &stale,
            latest.signed_window(),
            &issuer(),
            &key.verifying_key(),
        ),
        Err(VerificationError::OutOfWindow {
            batch_number: 0,
            oldest: 1,
            newest: 3,
        })
    ));

    // batch 2 is still covered
    let (assertions2, batch2) = &issued[2];
    let covered = batch2.certificate(&assertions2[1], 1).unwrap();
    verify_certificate(
        &covered,
        latest.signed_window(),
        &issuer(),
        &key.verifying_key(),
    )
    .unwrap();
}

#[test]
fn tampered_signature_fails_before_merkle_work() {
    let key = SigningKey::generate().unwrap();
    let assertions = batch(2);
    let issued = issue_batch(&assertions, &issuer(), 0, &key, None, 14).unwrap();
    let certificate = issued.certificate(&assertions[0], 0).unwrap();

    for bit in 0..8 {
        let mut signed = issued.signed_window().clone();
        let mut bytes = signed.signature.as_bytes().to_vec();
        bytes[17] ^= 1 << bit;
        signed.signature = mtc_certificate::Signature::new_unchecked(bytes);

        assert!(matches!(
            verify_certificate(&certificate, &signed, &issuer(), &key.verifying_key()),
            Err(VerificationError::Signature(_))
        ));
    }
}

#[test]
fn cross_issuer_certificate_is_rejected() {
    let key = SigningKey::generate().unwrap();
    let issuer_a = IssuerId::new(b"A".as_slice()).unwrap();
    let issuer_b = IssuerId::new(b"B".as_slice()).unwrap();

    let assertions = batch(1);
    let issued = issue_batch(&assertions, &issuer_a, 0, &key, None, 14).unwrap();
    let certificate = issued.certificate(&assertions[0], 0).unwrap();

    assert!(matches!(
        verify_certificate(
            &certificate,
            issued.signed_window(),
            &issuer_b,
            &key.verifying_key(),
        ),
        Err(VerificationError::IssuerMismatch { .. })
    ));
}

#[test]
fn single_bit_tampering_is_detected_everywhere() {
    let key = SigningKey::generate().unwrap();
    let assertions = batch(3);
    let issued = issue_batch(&assertions, &issuer(), 5, &key, None, 14).unwrap();

    for index in 0..assertions.len() as u64 {
        let certificate = issued
            .certificate(&assertions[index as usize], index)
            .unwrap();

        // flip one bit in every sibling hash
        let ProofBody::MerkleTreeSha256(proof) = &certificate.proof.body;
        for position in 0..proof.path.len() {
            let mut tampered = certificate.clone();
            let ProofBody::MerkleTreeSha256(proof) = &mut tampered.proof.body;
            let mut path = proof.path.items().to_vec();
            let mut sibling = *path[position].as_bytes();
            sibling[31] ^= 0x80;
            path[position] = Sha256Hash::new(sibling);
            proof.path = Sha256Vector::new_unchecked(path);
            assert!(
                verify_certificate(
                    &tampered,
                    issued.signed_window(),
                    &issuer(),
                    &key.verifying_key(),
                )
                .is_err(),
                "index {index} sibling {position}"
            );
        }

        // change the assertion bytes
        let mut tampered = certificate.clone();
        tampered.assertion.subject_info =
            mtc::SubjectInfo::new(b"tampered".as_slice()).unwrap();
        assert!(verify_certificate(
            &tampered,
            issued.signed_window(),
            &issuer(),
            &key.verifying_key(),
        )
        .is_err());

        // change the claimed batch number
        let mut tampered = certificate.clone();
        let TrustAnchor::MerkleTreeSha256(anchor) = &mut tampered.proof.trust_anchor;
        anchor.batch_number = 4;
        assert!(verify_certificate(
            &tampered,
            issued.signed_window(),
            &issuer(),
            &key.verifying_key(),
        )
        .is_err());
    }
}

#[test]
fn certificate_bytes_round_trip_through_the_wire() {
    let key = SigningKey::generate().unwrap();
    let assertions = batch(4);
    let issued = issue_batch(&assertions, &issuer(), 0, &key, None, 14).unwrap();

    let certificate = issued.certificate(&assertions[3], 3).unwrap();
    let bytes = certificate.to_bytes();
    let parsed = mtc::BikeshedCertificate::parse_exact(&bytes).unwrap();
    assert_eq!(parsed, certificate);

    let window_bytes = issued.signed_window().to_bytes();
    let parsed_window = mtc::SignedValidityWindow::parse_exact(&window_bytes).unwrap();

    verify_certificate(&parsed, &parsed_window, &issuer(), &key.verifying_key()).unwrap();
}

#[test]
fn stale_tree_for_wrong_batch_number_fails() {
    // same assertions committed under a different batch number produce a
    // different root, so a certificate cannot be replayed across batches
    let key = SigningKey::generate().unwrap();
    let assertions = batch(2);
    let issued0 = issue_batch(&assertions, &issuer(), 0, &key, None, 14).unwrap();
    let issued1 = issue_batch(
        &assertions,
        &issuer(),
        1,
        &key,
        Some(issued0.signed_window()),
        14,
    )
    .unwrap();
    assert_ne!(issued0.tree().root(), issued1.tree().root());

    let replayed = issued0.certificate(&assertions[0], 0).unwrap();
    let mut forged = replayed.clone();
    let TrustAnchor::MerkleTreeSha256(anchor) = &mut forged.proof.trust_anchor;
    anchor.batch_number = 1;
    assert!(matches!(
        verify_certificate(
            &forged,
            issued1.signed_window(),
            &issuer(),
            &key.verifying_key(),
        ),
        Err(VerificationError::RootMismatch { .. })
    ));
}

#[test]
fn non_contiguous_rotation_is_rejected() {
    let key = SigningKey::generate().unwrap();
    let assertions = batch(1);
    let issued = issue_batch(&assertions, &issuer(), 0, &key, None, 14).unwrap();

    let err = issue_batch(
        &assertions,
        &issuer(),
        5,
        &key,
        Some(issued.signed_window()),
        14,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        mtc::Error::Verification(VerificationError::NonContiguousBatch {
            previous: 0,
            requested: 5,
        })
    ));

    // the direct successor is accepted and appends the new root
    let next = issue_batch(
        &assertions,
        &issuer(),
        1,
        &key,
        Some(issued.signed_window()),
        14,
    )
    .unwrap();
    assert_eq!(next.signed_window().window.window_size(), 2);
    assert_eq!(
        next.signed_window().window.tree_heads.newest(),
        Some(&next.tree().root())
    );
}

#[test]
fn empty_subtree_hash_matches_on_demand_computation() {
    let assertions = batch(5);
    let tree = MerkleTree::build(&assertions, &issuer(), 0).unwrap();
    let empty_head = HashHead::new(Distinguisher::EmptyInput, issuer(), 0);
    for (level, index) in [(0u8, 5u64), (0, 7), (1, 3), (2, 3)] {
        let expected = mtc_merkle::HashEmptyInput {
            head: &empty_head,
            index,
            level,
        }
        .hash();
        assert_eq!(tree.empty_hash(level, index), expected);
    }
}
