//! Merkle Tree Certificates
//!
//! A certification-authority-side implementation of the Merkle Tree
//! Certificate scheme: batches of subject assertions are committed with a
//! domain-separated Merkle tree, a sliding window of recent tree heads is
//! signed with Ed25519, and per-assertion certificates carry inclusion paths
//! that relying parties check against the signed window.
//!
//! The heavy lifting lives in the member crates, re-exported here:
//!
//! - [`mtc_codec`] — the TLS-presentation-language codec kernel
//! - [`mtc_types`] — the assertion model
//! - [`mtc_merkle`] — the per-batch tree builder
//! - [`mtc_crypto`] — Ed25519 signing and key files
//! - [`mtc_certificate`] — proofs, certificates and validity windows
//!
//! This crate adds the glue: JSON batch input, the issuance pipeline, and
//! the on-disk publication layout.
//!
//! # Example
//!
//! ```
//! use mtc::{issue_batch, verify_certificate, AssertionBuilder, IssuerId, SigningKey};
//!
//! let issuer = IssuerId::new(b"my.issuer".as_slice()).unwrap();
//! let key = SigningKey::generate().unwrap();
//! let assertion = AssertionBuilder::tls(b"subject key".as_slice())
//!     .dns_name("example.com")
//!     .build()
//!     .unwrap();
//!
//! let batch = issue_batch(&[assertion.clone()], &issuer, 0, &key, None, 14).unwrap();
//! let certificate = batch.certificate(&assertion, 0).unwrap();
//! verify_certificate(
//!     &certificate,
//!     batch.signed_window(),
//!     &issuer,
//!     &key.verifying_key(),
//! )
//! .unwrap();
//! ```

mod batch;
mod error;
mod input;
mod publish;

pub use batch::{issue_batch, IssuedBatch};
pub use error::{Error, Result};
pub use input::{parse_batch_input, AssertionInput, ClaimInput};
pub use publish::{load_certificate, save_certificate, PublicationDir};

pub use mtc_certificate::{
    create_bikeshed_certificate, create_signed_validity_window, verify_certificate,
    verify_validity_window, BikeshedCertificate, LabeledValidityWindow, MerkleTreeProofSha256,
    MerkleTreeTrustAnchor, Proof, ProofBody, ProofType, Sha256Vector, Signature,
    SignedValidityWindow, TreeHeads, TrustAnchor, ValidityWindow, VerificationError,
    DEFAULT_VALIDITY_WINDOW_SIZE,
};
pub use mtc_codec::{Codec, ParsingError, ValidationError};
pub use mtc_crypto::{
    signing_key_from_pem, signing_key_to_pem, verifying_key_from_pem, verifying_key_to_pem,
    SigningKey, VerifyingKey,
};
pub use mtc_merkle::MerkleTree;
pub use mtc_types::{
    Assertion, AssertionBuilder, Assertions, Claim, ClaimList, ClaimType, DnsName, IssuerId,
    Sha256Hash, SubjectInfo, SubjectType,
};
