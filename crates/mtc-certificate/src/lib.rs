//! Certificates, inclusion proofs and signed validity windows
//!
//! This crate packages assertions from a built batch tree into compact
//! certificates, rotates and signs the validity window linking successive
//! batches, and verifies certificates by recomputing the Merkle root from
//! the assertion and its inclusion path.

mod certificate;
mod error;
mod proof;
mod window;

pub use certificate::{
    create_bikeshed_certificate, verify_certificate, BikeshedCertificate, MAX_PATH_LEN,
};
pub use error::{Result, VerificationError};
pub use proof::{
    MerkleTreeProofSha256, MerkleTreeTrustAnchor, Proof, ProofBody, ProofType, Sha256Vector,
    TrustAnchor,
};
pub use window::{
    create_signed_validity_window, verify_validity_window, LabeledValidityWindow, Signature,
    SignedValidityWindow, TreeHeads, ValidityWindow, ValidityWindowLabel,
    DEFAULT_VALIDITY_WINDOW_SIZE, VALIDITY_WINDOW_LABEL,
};
