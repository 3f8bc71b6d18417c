//! Validity windows: the sliding sequence of trusted tree heads
//!
//! A relying party trusts a certificate iff its batch's root appears in the
//! currently-signed window. Each issuance appends the new root, drops the
//! oldest once the window is at capacity, and signs the labeled window with
//! the issuer's Ed25519 key.

use mtc_codec::{
    codec_struct, marker_width, opaque_vector, ByteReader, Codec, ParsingError, ValidationError,
};
use mtc_crypto::{SigningKey, VerifyingKey};
use mtc_merkle::MerkleTree;
use mtc_types::{IssuerId, Sha256Hash};

use crate::error::{Result, VerificationError};

/// The fixed 32-byte context label prefixed to every signed window.
pub const VALIDITY_WINDOW_LABEL: &[u8; 32] = b"Merkle Tree Crts ValidityWindow\0";

/// Heads retained by default: 14 days of hourly batches plus the current one.
///
/// Not wire-encoded; issuance runs must agree on it as issuer policy.
pub const DEFAULT_VALIDITY_WINDOW_SIZE: usize = 337;

/// The retained tree heads, oldest first.
///
/// Serialized as a length-prefixed vector whose payload must be a positive
/// multiple of 32 bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TreeHeads(Vec<Sha256Hash>);

impl TreeHeads {
    pub const MIN_LENGTH: u64 = 32;
    pub const MAX_LENGTH: u64 = (1 << 24) - 1;
    pub const MARKER_WIDTH: usize = marker_width(Self::MAX_LENGTH);

    /// Creates the head list, checking the declared invariants.
    pub fn new(heads: Vec<Sha256Hash>) -> std::result::Result<Self, ValidationError> {
        let value = Self(heads);
        value.validate()?;
        Ok(value)
    }

    /// Creates the head list without checking invariants.
    pub fn new_unchecked(heads: Vec<Sha256Hash>) -> Self {
        Self(heads)
    }

    pub fn heads(&self) -> &[Sha256Hash] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The most recently appended head.
    pub fn newest(&self) -> Option<&Sha256Hash> {
        self.0.last()
    }

    fn payload_len(&self) -> usize {
        self.0.len() * Sha256Hash::LENGTH
    }
}

impl Codec for TreeHeads {
    fn encoded_len(&self) -> usize {
        Self::MARKER_WIDTH + self.payload_len()
    }

    fn encode(&self, out: &mut Vec<u8>) {
        mtc_codec::write_length_marker(out, self.payload_len(), Self::MARKER_WIDTH);
        for head in &self.0 {
            head.encode(out);
        }
    }

    fn decode(reader: &mut ByteReader<'_>) -> std::result::Result<Self, ParsingError> {
        let offset = reader.position();
        let length = mtc_codec::read_bounded_marker(
            reader,
            Self::MARKER_WIDTH,
            Self::MIN_LENGTH,
            Self::MAX_LENGTH,
            "TreeHeads",
        )?;
        if length % Sha256Hash::LENGTH as u64 != 0 {
            return Err(ParsingError::InvalidPayload {
                offset,
                reason: "length is not a multiple of 32",
                context: "TreeHeads",
            });
        }
        let count = length / Sha256Hash::LENGTH as u64;
        let heads = (0..count)
            .map(|_| Sha256Hash::decode(reader))
            .collect::<std::result::Result<_, _>>()?;
        Ok(Self(heads))
    }

    fn skip(reader: &mut ByteReader<'_>) -> std::result::Result<(), ParsingError> {
        let length = mtc_codec::read_bounded_marker(
            reader,
            Self::MARKER_WIDTH,
            Self::MIN_LENGTH,
            Self::MAX_LENGTH,
            "TreeHeads",
        )?;
        reader.advance(length as usize, "TreeHeads")
    }

    fn validate(&self) -> std::result::Result<(), ValidationError> {
        mtc_codec::check_length_bounds(
            "TreeHeads",
            self.payload_len() as u64,
            Self::MIN_LENGTH,
            Self::MAX_LENGTH,
        )
    }
}

codec_struct! {
    /// The window state: the newest batch and the heads that cover it
    ///
    /// The heads cover batches `batch_number - len + 1 ..= batch_number`,
    /// oldest first.
    pub struct ValidityWindow {
        pub batch_number: u32,
        pub tree_heads: TreeHeads,
    }
}

impl ValidityWindow {
    /// Number of batches this window covers.
    pub fn window_size(&self) -> usize {
        self.tree_heads.len()
    }

    /// The oldest batch still covered.
    pub fn oldest_batch(&self) -> u32 {
        let size = self.tree_heads.len() as u32;
        self.batch_number.saturating_sub(size.saturating_sub(1))
    }

    /// Whether the window covers `batch_number`.
    pub fn covers(&self, batch_number: u32) -> bool {
        batch_number <= self.batch_number
            && (self.batch_number - batch_number) < self.tree_heads.len() as u32
    }

    /// The head committed for `batch_number`, if covered.
    pub fn head_for_batch(&self, batch_number: u32) -> Option<&Sha256Hash> {
        if !self.covers(batch_number) {
            return None;
        }
        let back = (self.batch_number - batch_number) as usize;
        self.tree_heads.heads().get(self.tree_heads.len() - 1 - back)
    }
}

/// The fixed label that domain-separates window signatures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ValidityWindowLabel;

impl Codec for ValidityWindowLabel {
    fn encoded_len(&self) -> usize {
        VALIDITY_WINDOW_LABEL.len()
    }

    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(VALIDITY_WINDOW_LABEL);
    }

    fn decode(reader: &mut ByteReader<'_>) -> std::result::Result<Self, ParsingError> {
        let offset = reader.position();
        let bytes = reader.read_array::<32>("ValidityWindowLabel")?;
        if &bytes != VALIDITY_WINDOW_LABEL {
            return Err(ParsingError::InvalidPayload {
                offset,
                reason: "wrong validity window label",
                context: "ValidityWindowLabel",
            });
        }
        Ok(Self)
    }

    fn skip(reader: &mut ByteReader<'_>) -> std::result::Result<(), ParsingError> {
        reader.advance(VALIDITY_WINDOW_LABEL.len(), "ValidityWindowLabel")
    }

    fn validate(&self) -> std::result::Result<(), ValidationError> {
        Ok(())
    }
}

codec_struct! {
    /// The message the issuer signs: label, issuer and window
    pub struct LabeledValidityWindow {
        pub label: ValidityWindowLabel,
        pub issuer_id: IssuerId,
        pub window: ValidityWindow,
    }
}

opaque_vector! {
    /// An Ed25519 signature, exactly 64 bytes
    pub struct Signature, min = 64, max = 64;
}

impl From<[u8; 64]> for Signature {
    fn from(bytes: [u8; 64]) -> Self {
        Self::new_unchecked(bytes.to_vec())
    }
}

codec_struct! {
    /// A validity window together with the issuer's signature over it
    pub struct SignedValidityWindow {
        pub window: ValidityWindow,
        pub signature: Signature,
    }
}

fn window_signing_input(window: &ValidityWindow, issuer_id: &IssuerId) -> Vec<u8> {
    LabeledValidityWindow {
        label: ValidityWindowLabel,
        issuer_id: issuer_id.clone(),
        window: window.clone(),
    }
    .to_bytes()
}

/// Signs the validity window for a freshly built batch tree.
///
/// With no previous window the head list starts at `[root]` and grows on
/// each rotation until it reaches `window_size`. Rotation requires the new
/// batch number to directly follow the previous window's.
pub fn create_signed_validity_window(
    tree: &MerkleTree,
    signing_key: &SigningKey,
    previous: Option<&SignedValidityWindow>,
    window_size: usize,
) -> Result<SignedValidityWindow> {
    if window_size == 0 {
        return Err(VerificationError::ZeroWindowSize);
    }
    let batch_number = tree.batch_number();

    let mut heads = match previous {
        None => Vec::with_capacity(1),
        Some(previous) => {
            let previous_batch = previous.window.batch_number;
            if previous_batch.checked_add(1) != Some(batch_number) {
                return Err(VerificationError::NonContiguousBatch {
                    previous: previous_batch,
                    requested: batch_number,
                });
            }
            previous.window.tree_heads.heads().to_vec()
        }
    };

    while heads.len() >= window_size {
        heads.remove(0);
    }
    heads.push(tree.root());

    let window = ValidityWindow {
        batch_number,
        tree_heads: TreeHeads::new_unchecked(heads),
    };
    let signature = signing_key.sign(&window_signing_input(&window, tree.issuer_id()));

    Ok(SignedValidityWindow {
        window,
        signature: Signature::from(signature),
    })
}

/// Checks the issuer's signature over a validity window.
pub fn verify_validity_window(
    signed: &SignedValidityWindow,
    issuer_id: &IssuerId,
    issuer_key: &VerifyingKey,
) -> Result<()> {
    let message = window_signing_input(&signed.window, issuer_id);
    issuer_key.verify(&message, signed.signature.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mtc_types::{Assertion, AssertionBuilder};

    fn issuer() -> IssuerId {
        IssuerId::new(b"test.issuer".as_slice()).unwrap()
    }

    fn assertions() -> Vec<Assertion> {
        vec![AssertionBuilder::tls(b"info".as_slice())
            .dns_name("example.com")
            .build()
            .unwrap()]
    }

    fn tree(batch_number: u32) -> MerkleTree {
        MerkleTree::build(&assertions(), &issuer(), batch_number).unwrap()
    }

    #[test]
    fn tree_heads_marker_is_three_bytes() {
        assert_eq!(TreeHeads::MARKER_WIDTH, 3);
        let heads = TreeHeads::new(vec![Sha256Hash::new([1; 32])]).unwrap();
        let bytes = heads.to_bytes();
        assert_eq!(&bytes[..3], &[0, 0, 32]);
        assert_eq!(bytes.len(), 35);
    }

    #[test]
    fn tree_heads_reject_non_multiple_of_32() {
        let mut bytes = vec![0, 0, 33];
        bytes.extend_from_slice(&[0u8; 33]);
        let err = TreeHeads::parse(&bytes).unwrap_err();
        assert!(matches!(err, ParsingError::InvalidPayload { .. }));
    }

    #[test]
    fn tree_heads_reject_empty() {
        assert!(TreeHeads::new(Vec::new()).is_err());
        let err = TreeHeads::parse(&[0, 0, 0]).unwrap_err();
        assert!(matches!(err, ParsingError::LengthOutOfRange { .. }));
    }

    #[test]
    fn label_parse_is_strict() {
        let mut bytes = VALIDITY_WINDOW_LABEL.to_vec();
        assert!(ValidityWindowLabel::parse_exact(&bytes).is_ok());
        bytes[0] ^= 1;
        assert!(ValidityWindowLabel::parse_exact(&bytes).is_err());
    }

    #[test]
    fn window_coverage() {
        let window = ValidityWindow {
            batch_number: 10,
            tree_heads: TreeHeads::new_unchecked(vec![
                Sha256Hash::new([8; 32]),
                Sha256Hash::new([9; 32]),
                Sha256Hash::new([10; 32]),
            ]),
        };
        assert_eq!(window.oldest_batch(), 8);
        assert!(!window.covers(7));
        assert!(window.covers(8));
        assert!(window.covers(10));
        assert!(!window.covers(11));
        // heads are oldest first
        assert_eq!(window.head_for_batch(8), Some(&Sha256Hash::new([8; 32])));
        assert_eq!(window.head_for_batch(10), Some(&Sha256Hash::new([10; 32])));
        assert_eq!(window.head_for_batch(7), None);
    }

    #[test]
    fn genesis_window_holds_single_root() {
        let key = SigningKey::generate().unwrap();
        let tree = tree(0);
        let signed = create_signed_validity_window(&tree, &key, None, 3).unwrap();
        assert_eq!(signed.window.batch_number, 0);
        assert_eq!(signed.window.tree_heads.heads(), &[tree.root()]);
        assert!(verify_validity_window(&signed, &issuer(), &key.verifying_key()).is_ok());
    }

    #[test]
    fn rotation_appends_and_drops_oldest() {
        let key = SigningKey::generate().unwrap();
        let mut signed = create_signed_validity_window(&tree(0), &key, None, 3).unwrap();
        let mut roots = vec![tree(0).root()];
        for batch in 1..=3 {
            let tree = tree(batch);
            roots.push(tree.root());
            signed = create_signed_validity_window(&tree, &key, Some(&signed), 3).unwrap();
        }
        // after batch 3 with window 3: heads = [R1, R2, R3]
        assert_eq!(signed.window.batch_number, 3);
        assert_eq!(signed.window.tree_heads.heads(), &roots[1..=3]);
    }

    #[test]
    fn rotation_requires_contiguous_batches() {
        let key = SigningKey::generate().unwrap();
        let signed = create_signed_validity_window(&tree(0), &key, None, 3).unwrap();
        let err = create_signed_validity_window(&tree(2), &key, Some(&signed), 3).unwrap_err();
        assert!(matches!(
            err,
            VerificationError::NonContiguousBatch {
                previous: 0,
                requested: 2
            }
        ));
    }

    #[test]
    fn zero_window_size_is_rejected() {
        let key = SigningKey::generate().unwrap();
        assert!(matches!(
            create_signed_validity_window(&tree(0), &key, None, 0),
            Err(VerificationError::ZeroWindowSize)
        ));
    }

    #[test]
    fn signature_covers_issuer_id() {
        let key = SigningKey::generate().unwrap();
        let signed = create_signed_validity_window(&tree(0), &key, None, 3).unwrap();
        let other = IssuerId::new(b"other.issuer".as_slice()).unwrap();
        assert!(verify_validity_window(&signed, &other, &key.verifying_key()).is_err());
    }

    #[test]
    fn signed_window_round_trip() {
        let key = SigningKey::generate().unwrap();
        let signed = create_signed_validity_window(&tree(0), &key, None, 3).unwrap();
        let bytes = signed.to_bytes();
        let parsed = SignedValidityWindow::parse_exact(&bytes).unwrap();
        assert_eq!(parsed, signed);
        assert!(verify_validity_window(&parsed, &issuer(), &key.verifying_key()).is_ok());
    }
}
