//! Trust anchors and inclusion proofs

use mtc_codec::{
    codec_enum, codec_struct, codec_vector, ByteReader, Codec, ParsingError, ValidationError,
};
use mtc_types::{IssuerId, Sha256Hash};

codec_enum! {
    /// The proof mechanism a trust anchor selects
    pub enum ProofType: u16 {
        MerkleTreeSha256 = 0,
    }
}

codec_struct! {
    /// Names the batch tree a Merkle proof is checked against
    pub struct MerkleTreeTrustAnchor {
        pub issuer_id: IssuerId,
        pub batch_number: u32,
    }
}

/// A trust anchor: the proof type tag followed by the body it selects.
///
/// Only `merkle_tree_sha256` is defined today; the dispatch below is the
/// single place a new proof type has to be added.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TrustAnchor {
    MerkleTreeSha256(MerkleTreeTrustAnchor),
}

impl TrustAnchor {
    pub fn proof_type(&self) -> ProofType {
        match self {
            TrustAnchor::MerkleTreeSha256(_) => ProofType::MerkleTreeSha256,
        }
    }
}

impl Codec for TrustAnchor {
    fn encoded_len(&self) -> usize {
        ProofType::WIDTH
            + match self {
                TrustAnchor::MerkleTreeSha256(anchor) => anchor.encoded_len(),
            }
    }

    fn encode(&self, out: &mut Vec<u8>) {
        self.proof_type().encode(out);
        match self {
            TrustAnchor::MerkleTreeSha256(anchor) => anchor.encode(out),
        }
    }

    fn decode(reader: &mut ByteReader<'_>) -> Result<Self, ParsingError> {
        let proof_type = ProofType::decode(reader)?;
        Ok(match proof_type {
            ProofType::MerkleTreeSha256 => {
                TrustAnchor::MerkleTreeSha256(MerkleTreeTrustAnchor::decode(reader)?)
            }
        })
    }

    fn skip(reader: &mut ByteReader<'_>) -> Result<(), ParsingError> {
        let proof_type = ProofType::decode(reader)?;
        match proof_type {
            ProofType::MerkleTreeSha256 => MerkleTreeTrustAnchor::skip(reader),
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        match self {
            TrustAnchor::MerkleTreeSha256(anchor) => anchor.validate(),
        }
    }
}

codec_vector! {
    /// An inclusion path: sibling hashes bottom-up, empty for a single leaf
    pub struct Sha256Vector(Sha256Hash), min = 0, max = 65535;
}

codec_struct! {
    /// A Merkle inclusion proof: the leaf index and its sibling path
    pub struct MerkleTreeProofSha256 {
        pub index: u64,
        pub path: Sha256Vector,
    }
}

/// The proof body, whose type is determined by the trust anchor's tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProofBody {
    MerkleTreeSha256(MerkleTreeProofSha256),
}

impl ProofBody {
    pub fn proof_type(&self) -> ProofType {
        match self {
            ProofBody::MerkleTreeSha256(_) => ProofType::MerkleTreeSha256,
        }
    }
}

/// A complete proof: the trust anchor followed by the body its tag selects.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Proof {
    pub trust_anchor: TrustAnchor,
    pub body: ProofBody,
}

impl Codec for Proof {
    fn encoded_len(&self) -> usize {
        self.trust_anchor.encoded_len()
            + match &self.body {
                ProofBody::MerkleTreeSha256(proof) => proof.encoded_len(),
            }
    }

    fn encode(&self, out: &mut Vec<u8>) {
        self.trust_anchor.encode(out);
        match &self.body {
            ProofBody::MerkleTreeSha256(proof) => proof.encode(out),
        }
    }

    fn decode(reader: &mut ByteReader<'_>) -> Result<Self, ParsingError> {
        let trust_anchor = TrustAnchor::decode(reader)?;
        let body = match trust_anchor.proof_type() {
            ProofType::MerkleTreeSha256 => {
                ProofBody::MerkleTreeSha256(MerkleTreeProofSha256::decode(reader)?)
            }
        };
        Ok(Self { trust_anchor, body })
    }

    fn skip(reader: &mut ByteReader<'_>) -> Result<(), ParsingError> {
        let trust_anchor = TrustAnchor::decode(reader)?;
        match trust_anchor.proof_type() {
            ProofType::MerkleTreeSha256 => MerkleTreeProofSha256::skip(reader),
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        self.trust_anchor.validate()?;
        match &self.body {
            ProofBody::MerkleTreeSha256(proof) => proof.validate()?,
        }
        if self.body.proof_type() != self.trust_anchor.proof_type() {
            return Err(ValidationError::invalid(
                "Proof",
                "body type does not match the trust anchor's proof type",
            ));
        }
        Ok(())
    }
}
