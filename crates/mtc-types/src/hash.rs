//! Fixed-size hash and issuer identifier types

use mtc_codec::{byte_array, opaque_vector, ValidationError};

byte_array! {
    /// SHA-256 digest (32 bytes)
    ///
    /// Fixed-size with compile-time length guarantees; serializes with no
    /// length marker.
    pub struct Sha256Hash([u8; 32]);
}

impl Sha256Hash {
    /// Renders the digest as lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.as_bytes())
    }

    /// Parses a digest from a 64-character hex string.
    pub fn from_hex(hex_str: &str) -> Result<Self, ValidationError> {
        let bytes = hex::decode(hex_str)
            .map_err(|e| ValidationError::invalid("Sha256Hash", format!("invalid hex: {e}")))?;
        Self::try_from_slice(&bytes)
    }
}

impl std::fmt::Display for Sha256Hash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

opaque_vector! {
    /// Issuer identifier, up to 32 opaque bytes
    ///
    /// Bound into every Merkle hash input as a domain-separation component.
    pub struct IssuerId, min = 0, max = 32;
}

impl IssuerId {
    /// Renders the identifier for error messages, replacing non-printable
    /// bytes.
    pub fn display_string(&self) -> String {
        self.as_bytes()
            .iter()
            .map(|&b| {
                if (33..=126).contains(&b) {
                    b as char
                } else {
                    '.'
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mtc_codec::Codec;

    #[test]
    fn sha256_hash_hex_round_trip() {
        let hex_str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
        let hash = Sha256Hash::from_hex(hex_str).unwrap();
        assert_eq!(hash.to_hex(), hex_str);
    }

    #[test]
    fn sha256_hash_has_no_marker() {
        let hash = Sha256Hash::new([7u8; 32]);
        assert_eq!(hash.to_bytes(), vec![7u8; 32]);
    }

    #[test]
    fn issuer_id_marker_is_one_byte() {
        assert_eq!(IssuerId::MARKER_WIDTH, 1);
        let issuer = IssuerId::new(b"test.issuer".as_slice()).unwrap();
        let bytes = issuer.to_bytes();
        assert_eq!(bytes[0], 11);
        assert_eq!(&bytes[1..], b"test.issuer");
    }

    #[test]
    fn issuer_id_rejects_over_32_bytes() {
        assert!(IssuerId::new(vec![0u8; 33]).is_err());
        assert!(IssuerId::new(vec![0u8; 32]).is_ok());
        assert!(IssuerId::new(Vec::new()).is_ok());
    }
}
