//! Subjects and claims

use mtc_codec::{
    codec_enum, codec_vector, opaque_vector, ByteReader, Codec, ParsingError, ValidationError,
};

use crate::dns::DnsNameList;
use crate::ip::{Ipv4AddressList, Ipv6AddressList};

codec_enum! {
    /// The kind of subject an assertion speaks about
    pub enum SubjectType: u16 {
        Tls = 0,
    }
}

codec_enum! {
    /// The kind of statement a claim makes about its subject
    pub enum ClaimType: u16 {
        Dns = 0,
        DnsWildcard = 1,
        Ipv4 = 2,
        Ipv6 = 3,
    }
}

opaque_vector! {
    /// Opaque subject material, typically the subject's public key
    pub struct SubjectInfo, min = 0, max = 65535;
}

/// A typed claim about the subject.
///
/// On the wire this is the [`ClaimType`] tag followed by the list it selects.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Claim {
    Dns(DnsNameList),
    DnsWildcard(DnsNameList),
    Ipv4(Ipv4AddressList),
    Ipv6(Ipv6AddressList),
}

impl Claim {
    pub fn claim_type(&self) -> ClaimType {
        match self {
            Claim::Dns(_) => ClaimType::Dns,
            Claim::DnsWildcard(_) => ClaimType::DnsWildcard,
            Claim::Ipv4(_) => ClaimType::Ipv4,
            Claim::Ipv6(_) => ClaimType::Ipv6,
        }
    }
}

impl Codec for Claim {
    fn encoded_len(&self) -> usize {
        ClaimType::WIDTH
            + match self {
                Claim::Dns(list) | Claim::DnsWildcard(list) => list.encoded_len(),
                Claim::Ipv4(list) => list.encoded_len(),
                Claim::Ipv6(list) => list.encoded_len(),
            }
    }

    fn encode(&self, out: &mut Vec<u8>) {
        self.claim_type().encode(out);
        match self {
            Claim::Dns(list) | Claim::DnsWildcard(list) => list.encode(out),
            Claim::Ipv4(list) => list.encode(out),
            Claim::Ipv6(list) => list.encode(out),
        }
    }

    fn decode(reader: &mut ByteReader<'_>) -> Result<Self, ParsingError> {
        let claim_type = ClaimType::decode(reader)?;
        Ok(match claim_type {
            ClaimType::Dns => Claim::Dns(DnsNameList::decode(reader)?),
            ClaimType::DnsWildcard => Claim::DnsWildcard(DnsNameList::decode(reader)?),
            ClaimType::Ipv4 => Claim::Ipv4(Ipv4AddressList::decode(reader)?),
            ClaimType::Ipv6 => Claim::Ipv6(Ipv6AddressList::decode(reader)?),
        })
    }

    fn skip(reader: &mut ByteReader<'_>) -> Result<(), ParsingError> {
        let claim_type = ClaimType::decode(reader)?;
        match claim_type {
            ClaimType::Dns | ClaimType::DnsWildcard => DnsNameList::skip(reader),
            ClaimType::Ipv4 => Ipv4AddressList::skip(reader),
            ClaimType::Ipv6 => Ipv6AddressList::skip(reader),
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Claim::Dns(list) | Claim::DnsWildcard(list) => list.validate(),
            Claim::Ipv4(list) => list.validate(),
            Claim::Ipv6(list) => list.validate(),
        }
    }
}

codec_vector! {
    /// The claims of one assertion, at most one per claim type
    pub struct ClaimList(Claim), min = 0, max = 65535, extra = claim_types_unique;
}

fn claim_types_unique(claims: &[Claim]) -> Result<(), ValidationError> {
    for (i, claim) in claims.iter().enumerate() {
        if claims[..i]
            .iter()
            .any(|earlier| earlier.claim_type() == claim.claim_type())
        {
            return Err(ValidationError::invalid(
                "ClaimList",
                format!("duplicate claim type {:?}", claim.claim_type()),
            ));
        }
    }
    Ok(())
}
