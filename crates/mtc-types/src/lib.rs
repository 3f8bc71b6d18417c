//! Wire types for Merkle Tree Certificates
//!
//! This crate defines the assertion model — subjects, claims, and the batch
//! vector — together with the fixed-size hash and issuer identifier types
//! shared across the workspace. All types serialize through
//! [`mtc_codec::Codec`].

mod assertion;
mod claim;
mod dns;
mod hash;
mod ip;

pub use assertion::{Assertion, AssertionBuilder, Assertions};
pub use claim::{Claim, ClaimList, ClaimType, SubjectInfo, SubjectType};
pub use dns::{sort_dns_names, DnsName, DnsNameList};
pub use hash::{IssuerId, Sha256Hash};
pub use ip::{Ipv4Address, Ipv4AddressList, Ipv6Address, Ipv6AddressList};
