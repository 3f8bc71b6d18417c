//! Assertions and the batch vector

use std::net::{Ipv4Addr, Ipv6Addr};

use mtc_codec::{codec_struct, codec_vector, ValidationError};

use crate::claim::{Claim, ClaimList, SubjectInfo, SubjectType};
use crate::dns::{sort_dns_names, DnsName, DnsNameList};
use crate::ip::{Ipv4Address, Ipv4AddressList, Ipv6Address, Ipv6AddressList};

codec_struct! {
    /// One committed statement: a subject bound to a list of claims
    pub struct Assertion {
        pub subject_type: SubjectType,
        pub subject_info: SubjectInfo,
        pub claims: ClaimList,
    }
}

codec_vector! {
    /// The ordered assertions of one batch; position defines the leaf index
    pub struct Assertions(Assertion), min = 0, max = 4294967295;
}

/// Builds an [`Assertion`] from unordered inputs, sorting every claim list
/// into its canonical wire order.
///
/// ```
/// use mtc_types::AssertionBuilder;
///
/// let assertion = AssertionBuilder::tls(b"subject public key".as_slice())
///     .dns_name("www.example.com")
///     .dns_name("example.com")
///     .ipv4_addr("192.168.1.1".parse().unwrap())
///     .build()
///     .unwrap();
/// assert_eq!(assertion.claims.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct AssertionBuilder {
    subject_info: Vec<u8>,
    dns_names: Vec<String>,
    dns_wildcards: Vec<String>,
    ipv4_addrs: Vec<Ipv4Addr>,
    ipv6_addrs: Vec<Ipv6Addr>,
}

impl AssertionBuilder {
    /// Starts an assertion for a TLS subject.
    pub fn tls(subject_info: impl Into<Vec<u8>>) -> Self {
        Self {
            subject_info: subject_info.into(),
            ..Self::default()
        }
    }

    pub fn dns_name(mut self, name: impl Into<String>) -> Self {
        self.dns_names.push(name.into());
        self
    }

    pub fn dns_wildcard(mut self, name: impl Into<String>) -> Self {
        self.dns_wildcards.push(name.into());
        self
    }

    pub fn ipv4_addr(mut self, addr: Ipv4Addr) -> Self {
        self.ipv4_addrs.push(addr);
        self
    }

    pub fn ipv6_addr(mut self, addr: Ipv6Addr) -> Self {
        self.ipv6_addrs.push(addr);
        self
    }

    /// Assembles and validates the assertion.
    pub fn build(self) -> Result<Assertion, ValidationError> {
        let assertion = self.assemble();
        mtc_codec::Codec::validate(&assertion)?;
        Ok(assertion)
    }

    /// Assembles the assertion without validating, for bulk issuance.
    pub fn build_unchecked(self) -> Assertion {
        self.assemble()
    }

    fn assemble(self) -> Assertion {
        let mut claims = Vec::new();

        let mut dns_names = self.dns_names;
        sort_dns_names(&mut dns_names);
        if !dns_names.is_empty() {
            claims.push(Claim::Dns(dns_list(&dns_names)));
        }

        let mut dns_wildcards = self.dns_wildcards;
        sort_dns_names(&mut dns_wildcards);
        if !dns_wildcards.is_empty() {
            claims.push(Claim::DnsWildcard(dns_list(&dns_wildcards)));
        }

        let mut ipv4_addrs = self.ipv4_addrs;
        ipv4_addrs.sort();
        if !ipv4_addrs.is_empty() {
            claims.push(Claim::Ipv4(Ipv4AddressList::new_unchecked(
                ipv4_addrs.into_iter().map(Ipv4Address::from).collect(),
            )));
        }

        let mut ipv6_addrs = self.ipv6_addrs;
        ipv6_addrs.sort();
        if !ipv6_addrs.is_empty() {
            claims.push(Claim::Ipv6(Ipv6AddressList::new_unchecked(
                ipv6_addrs.into_iter().map(Ipv6Address::from).collect(),
            )));
        }

        Assertion {
            subject_type: SubjectType::Tls,
            subject_info: SubjectInfo::new_unchecked(self.subject_info),
            claims: ClaimList::new_unchecked(claims),
        }
    }
}

fn dns_list(names: &[String]) -> DnsNameList {
    DnsNameList::new_unchecked(
        names
            .iter()
            .map(|name| DnsName::new_unchecked(name.as_bytes()))
            .collect(),
    )
}
