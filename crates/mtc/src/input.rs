//! JSON batch input
//!
//! A batch document is a JSON array of assertion inputs:
//!
//! ```json
//! [
//!   {
//!     "subject_type": "tls",
//!     "subject_info": "aGVsbG8=",
//!     "claims": [
//!       { "type": "dns", "values": ["example.com", "www.example.com"] },
//!       { "type": "ipv4", "values": ["192.168.1.1"] }
//!     ]
//!   }
//! ]
//! ```
//!
//! `subject_info` accepts hex or standard base64; claim values are sorted
//! into canonical order during translation.

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Deserialize;

use mtc_types::{Assertion, AssertionBuilder};

use crate::error::{Error, Result};

/// One assertion of the batch input document.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssertionInput {
    pub subject_type: String,
    pub subject_info: String,
    #[serde(default)]
    pub claims: Vec<ClaimInput>,
}

/// One claim of an assertion input.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum ClaimInput {
    Dns { values: Vec<String> },
    DnsWildcard { values: Vec<String> },
    Ipv4 { values: Vec<String> },
    Ipv6 { values: Vec<String> },
}

impl AssertionInput {
    /// Translates the input into a validated core [`Assertion`].
    pub fn to_assertion(&self) -> Result<Assertion> {
        if self.subject_type != "tls" {
            return Err(Error::Input(format!(
                "unsupported subject type {:?}",
                self.subject_type
            )));
        }
        let subject_info = decode_hex_or_base64(&self.subject_info)?;

        let mut builder = AssertionBuilder::tls(subject_info);
        for claim in &self.claims {
            builder = match claim {
                ClaimInput::Dns { values } => values
                    .iter()
                    .fold(builder, |b, name| b.dns_name(name.clone())),
                ClaimInput::DnsWildcard { values } => values
                    .iter()
                    .fold(builder, |b, name| b.dns_wildcard(name.clone())),
                ClaimInput::Ipv4 { values } => {
                    let mut b = builder;
                    for value in values {
                        let addr = value.parse().map_err(|_| {
                            Error::Input(format!("invalid IPv4 address {value:?}"))
                        })?;
                        b = b.ipv4_addr(addr);
                    }
                    b
                }
                ClaimInput::Ipv6 { values } => {
                    let mut b = builder;
                    for value in values {
                        let addr = value.parse().map_err(|_| {
                            Error::Input(format!("invalid IPv6 address {value:?}"))
                        })?;
                        b = b.ipv6_addr(addr);
                    }
                    b
                }
            };
        }
        Ok(builder.build()?)
    }
}

/// Parses a batch document into core assertions, preserving input order.
pub fn parse_batch_input(json: &str) -> Result<Vec<Assertion>> {
    let inputs: Vec<AssertionInput> = serde_json::from_str(json)?;
    inputs.iter().map(AssertionInput::to_assertion).collect()
}

/// Decodes a string as hex when it looks like hex, otherwise as standard
/// base64.
fn decode_hex_or_base64(s: &str) -> Result<Vec<u8>> {
    if s.is_empty() {
        return Ok(Vec::new());
    }
    if s.len() % 2 == 0 && s.chars().all(|c| c.is_ascii_hexdigit()) {
        return hex::decode(s).map_err(|e| Error::Input(format!("invalid hex: {e}")));
    }
    STANDARD
        .decode(s)
        .map_err(|e| Error::Input(format!("invalid base64: {e}")))
}
