//! DNS name types and canonical ordering

use mtc_codec::{codec_vector, opaque_vector, ValidationError};

opaque_vector! {
    /// A DNS name: 1 to 255 bytes of letters, digits, hyphens and dots
    pub struct DnsName, min = 1, max = 255, extra = dns_charset;
}

fn dns_charset(bytes: &[u8]) -> Result<(), ValidationError> {
    if bytes
        .iter()
        .all(|&b| b.is_ascii_alphanumeric() || b == b'-' || b == b'.')
    {
        Ok(())
    } else {
        Err(ValidationError::invalid(
            "DnsName",
            format!("invalid DNS name {}", String::from_utf8_lossy(bytes)),
        ))
    }
}

codec_vector! {
    /// A list of DNS names, sorted starting from the TLD
    pub struct DnsNameList(DnsName), min = 1, max = 65535, extra = dns_names_sorted;
}

/// Sort key for DNS names: labels reversed (TLD first), compared
/// case-insensitively.
fn dns_sort_key(name: &[u8]) -> Vec<Vec<u8>> {
    name.rsplit(|&b| b == b'.')
        .map(|label| label.to_ascii_lowercase())
        .collect()
}

fn dns_names_sorted(names: &[DnsName]) -> Result<(), ValidationError> {
    let sorted = names
        .windows(2)
        .all(|pair| dns_sort_key(pair[0].as_bytes()) <= dns_sort_key(pair[1].as_bytes()));
    if sorted {
        Ok(())
    } else {
        Err(ValidationError::invalid(
            "DnsNameList",
            "DNS names must be sorted starting from the TLD",
        ))
    }
}

/// Sorts DNS names into the canonical wire order: lexicographic over labels
/// reversed, so `example.com` sorts before `sub.example.com`.
pub fn sort_dns_names(names: &mut [String]) {
    names.sort_by(|a, b| dns_sort_key(a.as_bytes()).cmp(&dns_sort_key(b.as_bytes())));
}
