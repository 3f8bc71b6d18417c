//! IP address types

use std::net::{Ipv4Addr, Ipv6Addr};

use mtc_codec::{byte_array, codec_vector, ValidationError};

byte_array! {
    /// IPv4 address, 4 bytes in network order
    pub struct Ipv4Address([u8; 4]);
}

byte_array! {
    /// IPv6 address, 16 bytes in network order
    pub struct Ipv6Address([u8; 16]);
}

impl From<Ipv4Addr> for Ipv4Address {
    fn from(addr: Ipv4Addr) -> Self {
        Self::new(addr.octets())
    }
}

impl From<Ipv4Address> for Ipv4Addr {
    fn from(addr: Ipv4Address) -> Self {
        Ipv4Addr::from(addr.into_bytes())
    }
}

impl From<Ipv6Addr> for Ipv6Address {
    fn from(addr: Ipv6Addr) -> Self {
        Self::new(addr.octets())
    }
}

impl From<Ipv6Address> for Ipv6Addr {
    fn from(addr: Ipv6Address) -> Self {
        Ipv6Addr::from(addr.into_bytes())
    }
}

impl std::fmt::Display for Ipv4Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Ipv4Addr::from(*self))
    }
}

impl std::fmt::Display for Ipv6Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Ipv6Addr::from(*self))
    }
}

codec_vector! {
    /// A list of IPv4 addresses in ascending order
    pub struct Ipv4AddressList(Ipv4Address), min = 4, max = 65535, extra = ipv4_sorted;
}

codec_vector! {
    /// A list of IPv6 addresses in ascending order
    pub struct Ipv6AddressList(Ipv6Address), min = 16, max = 65535, extra = ipv6_sorted;
}

fn addresses_sorted<T: AsRef<[u8]>>(
    context: &'static str,
    addrs: &[T],
) -> Result<(), ValidationError> {
    let sorted = addrs
        .windows(2)
        .all(|pair| pair[0].as_ref() <= pair[1].as_ref());
    if sorted {
        Ok(())
    } else {
        Err(ValidationError::invalid(
            context,
            "addresses must be in ascending order",
        ))
    }
}

fn ipv4_sorted(addrs: &[Ipv4Address]) -> Result<(), ValidationError> {
    addresses_sorted("Ipv4AddressList", addrs)
}

fn ipv6_sorted(addrs: &[Ipv6Address]) -> Result<(), ValidationError> {
    addresses_sorted("Ipv6AddressList", addrs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mtc_codec::Codec;

    #[test]
    fn ipv4_packs_network_order() {
        let addr = Ipv4Address::from("192.168.1.1".parse::<Ipv4Addr>().unwrap());
        assert_eq!(addr.to_bytes(), [192, 168, 1, 1]);
        assert_eq!(addr.to_string(), "192.168.1.1");
    }

    #[test]
    fn ipv6_round_trip() {
        let addr = Ipv6Address::from("2001:db8::1".parse::<Ipv6Addr>().unwrap());
        let bytes = addr.to_bytes();
        assert_eq!(bytes.len(), 16);
        let parsed = Ipv6Address::parse_exact(&bytes).unwrap();
        assert_eq!(parsed, addr);
    }

    #[test]
    fn list_requires_ascending_order() {
        let one = Ipv4Address::new([10, 0, 0, 1]);
        let two = Ipv4Address::new([10, 0, 0, 2]);
        assert!(Ipv4AddressList::new(vec![one, two]).is_ok());
        assert!(Ipv4AddressList::new(vec![two, one]).is_err());
    }

    #[test]
    fn list_minimum_is_one_address() {
        assert!(Ipv4AddressList::new(Vec::new()).is_err());
        assert!(Ipv6AddressList::new(Vec::new()).is_err());
    }
}
