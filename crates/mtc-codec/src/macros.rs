//! Declaration macros for the wire shapes
//!
//! The TLS presentation language describes values as vectors with byte-length
//! bounds, fixed arrays, enumerations and records. These macros turn one
//! declaration into a newtype (or record) with the matching [`Codec`]
//! implementation, so the declared bounds and field order are the single
//! source of truth.
//!
//! [`Codec`]: crate::Codec

use crate::error::ValidationError;

/// No-op hook used by the vector macros when no extra validation is declared.
#[doc(hidden)]
pub fn no_extra_validation<T>(_items: &[T]) -> Result<(), ValidationError> {
    Ok(())
}

/// Declares an opaque byte vector with byte-length bounds and a computed
/// length-prefix marker.
///
/// ```ignore
/// opaque_vector! {
///     /// Issuer identifier, up to 32 bytes.
///     pub struct IssuerId, min = 0, max = 32;
/// }
/// ```
///
/// An optional `extra = path::to::fn` names a `fn(&[u8]) -> Result<(),
/// ValidationError>` run by `validate` after the length bounds.
#[macro_export]
macro_rules! opaque_vector {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident, min = $min:expr, max = $max:expr;
    ) => {
        $crate::opaque_vector! {
            $(#[$meta])*
            $vis struct $name, min = $min, max = $max, extra = $crate::no_extra_validation;
        }
    };
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident, min = $min:expr, max = $max:expr, extra = $extra:path;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        $vis struct $name(::std::vec::Vec<u8>);

        impl $name {
            pub const MIN_LENGTH: u64 = $min;
            pub const MAX_LENGTH: u64 = $max;
            pub const MARKER_WIDTH: usize = $crate::marker_width($max);

            /// Creates a value, checking the declared invariants.
            pub fn new(
                bytes: impl ::std::convert::Into<::std::vec::Vec<u8>>,
            ) -> ::std::result::Result<Self, $crate::ValidationError> {
                let value = Self(bytes.into());
                $crate::Codec::validate(&value)?;
                ::std::result::Result::Ok(value)
            }

            /// Creates a value without checking invariants.
            pub fn new_unchecked(bytes: impl ::std::convert::Into<::std::vec::Vec<u8>>) -> Self {
                Self(bytes.into())
            }

            pub fn as_bytes(&self) -> &[u8] {
                &self.0
            }

            pub fn into_bytes(self) -> ::std::vec::Vec<u8> {
                self.0
            }

            pub fn len(&self) -> usize {
                self.0.len()
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl ::std::convert::AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl $crate::Codec for $name {
            fn encoded_len(&self) -> usize {
                Self::MARKER_WIDTH + self.0.len()
            }

            fn encode(&self, out: &mut ::std::vec::Vec<u8>) {
                $crate::write_length_marker(out, self.0.len(), Self::MARKER_WIDTH);
                out.extend_from_slice(&self.0);
            }

            fn decode(
                reader: &mut $crate::ByteReader<'_>,
            ) -> ::std::result::Result<Self, $crate::ParsingError> {
                let length = $crate::read_bounded_marker(
                    reader,
                    Self::MARKER_WIDTH,
                    Self::MIN_LENGTH,
                    Self::MAX_LENGTH,
                    stringify!($name),
                )?;
                let bytes = reader.read_exact(length as usize, stringify!($name))?;
                ::std::result::Result::Ok(Self(bytes.to_vec()))
            }

            fn skip(
                reader: &mut $crate::ByteReader<'_>,
            ) -> ::std::result::Result<(), $crate::ParsingError> {
                let length = $crate::read_bounded_marker(
                    reader,
                    Self::MARKER_WIDTH,
                    Self::MIN_LENGTH,
                    Self::MAX_LENGTH,
                    stringify!($name),
                )?;
                reader.advance(length as usize, stringify!($name))
            }

            fn validate(&self) -> ::std::result::Result<(), $crate::ValidationError> {
                $crate::check_length_bounds(
                    stringify!($name),
                    self.0.len() as u64,
                    Self::MIN_LENGTH,
                    Self::MAX_LENGTH,
                )?;
                $extra(&self.0)
            }
        }
    };
}

/// Declares a vector of codec values with *byte-length* bounds (the marker
/// counts payload bytes, not elements) and a computed length-prefix marker.
///
/// An optional `extra = path::to::fn` names a `fn(&[T]) -> Result<(),
/// ValidationError>` run by `validate` after the per-element checks.
#[macro_export]
macro_rules! codec_vector {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident($elem:ty), min = $min:expr, max = $max:expr;
    ) => {
        $crate::codec_vector! {
            $(#[$meta])*
            $vis struct $name($elem), min = $min, max = $max, extra = $crate::no_extra_validation;
        }
    };
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident($elem:ty), min = $min:expr, max = $max:expr, extra = $extra:path;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        $vis struct $name(::std::vec::Vec<$elem>);

        impl $name {
            pub const MIN_LENGTH: u64 = $min;
            pub const MAX_LENGTH: u64 = $max;
            pub const MARKER_WIDTH: usize = $crate::marker_width($max);

            /// Creates a vector, checking the declared invariants.
            pub fn new(
                items: ::std::vec::Vec<$elem>,
            ) -> ::std::result::Result<Self, $crate::ValidationError> {
                let value = Self(items);
                $crate::Codec::validate(&value)?;
                ::std::result::Result::Ok(value)
            }

            /// Creates a vector without checking invariants.
            pub fn new_unchecked(items: ::std::vec::Vec<$elem>) -> Self {
                Self(items)
            }

            pub fn items(&self) -> &[$elem] {
                &self.0
            }

            pub fn into_items(self) -> ::std::vec::Vec<$elem> {
                self.0
            }

            pub fn len(&self) -> usize {
                self.0.len()
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            /// Total encoded length of the elements, excluding the marker.
            pub fn payload_len(&self) -> usize {
                self.0
                    .iter()
                    .map(|item| $crate::Codec::encoded_len(item))
                    .sum()
            }
        }

        impl $crate::Codec for $name {
            fn encoded_len(&self) -> usize {
                Self::MARKER_WIDTH + self.payload_len()
            }

            fn encode(&self, out: &mut ::std::vec::Vec<u8>) {
                $crate::write_length_marker(out, self.payload_len(), Self::MARKER_WIDTH);
                for item in &self.0 {
                    $crate::Codec::encode(item, out);
                }
            }

            fn decode(
                reader: &mut $crate::ByteReader<'_>,
            ) -> ::std::result::Result<Self, $crate::ParsingError> {
                let length = $crate::read_bounded_marker(
                    reader,
                    Self::MARKER_WIDTH,
                    Self::MIN_LENGTH,
                    Self::MAX_LENGTH,
                    stringify!($name),
                )?;
                let end = reader.position() + length as usize;
                let mut items = ::std::vec::Vec::new();
                while reader.position() < end {
                    items.push(<$elem as $crate::Codec>::decode(reader)?);
                }
                if reader.position() != end {
                    return ::std::result::Result::Err($crate::ParsingError::PayloadOverrun {
                        offset: reader.position(),
                        context: stringify!($name),
                    });
                }
                ::std::result::Result::Ok(Self(items))
            }

            fn skip(
                reader: &mut $crate::ByteReader<'_>,
            ) -> ::std::result::Result<(), $crate::ParsingError> {
                let length = $crate::read_bounded_marker(
                    reader,
                    Self::MARKER_WIDTH,
                    Self::MIN_LENGTH,
                    Self::MAX_LENGTH,
                    stringify!($name),
                )?;
                reader.advance(length as usize, stringify!($name))
            }

            fn validate(&self) -> ::std::result::Result<(), $crate::ValidationError> {
                $crate::check_length_bounds(
                    stringify!($name),
                    self.payload_len() as u64,
                    Self::MIN_LENGTH,
                    Self::MAX_LENGTH,
                )?;
                for item in &self.0 {
                    $crate::Codec::validate(item)?;
                }
                $extra(&self.0)
            }
        }
    };
}

/// Declares a fixed-length byte array with no length marker.
#[macro_export]
macro_rules! byte_array {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident([u8; $len:expr]);
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis struct $name([u8; $len]);

        impl $name {
            pub const LENGTH: usize = $len;

            pub const fn new(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }

            pub fn try_from_slice(
                bytes: &[u8],
            ) -> ::std::result::Result<Self, $crate::ValidationError> {
                if bytes.len() != $len {
                    return ::std::result::Result::Err($crate::ValidationError::invalid(
                        stringify!($name),
                        ::std::format!("expected {} bytes, got {}", $len, bytes.len()),
                    ));
                }
                let mut out = [0u8; $len];
                out.copy_from_slice(bytes);
                ::std::result::Result::Ok(Self(out))
            }

            pub const fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }

            pub const fn into_bytes(self) -> [u8; $len] {
                self.0
            }
        }

        impl ::std::convert::From<[u8; $len]> for $name {
            fn from(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }
        }

        impl ::std::convert::AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl $crate::Codec for $name {
            fn encoded_len(&self) -> usize {
                $len
            }

            fn encode(&self, out: &mut ::std::vec::Vec<u8>) {
                out.extend_from_slice(&self.0);
            }

            fn decode(
                reader: &mut $crate::ByteReader<'_>,
            ) -> ::std::result::Result<Self, $crate::ParsingError> {
                ::std::result::Result::Ok(Self(reader.read_array::<$len>(stringify!($name))?))
            }

            fn skip(
                reader: &mut $crate::ByteReader<'_>,
            ) -> ::std::result::Result<(), $crate::ParsingError> {
                reader.advance($len, stringify!($name))
            }

            fn validate(&self) -> ::std::result::Result<(), $crate::ValidationError> {
                ::std::result::Result::Ok(())
            }
        }
    };
}

/// Declares an enumeration over a fixed integer set with a fixed serialized
/// width. Decoding a value outside the set is a [`ParsingError::UnknownTag`].
///
/// [`ParsingError::UnknownTag`]: crate::ParsingError::UnknownTag
#[macro_export]
macro_rules! codec_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $repr:ty {
            $( $(#[$vmeta:meta])* $variant:ident = $value:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            pub const WIDTH: usize = ::std::mem::size_of::<$repr>();

            /// The wire value of this member.
            pub const fn to_raw(self) -> $repr {
                match self {
                    $( Self::$variant => $value ),+
                }
            }

            /// Looks up a wire value in the declared set.
            pub fn from_raw(raw: $repr) -> ::std::option::Option<Self> {
                $(
                    if raw == $value {
                        return ::std::option::Option::Some(Self::$variant);
                    }
                )+
                ::std::option::Option::None
            }
        }

        impl $crate::Codec for $name {
            fn encoded_len(&self) -> usize {
                Self::WIDTH
            }

            fn encode(&self, out: &mut ::std::vec::Vec<u8>) {
                $crate::Codec::encode(&self.to_raw(), out);
            }

            fn decode(
                reader: &mut $crate::ByteReader<'_>,
            ) -> ::std::result::Result<Self, $crate::ParsingError> {
                let offset = reader.position();
                let raw = <$repr as $crate::Codec>::decode(reader)?;
                Self::from_raw(raw).ok_or($crate::ParsingError::UnknownTag {
                    offset,
                    tag: raw as u64,
                    context: stringify!($name),
                })
            }

            fn skip(
                reader: &mut $crate::ByteReader<'_>,
            ) -> ::std::result::Result<(), $crate::ParsingError> {
                reader.advance(Self::WIDTH, stringify!($name))
            }

            fn validate(&self) -> ::std::result::Result<(), $crate::ValidationError> {
                ::std::result::Result::Ok(())
            }
        }
    };
}

/// Declares a record whose fields serialize in declaration order with no
/// struct-level marker.
#[macro_export]
macro_rules! codec_struct {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $( $(#[$fmeta:meta])* $fvis:vis $field:ident : $ftype:ty ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        $vis struct $name {
            $( $(#[$fmeta])* $fvis $field : $ftype ),+
        }

        impl $crate::Codec for $name {
            fn encoded_len(&self) -> usize {
                0 $( + $crate::Codec::encoded_len(&self.$field) )+
            }

            fn encode(&self, out: &mut ::std::vec::Vec<u8>) {
                $( $crate::Codec::encode(&self.$field, out); )+
            }

            fn decode(
                reader: &mut $crate::ByteReader<'_>,
            ) -> ::std::result::Result<Self, $crate::ParsingError> {
                ::std::result::Result::Ok(Self {
                    $( $field: <$ftype as $crate::Codec>::decode(reader)?, )+
                })
            }

            fn skip(
                reader: &mut $crate::ByteReader<'_>,
            ) -> ::std::result::Result<(), $crate::ParsingError> {
                $( <$ftype as $crate::Codec>::skip(reader)?; )+
                ::std::result::Result::Ok(())
            }

            fn validate(&self) -> ::std::result::Result<(), $crate::ValidationError> {
                $( $crate::Codec::validate(&self.$field)?; )+
                ::std::result::Result::Ok(())
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::{ByteReader, Codec, ParsingError, ValidationError};
    use proptest::prelude::*;

    opaque_vector! {
        /// Test opaque vector with a one-byte marker.
        struct ShortBytes, min = 0, max = 255;
    }

    opaque_vector! {
        struct BoundedBytes, min = 2, max = 300;
    }

    codec_vector! {
        struct WordList(u16), min = 0, max = 65535;
    }

    byte_array! {
        struct FourBytes([u8; 4]);
    }

    codec_enum! {
        enum Color: u16 {
            Red = 0,
            Green = 1,
            Blue = 4,
        }
    }

    codec_struct! {
        struct Record {
            color: Color,
            id: u32,
            payload: ShortBytes,
        }
    }

    #[test]
    fn opaque_vector_round_trip() {
        let value = ShortBytes::new(b"hello".as_slice()).unwrap();
        let bytes = value.to_bytes();
        assert_eq!(bytes, [5, b'h', b'e', b'l', b'l', b'o']);
        let (parsed, consumed) = ShortBytes::parse(&bytes).unwrap();
        assert_eq!(parsed, value);
        assert_eq!(consumed, bytes.len());
    }

    #[test]
    fn opaque_vector_marker_widths() {
        assert_eq!(ShortBytes::MARKER_WIDTH, 1);
        assert_eq!(BoundedBytes::MARKER_WIDTH, 2);
        assert_eq!(WordList::MARKER_WIDTH, 2);
    }

    #[test]
    fn opaque_vector_rejects_out_of_range_marker() {
        // marker says 1 byte but the declared minimum is 2
        let err = BoundedBytes::parse(&[0, 1, 0xaa]).unwrap_err();
        assert!(matches!(err, ParsingError::LengthOutOfRange { length: 1, .. }));
    }

    #[test]
    fn opaque_vector_validation_bounds() {
        assert!(BoundedBytes::new(vec![1]).is_err());
        let unchecked = BoundedBytes::new_unchecked(vec![1]);
        assert!(matches!(
            unchecked.validate(),
            Err(ValidationError::LengthOutOfBounds { length: 1, .. })
        ));
    }

    #[test]
    fn codec_vector_counts_bytes_not_elements() {
        let value = WordList::new(vec![1u16, 2, 3]).unwrap();
        assert_eq!(value.payload_len(), 6);
        let bytes = value.to_bytes();
        assert_eq!(bytes[..2], [0, 6]);
        let (parsed, _) = WordList::parse(&bytes).unwrap();
        assert_eq!(parsed.items(), &[1, 2, 3]);
    }

    #[test]
    fn codec_vector_rejects_overrun() {
        // marker promises 3 bytes; u16 elements consume 2 then 2 more
        let err = WordList::parse(&[0, 3, 0, 1, 0, 2]).unwrap_err();
        assert!(matches!(err, ParsingError::PayloadOverrun { .. }));
    }

    #[test]
    fn byte_array_is_markerless() {
        let value = FourBytes::new([1, 2, 3, 4]);
        assert_eq!(value.to_bytes(), [1, 2, 3, 4]);
        assert!(FourBytes::parse(&[1, 2, 3]).is_err());
        assert!(FourBytes::try_from_slice(&[1, 2, 3]).is_err());
    }

    #[test]
    fn enum_round_trip_and_unknown_tag() {
        assert_eq!(Color::Blue.to_bytes(), [0, 4]);
        let (parsed, _) = Color::parse(&[0, 1]).unwrap();
        assert_eq!(parsed, Color::Green);
        let err = Color::parse(&[0, 2]).unwrap_err();
        assert_eq!(
            err,
            ParsingError::UnknownTag {
                offset: 0,
                tag: 2,
                context: "Color"
            }
        );
    }

    #[test]
    fn struct_fields_concatenate_in_order() {
        let record = Record {
            color: Color::Green,
            id: 7,
            payload: ShortBytes::new(b"ab".as_slice()).unwrap(),
        };
        let bytes = record.to_bytes();
        assert_eq!(bytes, [0, 1, 0, 0, 0, 7, 2, b'a', b'b']);
        let parsed = Record::parse_exact(&bytes).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn struct_skip_matches_parse() {
        let record = Record {
            color: Color::Red,
            id: 1,
            payload: ShortBytes::new(vec![9; 10]).unwrap(),
        };
        let mut bytes = record.to_bytes();
        bytes.extend_from_slice(&[0xde, 0xad]);
        let (_, consumed) = Record::parse(&bytes).unwrap();
        let mut reader = ByteReader::new(&bytes);
        Record::skip(&mut reader).unwrap();
        assert_eq!(reader.position(), consumed);
    }

    proptest! {
        #[test]
        fn opaque_round_trip(payload in proptest::collection::vec(any::<u8>(), 0..255)) {
            let value = ShortBytes::new(payload).unwrap();
            let bytes = value.to_bytes();
            let parsed = ShortBytes::parse_exact(&bytes).unwrap();
            prop_assert_eq!(parsed, value);
        }

        #[test]
        fn vector_skip_matches_parse(items in proptest::collection::vec(any::<u16>(), 0..64)) {
            let value = WordList::new(items).unwrap();
            let bytes = value.to_bytes();
            let (_, consumed) = WordList::parse(&bytes).unwrap();
            let mut reader = ByteReader::new(&bytes);
            WordList::skip(&mut reader).unwrap();
            prop_assert_eq!(reader.position(), consumed);
        }
    }
}
