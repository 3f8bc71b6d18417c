//! The `Codec` trait and its integer implementations

use crate::error::{ParsingError, ValidationError};
use crate::reader::ByteReader;

/// A value with a canonical TLS-presentation-language byte representation.
///
/// Serialization is deterministic and independent of ambient state. `decode`
/// performs the structural checks that are inherent to parsing (truncation,
/// length-marker ranges, unknown tags); `validate` performs the semantic
/// checks (charsets, ordering, uniqueness) and can be skipped by callers that
/// construct values through an `_unchecked` path.
pub trait Codec: Sized {
    /// Exact number of bytes `encode` will produce.
    fn encoded_len(&self) -> usize;

    /// Appends the serialization to `out`.
    fn encode(&self, out: &mut Vec<u8>);

    /// Reads one value from the cursor, consuming exactly its bytes.
    fn decode(reader: &mut ByteReader<'_>) -> Result<Self, ParsingError>;

    /// Checks all semantic invariants, recursing into children.
    fn validate(&self) -> Result<(), ValidationError>;

    /// Advances past one value without materializing it.
    ///
    /// Must land on the same offset `decode` would. The default decodes and
    /// discards; implementations override it where a length marker or fixed
    /// width makes skipping cheap.
    fn skip(reader: &mut ByteReader<'_>) -> Result<(), ParsingError> {
        Self::decode(reader).map(|_| ())
    }

    /// Serializes to a fresh byte vector.
    fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.encode(&mut out);
        out
    }

    /// Parses one value from the front of `bytes`, returning it together
    /// with the number of bytes consumed.
    ///
    /// On failure nothing is returned and the caller's input is untouched.
    fn parse(bytes: &[u8]) -> Result<(Self, usize), ParsingError> {
        let mut reader = ByteReader::new(bytes);
        let value = Self::decode(&mut reader)?;
        Ok((value, reader.position()))
    }

    /// Parses a value that must span the entire input.
    fn parse_exact(bytes: &[u8]) -> Result<Self, ParsingError> {
        let (value, consumed) = Self::parse(bytes)?;
        if consumed != bytes.len() {
            return Err(ParsingError::TrailingBytes {
                offset: consumed,
                remaining: bytes.len() - consumed,
            });
        }
        Ok(value)
    }
}

/// Width in bytes of the length marker for a vector with the given
/// `max_length`: the smallest big-endian unsigned integer that can hold it.
pub const fn marker_width(max_length: u64) -> usize {
    let bits = (u64::BITS - max_length.leading_zeros()) as usize;
    let width = (bits + 7) / 8;
    if width == 0 {
        1
    } else {
        width
    }
}

/// Writes a big-endian length marker of the given width.
pub fn write_length_marker(out: &mut Vec<u8>, len: usize, width: usize) {
    debug_assert!(width >= 8 || (len as u64) < 1u64 << (8 * width));
    let bytes = (len as u64).to_be_bytes();
    out.extend_from_slice(&bytes[8 - width..]);
}

/// Reads a length marker and checks it against the vector's declared bounds
/// and the remaining input.
pub fn read_bounded_marker(
    reader: &mut ByteReader<'_>,
    width: usize,
    min: u64,
    max: u64,
    context: &'static str,
) -> Result<u64, ParsingError> {
    let offset = reader.position();
    let bytes = reader.read_exact(width, context)?;
    let mut length = 0u64;
    for &b in bytes {
        length = length << 8 | u64::from(b);
    }
    if length < min || length > max {
        return Err(ParsingError::LengthOutOfRange {
            offset,
            length,
            min,
            max,
            context,
        });
    }
    if length > reader.remaining() as u64 {
        return Err(ParsingError::LengthExceedsInput {
            offset,
            length,
            remaining: reader.remaining(),
            context,
        });
    }
    Ok(length)
}

/// Checks a payload length against declared bounds, for `validate` impls.
pub fn check_length_bounds(
    context: &'static str,
    length: u64,
    min: u64,
    max: u64,
) -> Result<(), ValidationError> {
    if length < min || length > max {
        return Err(ValidationError::LengthOutOfBounds {
            context,
            length,
            min,
            max,
        });
    }
    Ok(())
}

macro_rules! int_codec {
    ($ty:ty, $width:expr, $context:literal) => {
        impl Codec for $ty {
            fn encoded_len(&self) -> usize {
                $width
            }

            fn encode(&self, out: &mut Vec<u8>) {
                out.extend_from_slice(&self.to_be_bytes());
            }

            fn decode(reader: &mut ByteReader<'_>) -> Result<Self, ParsingError> {
                Ok(<$ty>::from_be_bytes(reader.read_array::<$width>($context)?))
            }

            fn skip(reader: &mut ByteReader<'_>) -> Result<(), ParsingError> {
                reader.advance($width, $context)
            }

            fn validate(&self) -> Result<(), ValidationError> {
                Ok(())
            }
        }
    };
}

int_codec!(u8, 1, "u8");
int_codec!(u16, 2, "u16");
int_codec!(u32, 4, "u32");
int_codec!(u64, 8, "u64");
