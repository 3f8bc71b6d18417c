//! Positioned cursor over a byte slice

use crate::error::ParsingError;

/// Cursor over a byte slice providing structured reads with offset-carrying
/// errors.
///
/// All decoding goes through a `ByteReader`; the offset it reports on failure
/// is the position at which the failing read started.
#[derive(Debug, Clone, Copy)]
pub struct ByteReader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    /// Creates a new cursor at the start of the slice.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    /// Returns the current offset within the slice.
    pub fn position(&self) -> usize {
        self.offset
    }

    /// Returns the number of bytes remaining.
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    /// Reads exactly `len` bytes.
    pub fn read_exact(&mut self, len: usize, context: &'static str) -> Result<&'a [u8], ParsingError> {
        if len > self.remaining() {
            return Err(ParsingError::UnexpectedEnd {
                offset: self.offset,
                needed: len - self.remaining(),
                context,
            });
        }
        let start = self.offset;
        self.offset += len;
        Ok(&self.bytes[start..start + len])
    }

    /// Reads a fixed-size byte array.
    pub fn read_array<const N: usize>(&mut self, context: &'static str) -> Result<[u8; N], ParsingError> {
        let bytes = self.read_exact(N, context)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    /// Advances past `len` bytes without returning them.
    pub fn advance(&mut self, len: usize, context: &'static str) -> Result<(), ParsingError> {
        self.read_exact(len, context).map(|_| ())
    }
}

impl<'a> From<&'a [u8]> for ByteReader<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        ByteReader::new(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_exact_advances() {
        let mut reader = ByteReader::new(&[1, 2, 3, 4]);
        assert_eq!(reader.read_exact(2, "test").unwrap(), &[1, 2]);
        assert_eq!(reader.position(), 2);
        assert_eq!(reader.remaining(), 2);
    }

    #[test]
    fn read_past_end_reports_offset() {
        let mut reader = ByteReader::new(&[1, 2]);
        reader.advance(1, "test").unwrap();
        let err = reader.read_exact(4, "test").unwrap_err();
        assert_eq!(
            err,
            ParsingError::UnexpectedEnd {
                offset: 1,
                needed: 3,
                context: "test"
            }
        );
        // a failed read does not move the cursor
        assert_eq!(reader.position(), 1);
    }

    #[test]
    fn read_array_fixed_size() {
        let mut reader = ByteReader::new(&[9, 8, 7]);
        let arr: [u8; 2] = reader.read_array("test").unwrap();
        assert_eq!(arr, [9, 8]);
    }
}
