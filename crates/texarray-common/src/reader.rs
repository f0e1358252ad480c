//! Binary reader for zero-copy parsing of byte slices.
//!
//! This module provides [`BinaryReader`], a cursor-like type that reads
//! fixed-layout headers and payload spans from a byte slice without copying.

use zerocopy::FromBytes;

use crate::{Error, Result};

/// A binary reader over a borrowed byte slice.
///
/// All reads are bounds-checked and report how many bytes were missing
/// instead of panicking.
///
/// # Example
///
/// ```
/// use texarray_common::BinaryReader;
///
/// let data = [b'D', b'D', b'S', b' ', 0x7C, 0x00, 0x00, 0x00];
/// let mut reader = BinaryReader::new(&data);
///
/// reader.expect_magic(b"DDS ").unwrap();
/// let size: u32 = reader.read_struct().unwrap();
/// assert_eq!(size, 124);
/// assert_eq!(reader.remaining(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> BinaryReader<'a> {
    /// Create a new reader from a byte slice.
    #[inline]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Get the current position in the buffer.
    #[inline]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Get the number of bytes remaining to read.
    #[inline]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Peek at bytes without advancing the position.
    #[inline]
    pub fn peek_bytes(&self, count: usize) -> Result<&'a [u8]> {
        if self.remaining() < count {
            return Err(Error::UnexpectedEof {
                needed: count,
                available: self.remaining(),
            });
        }
        Ok(&self.data[self.position..self.position + count])
    }

    /// Read bytes and advance the position.
    #[inline]
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        let bytes = self.peek_bytes(count)?;
        self.position += count;
        Ok(bytes)
    }

    /// Read a struct using zerocopy.
    ///
    /// The struct must implement `FromBytes` from the zerocopy crate.
    #[inline]
    pub fn read_struct<T: FromBytes>(&mut self) -> Result<T> {
        let size = std::mem::size_of::<T>();
        let bytes = self.read_bytes(size)?;
        T::read_from_bytes(bytes).map_err(|_| Error::UnexpectedEof {
            needed: size,
            available: bytes.len(),
        })
    }

    /// Expect specific magic bytes.
    pub fn expect_magic(&mut self, expected: &[u8]) -> Result<()> {
        let actual = self.read_bytes(expected.len())?;
        if actual != expected {
            return Err(Error::InvalidMagic {
                expected: expected.to_vec(),
                actual: actual.to_vec(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_bytes() {
        let data = [0x01u8, 0x02, 0x03, 0x04, 0xFF];
        let mut reader = BinaryReader::new(&data);

        assert_eq!(reader.peek_bytes(2).unwrap(), &[0x01, 0x02]);
        assert_eq!(reader.position(), 0);
        assert_eq!(reader.read_bytes(4).unwrap(), &[0x01, 0x02, 0x03, 0x04]);
        assert_eq!(reader.position(), 4);
        assert_eq!(reader.remaining(), 1);
    }

    #[test]
    fn test_read_struct() {
        let data = [0x10u8, 0x00, 0x20, 0x00, 0xAA];
        let mut reader = BinaryReader::new(&data);

        let pair: [u16; 2] = reader.read_struct().unwrap();
        assert_eq!(pair, [0x10, 0x20]);
        assert_eq!(reader.read_bytes(1).unwrap(), &[0xAA]);
    }

    #[test]
    fn test_magic_mismatch() {
        let mut reader = BinaryReader::new(b"KTX 1");

        match reader.expect_magic(b"DDS ") {
            Err(Error::InvalidMagic { actual, .. }) => assert_eq!(actual, b"KTX "),
            other => panic!("expected InvalidMagic, got {other:?}"),
        }
    }

    #[test]
    fn test_eof_error() {
        let data = [0x01, 0x02];
        let mut reader = BinaryReader::new(&data);

        match reader.read_struct::<u32>() {
            Err(Error::UnexpectedEof { needed, available }) => {
                assert_eq!(needed, 4);
                assert_eq!(available, 2);
            }
            other => panic!("expected UnexpectedEof, got {other:?}"),
        }
        assert_eq!(reader.position(), 0);
    }
}
