//! Binary writer producing little-endian byte buffers.

use std::io::Write;

use zerocopy::{Immutable, IntoBytes};

use crate::Result;

/// Appends raw bytes and zerocopy structs to an owned buffer.
///
/// # Example
///
/// ```
/// use texarray_common::BinaryWriter;
///
/// let mut writer = BinaryWriter::with_capacity(8);
/// writer.write_bytes(b"DDS ");
/// writer.write_struct(&124u32);
///
/// assert_eq!(writer.into_inner(), [b'D', b'D', b'S', b' ', 0x7C, 0, 0, 0]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct BinaryWriter {
    data: Vec<u8>,
}

impl BinaryWriter {
    /// Create an empty writer.
    pub const fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Create an empty writer with room for `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Number of bytes written so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if nothing has been written.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Append raw bytes.
    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Append a struct using zerocopy.
    ///
    /// The struct's in-memory layout is written as-is, so it must be
    /// `#[repr(C, packed)]` with little-endian fields to match on-disk formats.
    #[inline]
    pub fn write_struct<T: IntoBytes + Immutable>(&mut self, value: &T) {
        self.data.extend_from_slice(value.as_bytes());
    }

    /// Reserve a zeroed region of `count` bytes and return it for filling.
    pub fn reserve_zeroed(&mut self, count: usize) -> &mut [u8] {
        let start = self.data.len();
        self.data.resize(start + count, 0);
        &mut self.data[start..]
    }

    /// Consume the writer and return the buffer.
    #[inline]
    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }

    /// Copy the written bytes into a sink.
    pub fn write_into<W: Write>(&self, out: &mut W) -> Result<()> {
        out.write_all(&self.data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_struct_matches_reader() {
        let mut writer = BinaryWriter::new();
        writer.write_struct(&[0x0102u16, 0x0304]);
        writer.write_struct(&0xDEADBEEFu32);

        let data = writer.into_inner();
        let mut reader = crate::BinaryReader::new(&data);
        let pair: [u16; 2] = reader.read_struct().unwrap();
        assert_eq!(pair, [0x0102, 0x0304]);
        assert_eq!(reader.read_struct::<u32>().unwrap(), 0xDEADBEEF);
    }

    #[test]
    fn test_reserve_zeroed() {
        let mut writer = BinaryWriter::new();
        writer.write_bytes(&[1, 2]);
        let region = writer.reserve_zeroed(3);
        region[2] = 9;

        assert_eq!(writer.into_inner(), vec![1, 2, 0, 0, 9]);
    }

    #[test]
    fn test_write_into_sink() {
        let mut writer = BinaryWriter::new();
        writer.write_struct(&7u32);

        let mut sink = Vec::new();
        writer.write_into(&mut sink).unwrap();
        assert_eq!(sink, vec![7, 0, 0, 0]);
        assert_eq!(writer.len(), 4);
        assert!(!writer.is_empty());
    }
}
