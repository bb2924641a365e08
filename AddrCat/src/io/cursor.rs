//! Random-access little-endian reader over an in-memory buffer

use crate::error::{Error, Result};
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Cursor, Read};

/// A seekable cursor over a borrowed byte buffer.
///
/// Offsets are always absolute. Reading past the end of the buffer fails with
/// [`Error::Io`] (`UnexpectedEof`).
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    inner: Cursor<&'a [u8]>,
}

impl<'a> ByteCursor<'a> {
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            inner: Cursor::new(data),
        }
    }

    /// Current absolute position.
    #[must_use]
    pub fn position(&self) -> u64 {
        self.inner.position()
    }

    /// Seek to an absolute position.
    pub fn seek(&mut self, position: u64) {
        self.inner.set_position(position);
    }

    /// Total length of the underlying buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.get_ref().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.get_ref().is_empty()
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.inner.read_u8()?)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(self.inner.read_u16::<LittleEndian>()?)
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(self.inner.read_i16::<LittleEndian>()?)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(self.inner.read_u32::<LittleEndian>()?)
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(self.inner.read_i32::<LittleEndian>()?)
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(self.inner.read_u64::<LittleEndian>()?)
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(self.inner.read_i64::<LittleEndian>()?)
    }

    /// Read `count` raw bytes.
    pub fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>> {
        let remaining = self.len().saturating_sub(self.position() as usize);
        if count > remaining {
            return Err(Error::Io(std::io::ErrorKind::UnexpectedEof.into()));
        }
        let mut buffer = vec![0u8; count];
        self.inner.read_exact(&mut buffer)?;
        Ok(buffer)
    }

    /// Read a 4-byte signed length prefix followed by that many bytes.
    pub fn read_length_prefixed(&mut self) -> Result<Vec<u8>> {
        let offset = self.position();
        let len = self.read_i32()?;
        if len < 0 {
            return Err(Error::NegativeLength { offset, len });
        }
        self.read_bytes(len as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_little_endian() {
        let data = [0x42, 0x89, 0xe3, 0x0d, 0xff, 0xff, 0x01, 0x00];
        let mut cursor = ByteCursor::new(&data);
        assert_eq!(cursor.read_u32().unwrap(), 0x0de38942);
        assert_eq!(cursor.read_i16().unwrap(), -1);
        assert_eq!(cursor.read_u16().unwrap(), 1);
        assert_eq!(cursor.position(), 8);
    }

    #[test]
    fn test_seek_is_absolute() {
        let data = [1u8, 0, 0, 0, 2, 0, 0, 0];
        let mut cursor = ByteCursor::new(&data);
        cursor.seek(4);
        assert_eq!(cursor.read_u32().unwrap(), 2);
        cursor.seek(0);
        assert_eq!(cursor.read_u32().unwrap(), 1);
    }

    #[test]
    fn test_read_past_end_fails() {
        let data = [1u8, 2, 3];
        let mut cursor = ByteCursor::new(&data);
        assert!(matches!(cursor.read_u32(), Err(Error::Io(_))));

        cursor.seek(1);
        assert!(cursor.read_bytes(5).is_err());
        assert_eq!(cursor.read_bytes(2).unwrap(), vec![2, 3]);
    }

    #[test]
    fn test_negative_length_prefix() {
        let data = (-4i32).to_le_bytes();
        let mut cursor = ByteCursor::new(&data);
        assert!(matches!(
            cursor.read_length_prefixed(),
            Err(Error::NegativeLength { len: -4, .. })
        ));
    }
}
