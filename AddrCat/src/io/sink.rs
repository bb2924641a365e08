//! Append-only little-endian writer with absolute patch-back

use crate::error::Result;
use byteorder::{LittleEndian, WriteBytesExt};
use std::io::{Cursor, Seek, SeekFrom, Write};

/// Growable output buffer.
///
/// Writes append at the end. [`ByteSink::overwrite_at`] patches bytes that
/// were previously reserved without moving the append position.
#[derive(Debug, Default)]
pub struct ByteSink {
    inner: Cursor<Vec<u8>>,
}

impl ByteSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Offset at which the next appended byte will land.
    #[must_use]
    pub fn position(&self) -> u32 {
        self.inner.position() as u32
    }

    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.inner.write_u8(value)?;
        Ok(())
    }

    pub fn write_i16(&mut self, value: i16) -> Result<()> {
        self.inner.write_i16::<LittleEndian>(value)?;
        Ok(())
    }

    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        self.inner.write_u32::<LittleEndian>(value)?;
        Ok(())
    }

    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        self.inner.write_i32::<LittleEndian>(value)?;
        Ok(())
    }

    pub fn write_i64(&mut self, value: i64) -> Result<()> {
        self.inner.write_i64::<LittleEndian>(value)?;
        Ok(())
    }

    pub fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.inner.write_all(data)?;
        Ok(())
    }

    /// Append `count` zero bytes to be patched later.
    pub fn reserve(&mut self, count: usize) -> Result<()> {
        const BLOCK_SIZE: usize = 512;
        let zeros = [0u8; BLOCK_SIZE];

        let mut remaining = count;
        while remaining > 0 {
            let chunk = remaining.min(BLOCK_SIZE);
            self.inner.write_all(&zeros[..chunk])?;
            remaining -= chunk;
        }
        Ok(())
    }

    /// Overwrite bytes at an absolute offset, then return to the append position.
    pub fn overwrite_at(&mut self, offset: u32, data: &[u8]) -> Result<()> {
        let end = self.inner.position();
        self.inner.seek(SeekFrom::Start(u64::from(offset)))?;
        self.inner.write_all(data)?;
        let patched_end = self.inner.position();
        self.inner.seek(SeekFrom::Start(end.max(patched_end)))?;
        Ok(())
    }

    /// Borrow the bytes written so far.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.inner.get_ref()
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.inner.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_tracks_appends() {
        let mut sink = ByteSink::new();
        assert_eq!(sink.position(), 0);
        sink.write_u32(0x0de38942).unwrap();
        sink.write_i16(-2).unwrap();
        sink.write_u8(7).unwrap();
        assert_eq!(sink.position(), 7);
        assert_eq!(sink.as_bytes(), &[0x42, 0x89, 0xe3, 0x0d, 0xfe, 0xff, 7]);
    }

    #[test]
    fn test_reserve_then_patch() {
        let mut sink = ByteSink::new();
        sink.reserve(1030).unwrap();
        assert_eq!(sink.position(), 1030);
        assert!(sink.as_bytes().iter().all(|&b| b == 0));

        sink.write_u8(0xAA).unwrap();
        sink.overwrite_at(4, &[1, 2, 3, 4]).unwrap();
        assert_eq!(sink.position(), 1031);

        sink.write_u8(0xBB).unwrap();
        let bytes = sink.into_bytes();
        assert_eq!(&bytes[4..8], &[1, 2, 3, 4]);
        assert_eq!(bytes[1030], 0xAA);
        assert_eq!(bytes[1031], 0xBB);
    }
}
