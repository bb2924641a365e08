//! Offset-graph writer context
//!
//! Owns the output sink and the content cache for a single binary encode.
//! Every self-contained byte run goes through [`CatalogBinaryWriter::write_with_cache`],
//! so identical runs share one offset.
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

use super::cache::WriteCache;
use super::sink::ByteSink;
use super::strings::{DYNAMIC_FLAG, NULL_OFFSET, WIDE_FLAG, encode, is_narrow, plan_dynamic_split};
use crate::error::Result;

/// Writer for offset-addressed catalog buffers.
#[derive(Debug, Default)]
pub struct CatalogBinaryWriter {
    sink: ByteSink,
    cache: WriteCache,
}

impl CatalogBinaryWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Offset of the next appended byte.
    #[must_use]
    pub fn position(&self) -> u32 {
        self.sink.position()
    }

    pub fn sink(&mut self) -> &mut ByteSink {
        &mut self.sink
    }

    #[must_use]
    pub fn cache(&self) -> &WriteCache {
        &self.cache
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.sink.into_bytes()
    }

    /// Append `data` unless an identical run was already written; return its offset.
    pub fn write_with_cache(&mut self, data: &[u8]) -> Result<u32> {
        let key = WriteCache::content_key(data);
        if let Some(offset) = self.cache.lookup_data(key) {
            return Ok(offset);
        }

        let offset = self.sink.position();
        self.sink.write_bytes(data)?;
        self.cache.record_data(key, offset);
        Ok(offset)
    }

    /// Write a length-prefixed string; returns the offset of its first byte.
    fn write_basic_string(&mut self, value: &str, wide: bool) -> Result<u32> {
        if let Some(offset) = self.cache.lookup_string(value, wide) {
            return Ok(offset);
        }

        let encoded = encode(value, wide);
        let mut bytes = Vec::with_capacity(encoded.len() + 4);
        bytes.extend_from_slice(&(encoded.len() as i32).to_le_bytes());
        bytes.extend_from_slice(&encoded);

        let offset = self.write_with_cache(&bytes)? + 4;
        self.cache.record_string(value, wide, offset);
        Ok(offset)
    }

    /// Write a dynamic-string chain. The flag tells whether a chain was
    /// actually built or the string fell back to plain storage.
    fn write_dynamic_string(&mut self, value: &str, wide: bool, separator: char) -> Result<(u32, bool)> {
        let Some(groups) = plan_dynamic_split(value, separator, wide) else {
            return Ok((self.write_basic_string(value, wide)?, false));
        };

        let mut part_offsets = Vec::with_capacity(groups.len());
        for group in &groups {
            part_offsets.push(self.write_basic_string(group, wide)?);
        }

        // link from the start of the string so the head ends up at its end
        let mut next = NULL_OFFSET;
        for &part in part_offsets.iter().rev() {
            let mut node = [0u8; 8];
            node[..4].copy_from_slice(&part.to_le_bytes());
            node[4..].copy_from_slice(&next.to_le_bytes());
            next = self.write_with_cache(&node)?;
        }

        Ok((next, true))
    }

    /// Write a string and return its flagged reference (or the null reference).
    pub fn write_encoded_string(&mut self, value: Option<&str>, separator: Option<char>) -> Result<u32> {
        let Some(value) = value else {
            return Ok(NULL_OFFSET);
        };

        let wide = !value.is_empty() && !is_narrow(value);

        let mut result = match separator {
            Some(sep) if value.contains(sep) => {
                let (offset, chained) = self.write_dynamic_string(value, wide, sep)?;
                if chained { offset | DYNAMIC_FLAG } else { offset }
            }
            _ => self.write_basic_string(value, wide)?,
        };

        if wide {
            result |= WIDE_FLAG;
        }
        Ok(result)
    }

    /// Write an offset array; returns the offset of its first element.
    pub fn write_offset_array(&mut self, offsets: &[u32]) -> Result<u32> {
        let bytes = offset_array_bytes(offsets);
        Ok(self.write_with_cache(&bytes)? + 4)
    }

    /// Overwrite a previously reserved offset array whose length prefix sits
    /// at `length_offset`; returns the offset of its first element.
    pub fn overwrite_offset_array(&mut self, length_offset: u32, offsets: &[u32]) -> Result<u32> {
        let bytes = offset_array_bytes(offsets);
        self.sink.overwrite_at(length_offset, &bytes)?;
        Ok(length_offset + 4)
    }
}

fn offset_array_bytes(offsets: &[u32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(offsets.len() * 4 + 4);
    bytes.extend_from_slice(&((offsets.len() * 4) as i32).to_le_bytes());
    for offset in offsets {
        bytes.extend_from_slice(&offset.to_le_bytes());
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::CatalogBinaryReader;

    #[test]
    fn test_identical_runs_share_offsets() {
        let mut writer = CatalogBinaryWriter::new();
        let a = writer.write_with_cache(&[1, 2, 3, 4]).unwrap();
        let b = writer.write_with_cache(&[5, 6, 7, 8]).unwrap();
        let c = writer.write_with_cache(&[1, 2, 3, 4]).unwrap();
        assert_eq!(a, 0);
        assert_eq!(b, 4);
        assert_eq!(c, a);
        assert_eq!(writer.position(), 8);
    }

    #[test]
    fn test_null_and_plain_strings() {
        let mut writer = CatalogBinaryWriter::new();
        assert_eq!(writer.write_encoded_string(None, None).unwrap(), NULL_OFFSET);

        let offset = writer.write_encoded_string(Some("hello"), None).unwrap();
        assert_eq!(offset, 4);
        assert_eq!(writer.write_encoded_string(Some("hello"), None).unwrap(), offset);
        assert_eq!(writer.into_bytes(), b"\x05\x00\x00\x00hello");
    }

    #[test]
    fn test_wide_flag() {
        let mut writer = CatalogBinaryWriter::new();
        let offset = writer.write_encoded_string(Some("\u{4e2d}"), None).unwrap();
        assert_eq!(offset, WIDE_FLAG | 4);
        assert_eq!(writer.into_bytes(), vec![2, 0, 0, 0, 0x2d, 0x4e]);
    }

    #[test]
    fn test_dynamic_fallback_has_no_flag() {
        let mut writer = CatalogBinaryWriter::new();
        let offset = writer.write_encoded_string(Some("abc/def"), Some('/')).unwrap();
        assert_eq!(offset & DYNAMIC_FLAG, 0);
    }

    #[test]
    fn test_dynamic_strings_share_prefixes() {
        let mut writer = CatalogBinaryWriter::new();
        let first = writer
            .write_encoded_string(Some("Assets/Prefabs/Enemies/Goblin.prefab"), Some('/'))
            .unwrap();
        let size_after_first = writer.position();
        let second = writer
            .write_encoded_string(Some("Assets/Prefabs/Enemies/Orc.prefab"), Some('/'))
            .unwrap();
        assert_ne!(first & DYNAMIC_FLAG, 0);
        assert_ne!(second & DYNAMIC_FLAG, 0);

        // only the new tail part and one node are added
        let tail = 4 + "Orc.prefab".len() as u32;
        assert_eq!(writer.position(), size_after_first + tail + 8);

        let bytes = writer.into_bytes();
        let mut reader = CatalogBinaryReader::new(&bytes);
        reader.set_version(2);
        assert_eq!(
            reader.read_encoded_string(first, Some('/')).unwrap().as_deref(),
            Some("Assets/Prefabs/Enemies/Goblin.prefab")
        );
        assert_eq!(
            reader.read_encoded_string(second, Some('/')).unwrap().as_deref(),
            Some("Assets/Prefabs/Enemies/Orc.prefab")
        );
    }

    #[test]
    fn test_reserved_array_patch() {
        let mut writer = CatalogBinaryWriter::new();
        writer.sink().reserve(12).unwrap();
        writer.write_with_cache(&[9, 9]).unwrap();
        let offset = writer.overwrite_offset_array(0, &[0x10, 0x20]).unwrap();
        assert_eq!(offset, 4);
        assert_eq!(writer.position(), 14);

        let bytes = writer.into_bytes();
        let mut reader = CatalogBinaryReader::new(&bytes);
        assert_eq!(reader.read_offset_array(offset).unwrap(), vec![0x10, 0x20]);
    }
}
