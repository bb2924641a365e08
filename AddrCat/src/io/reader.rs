//! Offset-graph reader context
//!
//! Owns the cursor and the offset cache for a single binary decode.
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

use super::cache::ReadCache;
use super::cursor::ByteCursor;
use super::strings::{
    DYNAMIC_FLAG, NULL_OFFSET, OFFSET_MASK, WIDE_FLAG, decode_narrow, decode_wide,
};
use crate::error::{Error, Result};

/// Reader for offset-addressed catalog buffers.
pub struct CatalogBinaryReader<'a> {
    cursor: ByteCursor<'a>,
    cache: ReadCache,
    version: i32,
}

impl<'a> CatalogBinaryReader<'a> {
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            cursor: ByteCursor::new(data),
            cache: ReadCache::new(),
            version: 1,
        }
    }

    /// Header version; controls dynamic-string part order.
    #[must_use]
    pub fn version(&self) -> i32 {
        self.version
    }

    pub fn set_version(&mut self, version: i32) {
        self.version = version;
    }

    pub fn cursor(&mut self) -> &mut ByteCursor<'a> {
        &mut self.cursor
    }

    /// Seek to `offset` and hand back the cursor.
    pub fn at(&mut self, offset: u32) -> &mut ByteCursor<'a> {
        self.cursor.seek(u64::from(offset));
        &mut self.cursor
    }

    pub fn cache(&self) -> &ReadCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut ReadCache {
        &mut self.cache
    }

    /// Decode a string reference.
    ///
    /// `separator` enables dynamic-chain decoding; without it the dynamic
    /// flag is ignored. Returns `None` for the null reference.
    pub fn read_encoded_string(
        &mut self,
        encoded_offset: u32,
        separator: Option<char>,
    ) -> Result<Option<String>> {
        if encoded_offset == NULL_OFFSET {
            return Ok(None);
        }

        if let Some(cached) = self.cache.string(encoded_offset, separator) {
            return Ok(cached.clone());
        }

        let wide = encoded_offset & WIDE_FLAG != 0;
        let offset = encoded_offset & OFFSET_MASK;

        let value = match separator {
            Some(sep) if encoded_offset & DYNAMIC_FLAG != 0 => {
                self.read_dynamic_string(offset, wide, sep)?
            }
            _ => self.read_basic_string(offset, wide)?,
        };

        self.cache
            .insert_string(encoded_offset, separator, Some(value.clone()));
        Ok(Some(value))
    }

    /// Decode a required string reference.
    pub fn read_required_string(
        &mut self,
        encoded_offset: u32,
        separator: Option<char>,
        field: &'static str,
    ) -> Result<String> {
        self.read_encoded_string(encoded_offset, separator)?
            .ok_or(Error::MissingField { field })
    }

    fn read_basic_string(&mut self, offset: u32, wide: bool) -> Result<String> {
        let length_offset = offset.checked_sub(4).ok_or(Error::MalformedString { offset })?;
        let data = self.at(length_offset).read_length_prefixed()?;
        if wide {
            Ok(decode_wide(&data))
        } else {
            Ok(decode_narrow(&data))
        }
    }

    fn read_dynamic_string(&mut self, offset: u32, wide: bool, separator: char) -> Result<String> {
        // every node is 8 bytes, so a chain longer than this must loop
        let max_nodes = self.cursor.len() / 8 + 1;

        let mut parts = Vec::new();
        let mut node_offset = offset;
        loop {
            if parts.len() >= max_nodes {
                return Err(Error::MalformedString { offset });
            }

            let cursor = self.at(node_offset);
            let part_offset = cursor.read_u32()?;
            let next_offset = cursor.read_u32()?;

            if part_offset == NULL_OFFSET {
                return Err(Error::MalformedString { offset: node_offset });
            }
            let part_wide = wide || part_offset & WIDE_FLAG != 0;
            parts.push(self.read_basic_string(part_offset & OFFSET_MASK, part_wide)?);

            if next_offset == NULL_OFFSET {
                break;
            }
            node_offset = next_offset;
        }

        if parts.len() == 1 {
            return Ok(parts.swap_remove(0));
        }

        // version 2 chains run from the end of the string to its start
        if self.version > 1 {
            parts.reverse();
        }
        Ok(parts.join(&separator.to_string()))
    }

    /// Decode an offset array: a 4-byte byte-length prefix followed by u32s.
    pub fn read_offset_array(&mut self, encoded_offset: u32) -> Result<Vec<u32>> {
        if encoded_offset == NULL_OFFSET {
            return Ok(Vec::new());
        }

        let length_offset = encoded_offset
            .checked_sub(4)
            .ok_or(Error::InvalidOffsetArrayLength { offset: encoded_offset, byte_len: -1 })?;
        let cursor = self.at(length_offset);
        let byte_len = cursor.read_i32()?;
        if byte_len < 0 || byte_len % 4 != 0 {
            return Err(Error::InvalidOffsetArrayLength {
                offset: encoded_offset,
                byte_len,
            });
        }

        let count = (byte_len / 4) as usize;
        if count > cursor.len() / 4 {
            return Err(Error::Io(std::io::ErrorKind::UnexpectedEof.into()));
        }
        let mut result = Vec::with_capacity(count);
        for _ in 0..count {
            result.push(cursor.read_u32()?);
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(data: &mut Vec<u8>, text: &[u8]) -> u32 {
        data.extend_from_slice(&(text.len() as i32).to_le_bytes());
        let offset = data.len() as u32;
        data.extend_from_slice(text);
        offset
    }

    fn node(data: &mut Vec<u8>, part: u32, next: u32) -> u32 {
        let offset = data.len() as u32;
        data.extend_from_slice(&part.to_le_bytes());
        data.extend_from_slice(&next.to_le_bytes());
        offset
    }

    #[test]
    fn test_null_string() {
        let mut reader = CatalogBinaryReader::new(&[]);
        assert_eq!(reader.read_encoded_string(NULL_OFFSET, Some('/')).unwrap(), None);
    }

    #[test]
    fn test_plain_and_wide_strings() {
        let mut data = Vec::new();
        let narrow = plain(&mut data, b"hello");
        let wide = plain(&mut data, &[0x2d, 0x4e, 0x87, 0x65]);

        let mut reader = CatalogBinaryReader::new(&data);
        assert_eq!(reader.read_encoded_string(narrow, None).unwrap().as_deref(), Some("hello"));
        assert_eq!(
            reader.read_encoded_string(wide | WIDE_FLAG, None).unwrap().as_deref(),
            Some("\u{4e2d}\u{6587}")
        );
    }

    #[test]
    fn test_dynamic_chain_reversed_for_v2() {
        let mut data = Vec::new();
        let start = plain(&mut data, b"Assets");
        let end = plain(&mut data, b"bundle_01");
        let tail = node(&mut data, start, NULL_OFFSET);
        let head = node(&mut data, end, tail);

        let mut reader = CatalogBinaryReader::new(&data);
        reader.set_version(2);
        let value = reader.read_encoded_string(head | DYNAMIC_FLAG, Some('/')).unwrap();
        assert_eq!(value.as_deref(), Some("Assets/bundle_01"));

        // version 1 chains keep stored order
        let mut reader = CatalogBinaryReader::new(&data);
        reader.set_version(1);
        let value = reader.read_encoded_string(head | DYNAMIC_FLAG, Some('/')).unwrap();
        assert_eq!(value.as_deref(), Some("bundle_01/Assets"));
    }

    #[test]
    fn test_looping_chain_is_rejected() {
        let mut data = Vec::new();
        let part = plain(&mut data, b"abc");
        let head = data.len() as u32;
        node(&mut data, part, head);

        let mut reader = CatalogBinaryReader::new(&data);
        reader.set_version(2);
        assert!(matches!(
            reader.read_encoded_string(head | DYNAMIC_FLAG, Some('/')),
            Err(Error::MalformedString { .. })
        ));
    }

    #[test]
    fn test_offset_array() {
        let mut data = Vec::new();
        data.extend_from_slice(&8i32.to_le_bytes());
        data.extend_from_slice(&7u32.to_le_bytes());
        data.extend_from_slice(&9u32.to_le_bytes());
        data.extend_from_slice(&6i32.to_le_bytes());
        data.extend_from_slice(&[0; 6]);

        let mut reader = CatalogBinaryReader::new(&data);
        assert_eq!(reader.read_offset_array(4).unwrap(), vec![7, 9]);
        assert_eq!(reader.read_offset_array(NULL_OFFSET).unwrap(), Vec::<u32>::new());
        assert!(matches!(
            reader.read_offset_array(16),
            Err(Error::InvalidOffsetArrayLength { byte_len: 6, .. })
        ));
    }
}
