//! Binary catalog header

use crate::error::{Error, Result};
use crate::io::{ByteCursor, NULL_OFFSET};
use byteorder::{LittleEndian, WriteBytesExt};

/// Little-endian magic at the start of every binary catalog.
pub const CATALOG_MAGIC: u32 = 0x0de38942;

/// The magic as it reads from a big-endian catalog.
pub const REVERSED_CATALOG_MAGIC: u32 = 0x4289e30d;

/// Size of the version 2 header.
pub const HEADER_SIZE: u32 = 32;

/// The only version that can be written.
pub const WRITE_VERSION: i32 = 2;

/// A version 1 catalog whose key array starts here has no build hash field.
const SHORT_HEADER_KEYS_OFFSET: u32 = 0x20;

/// Magic, version and the absolute offsets of the top-level objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogHeader {
    pub version: i32,
    pub keys_offset: u32,
    pub id_offset: u32,
    pub instance_provider_offset: u32,
    pub scene_provider_offset: u32,
    pub init_objects_array_offset: u32,
    pub build_result_hash_offset: u32,
}

impl Default for CatalogHeader {
    fn default() -> Self {
        Self {
            version: WRITE_VERSION,
            keys_offset: NULL_OFFSET,
            id_offset: NULL_OFFSET,
            instance_provider_offset: NULL_OFFSET,
            scene_provider_offset: NULL_OFFSET,
            init_objects_array_offset: NULL_OFFSET,
            build_result_hash_offset: NULL_OFFSET,
        }
    }
}

impl CatalogHeader {
    /// Read the header from the start of the buffer.
    pub fn read(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        cursor.seek(0);
        let magic = cursor.read_u32()?;
        if magic == REVERSED_CATALOG_MAGIC {
            return Err(Error::UnsupportedByteOrder);
        }
        if magic != CATALOG_MAGIC {
            return Err(Error::InvalidCatalogMagic(magic));
        }

        let version = cursor.read_i32()?;
        if !(1..=2).contains(&version) {
            return Err(Error::UnsupportedCatalogVersion { version });
        }

        let keys_offset = cursor.read_u32()?;
        let id_offset = cursor.read_u32()?;
        let instance_provider_offset = cursor.read_u32()?;
        let scene_provider_offset = cursor.read_u32()?;
        let init_objects_array_offset = cursor.read_u32()?;

        let build_result_hash_offset = if version == 1 && keys_offset == SHORT_HEADER_KEYS_OFFSET {
            tracing::warn!("Version 1 catalog with short header, no build result hash");
            NULL_OFFSET
        } else {
            cursor.read_u32()?
        };

        Ok(Self {
            version,
            keys_offset,
            id_offset,
            instance_provider_offset,
            scene_provider_offset,
            init_objects_array_offset,
            build_result_hash_offset,
        })
    }

    /// The 32-byte version 2 encoding.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(HEADER_SIZE as usize);
        bytes.write_u32::<LittleEndian>(CATALOG_MAGIC)?;
        bytes.write_i32::<LittleEndian>(self.version)?;
        for offset in [
            self.keys_offset,
            self.id_offset,
            self.instance_provider_offset,
            self.scene_provider_offset,
            self.init_objects_array_offset,
            self.build_result_hash_offset,
        ] {
            bytes.write_u32::<LittleEndian>(offset)?;
        }
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_header_round_trip() {
        let header = CatalogHeader {
            keys_offset: 36,
            id_offset: 100,
            instance_provider_offset: 120,
            scene_provider_offset: 132,
            init_objects_array_offset: 148,
            build_result_hash_offset: NULL_OFFSET,
            ..CatalogHeader::default()
        };
        let bytes = header.to_bytes().unwrap();
        assert_eq!(bytes.len(), HEADER_SIZE as usize);
        assert_eq!(&bytes[..4], &[0x42, 0x89, 0xe3, 0x0d]);
        assert_eq!(CatalogHeader::read(&mut ByteCursor::new(&bytes)).unwrap(), header);
    }

    #[test]
    fn test_reversed_magic() {
        let bytes = [0x0d, 0xe3, 0x89, 0x42, 0, 0, 0, 2];
        assert!(matches!(
            CatalogHeader::read(&mut ByteCursor::new(&bytes)),
            Err(Error::UnsupportedByteOrder)
        ));
    }

    #[test]
    fn test_bad_magic_and_version() {
        let bytes = *b"{\"m_Loc";
        assert!(matches!(
            CatalogHeader::read(&mut ByteCursor::new(&bytes)),
            Err(Error::InvalidCatalogMagic(_))
        ));

        let mut bytes = CatalogHeader::default().to_bytes().unwrap();
        bytes[4] = 3;
        assert!(matches!(
            CatalogHeader::read(&mut ByteCursor::new(&bytes)),
            Err(Error::UnsupportedCatalogVersion { version: 3 })
        ));
    }

    #[test]
    fn test_version1_short_header() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&CATALOG_MAGIC.to_le_bytes());
        bytes.extend_from_slice(&1i32.to_le_bytes());
        for offset in [0x20u32, 40, 50, 60, 70] {
            bytes.extend_from_slice(&offset.to_le_bytes());
        }

        let header = CatalogHeader::read(&mut ByteCursor::new(&bytes)).unwrap();
        assert_eq!(header.version, 1);
        assert_eq!(header.build_result_hash_offset, NULL_OFFSET);
        assert_eq!(header.init_objects_array_offset, 70);
    }
}
