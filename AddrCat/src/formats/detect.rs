//! Catalog format detection

use super::binary::{CATALOG_MAGIC, REVERSED_CATALOG_MAGIC, parse_catalog_binary};
use super::json::parse_catalog_json;
use crate::catalog::ContentCatalog;
use crate::error::{Error, Result};

/// Physical encoding of a catalog source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogFileType {
    Binary,
    Json,
    None,
}

/// Classify a catalog source from its leading bytes.
///
/// Either byte order of the binary magic counts as binary, so a big-endian
/// catalog is reported as such and rejected by the decoder rather than here.
#[must_use]
pub fn detect_catalog_format(data: &[u8]) -> CatalogFileType {
    if let Some(magic) = data.first_chunk::<4>().map(|bytes| u32::from_le_bytes(*bytes))
        && (magic == CATALOG_MAGIC || magic == REVERSED_CATALOG_MAGIC)
    {
        return CatalogFileType::Binary;
    }

    match data.iter().find(|&&b| b != b' ' && b != b'\t') {
        Some(b'{') => CatalogFileType::Json,
        _ => CatalogFileType::None,
    }
}

/// Detect the format of `data` and decode it
///
/// # Errors
/// Returns [`Error::UnrecognizedFormat`] if the source is neither format, or
/// any error from the matching decoder.
pub fn parse_catalog(data: &[u8]) -> Result<ContentCatalog> {
    let file_type = detect_catalog_format(data);
    tracing::debug!("Detected catalog format: {:?} ({} bytes)", file_type, data.len());

    match file_type {
        CatalogFileType::Binary => parse_catalog_binary(data),
        CatalogFileType::Json => parse_catalog_json(std::str::from_utf8(data)?),
        CatalogFileType::None => Err(Error::UnrecognizedFormat),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_detect() {
        assert_eq!(detect_catalog_format(&[0x42, 0x89, 0xe3, 0x0d, 2, 0, 0, 0]), CatalogFileType::Binary);
        assert_eq!(detect_catalog_format(&[0x0d, 0xe3, 0x89, 0x42]), CatalogFileType::Binary);
        assert_eq!(detect_catalog_format(b"{\"m_LocatorId\":\"AddressablesMainContentCatalog\"}"), CatalogFileType::Json);
        assert_eq!(detect_catalog_format(b" \t {}"), CatalogFileType::Json);
        assert_eq!(detect_catalog_format(b"\n{}"), CatalogFileType::None);
        assert_eq!(detect_catalog_format(b"<xml/>"), CatalogFileType::None);
        assert_eq!(detect_catalog_format(b""), CatalogFileType::None);
    }

    #[test]
    fn test_parse_unrecognized() {
        assert!(matches!(parse_catalog(b"PK\x03\x04"), Err(Error::UnrecognizedFormat)));
        assert!(matches!(
            parse_catalog(&[0x0d, 0xe3, 0x89, 0x42, 0, 0, 0, 2]),
            Err(Error::UnsupportedByteOrder)
        ));
    }
}
