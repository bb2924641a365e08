//! (type, value) offset-pair object encoding used by the binary catalog
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

use super::{
    BOOL_CLASS, BOOL_MATCH, BUNDLE_REQUEST_OPTIONS_MATCH, HASH128_CLASS, HASH128_MATCH,
    INT32_CLASS, INT32_MATCH, INT64_CLASS, INT64_MATCH, STRING_CLASS, STRING_MATCH,
};
use crate::catalog::{AssetBundleRequestOptions, CatalogValue, Hash128, SerializedType, TypeAssemblies};
use crate::error::{Error, Result};
use crate::io::strings::utf16_len;
use crate::io::{CatalogBinaryReader, CatalogBinaryWriter, NULL_OFFSET};

/// Separator candidates for dynamic string values, in tie-break order.
const SEPARATOR_CANDIDATES: [char; 6] = ['/', '\\', '.', '-', '_', ','];

/// Minimum UTF-16 length of a segment that makes splitting worthwhile.
const MIN_SEGMENT_LEN: usize = 5;

/// Decode the object pair at `offset`.
///
/// Returns `None` for the null reference and for a bundle-options pair with
/// no stored record. Primitive pairs with no stored value decode to the
/// type's zero value.
pub fn decode_v2(reader: &mut CatalogBinaryReader<'_>, offset: u32) -> Result<Option<CatalogValue>> {
    if offset == NULL_OFFSET {
        return Ok(None);
    }

    let cursor = reader.at(offset);
    let type_offset = cursor.read_u32()?;
    let object_offset = cursor.read_u32()?;
    let is_default = object_offset == NULL_OFFSET;

    let ty = SerializedType::read_binary(reader, type_offset)?;
    let match_name = ty.match_name()?;

    let value = match match_name.as_str() {
        INT32_MATCH if is_default => CatalogValue::Int32(0),
        INT32_MATCH => CatalogValue::Int32(reader.at(object_offset).read_i32()?),
        INT64_MATCH if is_default => CatalogValue::Int64(0),
        INT64_MATCH => CatalogValue::Int64(reader.at(object_offset).read_i64()?),
        BOOL_MATCH if is_default => CatalogValue::Bool(false),
        BOOL_MATCH => CatalogValue::Bool(reader.at(object_offset).read_u8()? != 0),
        STRING_MATCH if is_default => CatalogValue::String(String::new()),
        STRING_MATCH => {
            let cursor = reader.at(object_offset);
            let string_offset = cursor.read_u32()?;
            let separator = char::from_u32(cursor.read_u32()?).filter(|&c| c != '\0');
            let value = reader.read_encoded_string(string_offset, separator)?;
            CatalogValue::String(value.unwrap_or_default())
        }
        HASH128_MATCH if is_default => CatalogValue::Hash128(Hash128::zero()),
        HASH128_MATCH => CatalogValue::Hash128(Hash128::read_binary(reader.at(object_offset))?),
        BUNDLE_REQUEST_OPTIONS_MATCH if is_default => return Ok(None),
        BUNDLE_REQUEST_OPTIONS_MATCH => {
            let options = AssetBundleRequestOptions::read_binary(reader, object_offset)?;
            CatalogValue::BundleRequestOptions { ty, options }
        }
        _ => return Err(Error::UnsupportedType { match_name }),
    };
    Ok(Some(value))
}

/// Encode `value` as an object pair; returns the pair's offset, or the null
/// reference for `None`.
pub fn encode_v2(
    writer: &mut CatalogBinaryWriter,
    assemblies: &TypeAssemblies,
    value: Option<&CatalogValue>,
) -> Result<u32> {
    let Some(value) = value else {
        return Ok(NULL_OFFSET);
    };

    let standard = |class: &str| SerializedType::new(assemblies.standard_library.as_str(), class);

    let mut object_offset = NULL_OFFSET;
    let ty = match value {
        CatalogValue::Int32(v) => {
            if *v != 0 {
                object_offset = writer.write_with_cache(&v.to_le_bytes())?;
            }
            standard(INT32_CLASS)
        }
        CatalogValue::Int64(v) => {
            if *v != 0 {
                object_offset = writer.write_with_cache(&v.to_le_bytes())?;
            }
            standard(INT64_CLASS)
        }
        CatalogValue::Bool(v) => {
            if *v {
                object_offset = writer.write_with_cache(&[1])?;
            }
            standard(BOOL_CLASS)
        }
        CatalogValue::String(s) => {
            if !s.is_empty() {
                let separator = choose_separator(s);
                let string_offset = writer.write_encoded_string(Some(s), separator)?;

                let mut bytes = [0u8; 8];
                bytes[..4].copy_from_slice(&string_offset.to_le_bytes());
                bytes[4..].copy_from_slice(&separator.map_or(0, u32::from).to_le_bytes());
                object_offset = writer.write_with_cache(&bytes)?;
            }
            standard(STRING_CLASS)
        }
        CatalogValue::Hash128(hash) => {
            if !hash.is_zero() {
                object_offset = writer.write_with_cache(&hash.to_binary()?)?;
            }
            SerializedType::new(assemblies.hash128.as_str(), HASH128_CLASS)
        }
        CatalogValue::BundleRequestOptions { ty, options } => {
            let match_name = ty.match_name()?;
            if match_name != BUNDLE_REQUEST_OPTIONS_MATCH {
                return Err(Error::UnsupportedType { match_name });
            }
            object_offset = options.write_binary(writer)?;
            ty.clone()
        }
        CatalogValue::UInt16(_)
        | CatalogValue::UInt32(_)
        | CatalogValue::TypeReference(_)
        | CatalogValue::Json { .. } => {
            return Err(Error::UnsupportedValue {
                kind: value.kind(),
                codec: "V2",
            });
        }
    };

    let type_offset = ty.write_binary(writer)?;

    let mut bytes = [0u8; 8];
    bytes[..4].copy_from_slice(&type_offset.to_le_bytes());
    bytes[4..].copy_from_slice(&object_offset.to_le_bytes());
    writer.write_with_cache(&bytes)
}

/// Pick the candidate separator that occurs most often, provided splitting on
/// it yields at least two segments of [`MIN_SEGMENT_LEN`] or more.
fn choose_separator(value: &str) -> Option<char> {
    let mut counts = [0usize; SEPARATOR_CANDIDATES.len()];
    let mut best: Option<(usize, char)> = None;

    for c in value.chars() {
        let Some(i) = SEPARATOR_CANDIDATES.iter().position(|&s| s == c) else {
            continue;
        };
        counts[i] += 1;
        if best.is_none_or(|(count, _)| counts[i] > count) {
            best = Some((counts[i], c));
        }
    }

    let (_, separator) = best?;
    let large_segments = value
        .split(separator)
        .filter(|segment| utf16_len(segment) >= MIN_SEGMENT_LEN)
        .count();
    (large_segments >= 2).then_some(separator)
}
