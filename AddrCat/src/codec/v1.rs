//! Flat tag-byte object encoding used inside JSON catalog blobs
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

use super::BUNDLE_REQUEST_OPTIONS_MATCH;
use crate::catalog::{AssetBundleRequestOptions, CatalogValue, Hash128, SerializedType};
use crate::error::{Error, Result};
use crate::io::strings::{decode_narrow, decode_wide, encode_wide};
use crate::io::{ByteCursor, ByteSink};

/// Leading tag byte of a V1 object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ObjectTag {
    AsciiString = 0,
    UnicodeString = 1,
    UInt16 = 2,
    UInt32 = 3,
    Int32 = 4,
    Hash128 = 5,
    TypeReference = 6,
    JsonObject = 7,
}

impl TryFrom<u8> for ObjectTag {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Ok(match value {
            0 => Self::AsciiString,
            1 => Self::UnicodeString,
            2 => Self::UInt16,
            3 => Self::UInt32,
            4 => Self::Int32,
            5 => Self::Hash128,
            6 => Self::TypeReference,
            7 => Self::JsonObject,
            other => return Err(Error::UnknownObjectTag(other)),
        })
    }
}

/// Decode one object at the cursor position.
pub fn decode_v1(cursor: &mut ByteCursor<'_>) -> Result<CatalogValue> {
    let tag = ObjectTag::try_from(cursor.read_u8()?)?;

    let value = match tag {
        ObjectTag::AsciiString => CatalogValue::String(decode_narrow(&cursor.read_length_prefixed()?)),
        ObjectTag::UnicodeString => CatalogValue::String(decode_wide(&cursor.read_length_prefixed()?)),
        ObjectTag::UInt16 => CatalogValue::UInt16(cursor.read_u16()?),
        ObjectTag::UInt32 => CatalogValue::UInt32(cursor.read_u32()?),
        ObjectTag::Int32 => CatalogValue::Int32(cursor.read_i32()?),
        ObjectTag::Hash128 => CatalogValue::Hash128(Hash128::new(read_string1(cursor)?)),
        ObjectTag::TypeReference => CatalogValue::TypeReference(read_string1(cursor)?),
        ObjectTag::JsonObject => {
            let assembly_name = read_string1(cursor)?;
            let class_name = read_string1(cursor)?;
            let json_text = decode_wide(&cursor.read_length_prefixed()?);
            let ty = SerializedType::new(assembly_name, class_name);

            if ty.match_name()? == BUNDLE_REQUEST_OPTIONS_MATCH {
                let options = AssetBundleRequestOptions::from_json(&json_text)?;
                CatalogValue::BundleRequestOptions { ty, options }
            } else {
                CatalogValue::Json { ty, json_text }
            }
        }
    };
    Ok(value)
}

/// Append one object to `sink`.
pub fn encode_v1(sink: &mut ByteSink, value: &CatalogValue) -> Result<()> {
    match value {
        CatalogValue::String(s) if s.is_ascii() => {
            sink.write_u8(ObjectTag::AsciiString as u8)?;
            write_string4(sink, s.as_bytes())?;
        }
        CatalogValue::String(s) => {
            sink.write_u8(ObjectTag::UnicodeString as u8)?;
            write_string4(sink, &encode_wide(s))?;
        }
        CatalogValue::UInt16(v) => {
            sink.write_u8(ObjectTag::UInt16 as u8)?;
            sink.write_bytes(&v.to_le_bytes())?;
        }
        CatalogValue::UInt32(v) => {
            sink.write_u8(ObjectTag::UInt32 as u8)?;
            sink.write_u32(*v)?;
        }
        CatalogValue::Int32(v) => {
            sink.write_u8(ObjectTag::Int32 as u8)?;
            sink.write_i32(*v)?;
        }
        CatalogValue::Hash128(hash) => {
            sink.write_u8(ObjectTag::Hash128 as u8)?;
            write_string1(sink, hash.as_str())?;
        }
        CatalogValue::TypeReference(class_id) => {
            sink.write_u8(ObjectTag::TypeReference as u8)?;
            write_string1(sink, class_id)?;
        }
        CatalogValue::BundleRequestOptions { ty, options } => {
            write_json_object(sink, ty, &options.to_json()?)?;
        }
        CatalogValue::Json { ty, json_text } => {
            write_json_object(sink, ty, json_text)?;
        }
        CatalogValue::Int64(_) | CatalogValue::Bool(_) => {
            return Err(Error::UnsupportedValue {
                kind: value.kind(),
                codec: "V1",
            });
        }
    }
    Ok(())
}

fn write_json_object(sink: &mut ByteSink, ty: &SerializedType, json_text: &str) -> Result<()> {
    sink.write_u8(ObjectTag::JsonObject as u8)?;
    write_string1(sink, &ty.assembly_name)?;
    write_string1(sink, &ty.class_name)?;
    write_string4(sink, &encode_wide(json_text))
}

/// Single-byte length prefix.
fn read_string1(cursor: &mut ByteCursor<'_>) -> Result<String> {
    let len = cursor.read_u8()?;
    Ok(decode_narrow(&cursor.read_bytes(usize::from(len))?))
}

fn write_string1(sink: &mut ByteSink, value: &str) -> Result<()> {
    let bytes: Vec<u8> = value
        .chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect();
    let len = u8::try_from(bytes.len()).map_err(|_| Error::StringTooLong { len: bytes.len() })?;
    sink.write_u8(len)?;
    sink.write_bytes(&bytes)
}

fn write_string4(sink: &mut ByteSink, bytes: &[u8]) -> Result<()> {
    sink.write_i32(bytes.len() as i32)?;
    sink.write_bytes(bytes)
}
