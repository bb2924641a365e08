//! JSON catalog decoding
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

use super::document::ContentCatalogDataJson;
use crate::catalog::{CatalogValue, ContentCatalog, ObjectInitializationData, ResourceLocation, SerializedType, TextLayout};
use crate::codec::decode_v1;
use crate::error::{Error, Result};
use crate::io::ByteCursor;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};

/// Separates a prefix table index from the rest of a compacted internal id.
pub(super) const PREFIX_MARKER: char = '#';

/// Seven `i32` fields per entry row.
const ENTRY_ROW_SIZE: usize = 28;
/// A bucket is at least its key offset and entry count.
const MIN_BUCKET_SIZE: usize = 8;

/// Parse a JSON catalog from a string
///
/// # Errors
/// Returns an error if the JSON is malformed, a blob is not valid base64, or
/// any table index is out of range.
pub fn parse_catalog_json(content: &str) -> Result<ContentCatalog> {
    let document: ContentCatalogDataJson = serde_json::from_str(content)?;
    read_catalog_document(&document)
}

/// Rebuild the catalog model from an already parsed document
///
/// # Errors
/// See [`parse_catalog_json`].
pub fn read_catalog_document(document: &ContentCatalogDataJson) -> Result<ContentCatalog> {
    let mut catalog = ContentCatalog {
        locator_id: document.locator_id.clone(),
        build_result_hash: document.build_result_hash.clone(),
        instance_provider_data: ObjectInitializationData::from(&document.instance_provider_data),
        scene_provider_data: ObjectInitializationData::from(&document.scene_provider_data),
        resource_provider_data: document
            .resource_provider_data
            .iter()
            .map(ObjectInitializationData::from)
            .collect(),
        text_layout: Some(TextLayout {
            legacy_keys: document.keys.clone(),
            internal_id_prefixes: document.internal_id_prefixes.is_some(),
        }),
        ..ContentCatalog::default()
    };

    let buckets = read_buckets(&BASE64.decode(&document.bucket_data_string)?)?;
    let keys = read_keys(&BASE64.decode(&document.key_data_string)?, &buckets)?;

    let entry_data = BASE64.decode(&document.entry_data_string)?;
    let extra_data = BASE64.decode(&document.extra_data_string)?;
    let resource_types: Vec<SerializedType> = document.resource_types.iter().map(SerializedType::from).collect();

    let mut entries = ByteCursor::new(&entry_data);
    let mut extra = ByteCursor::new(&extra_data);
    let entry_count = read_row_count(&mut entries, ENTRY_ROW_SIZE)?;

    let mut ids = Vec::with_capacity(entry_count);
    for _ in 0..entry_count {
        let row = EntryRow::read(&mut entries)?;

        let dependency_key = if row.dependency_key_index >= 0 {
            Some(lookup("keys", &keys, row.dependency_key_index)?.clone())
        } else {
            None
        };

        let data = if row.data_index >= 0 {
            extra.seek(row.data_index as u64);
            Some(decode_v1(&mut extra)?)
        } else {
            None
        };

        let primary_key = match &document.keys {
            Some(legacy) => lookup("m_Keys", legacy, row.primary_key_index)?.clone(),
            None => lookup("keys", &keys, row.primary_key_index)?.to_string(),
        };

        let location = ResourceLocation {
            internal_id: Some(expand_internal_id(
                lookup("m_InternalIds", &document.internal_ids, row.internal_id_index)?,
                document.internal_id_prefixes.as_deref(),
            )?),
            provider_id: Some(lookup("m_ProviderIds", &document.provider_ids, row.provider_index)?.clone()),
            primary_key: Some(primary_key),
            dependency_key,
            dependencies: None,
            data,
            dependency_hash: row.dependency_hash,
            resource_type: lookup("m_resourceTypes", &resource_types, row.resource_type_index)?.clone(),
        };
        ids.push(catalog.add_location(location));
    }

    catalog.resources.reserve(buckets.len());
    for (key, bucket) in keys.into_iter().zip(&buckets) {
        let mut locations = Vec::with_capacity(bucket.entries.len());
        for &entry in &bucket.entries {
            locations.push(*lookup("entries", &ids, entry)?);
        }
        catalog.resources.insert(key, locations);
    }

    tracing::debug!(
        "Parsed JSON catalog: {} keys, {} locations, {} providers",
        catalog.resources.len(),
        catalog.location_count(),
        catalog.resource_provider_data.len()
    );
    Ok(catalog)
}

/// A key's offset into the key blob and the entry rows listed under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Bucket {
    pub offset: i32,
    pub entries: Vec<i32>,
}

/// One fixed-size row of the entry blob; every field is an index or -1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct EntryRow {
    pub internal_id_index: i32,
    pub provider_index: i32,
    pub dependency_key_index: i32,
    pub dependency_hash: i32,
    pub data_index: i32,
    pub primary_key_index: i32,
    pub resource_type_index: i32,
}

impl EntryRow {
    fn read(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        Ok(Self {
            internal_id_index: cursor.read_i32()?,
            provider_index: cursor.read_i32()?,
            dependency_key_index: cursor.read_i32()?,
            dependency_hash: cursor.read_i32()?,
            data_index: cursor.read_i32()?,
            primary_key_index: cursor.read_i32()?,
            resource_type_index: cursor.read_i32()?,
        })
    }
}

fn read_buckets(data: &[u8]) -> Result<Vec<Bucket>> {
    let mut cursor = ByteCursor::new(data);
    let count = read_row_count(&mut cursor, MIN_BUCKET_SIZE)?;

    let mut buckets = Vec::with_capacity(count);
    for _ in 0..count {
        let offset = cursor.read_i32()?;
        let entry_count = read_row_count(&mut cursor, 4)?;
        let mut entries = Vec::with_capacity(entry_count);
        for _ in 0..entry_count {
            entries.push(cursor.read_i32()?);
        }
        buckets.push(Bucket { offset, entries });
    }
    Ok(buckets)
}

/// Decode one key per bucket, each at the bucket's offset into the key blob.
fn read_keys(data: &[u8], buckets: &[Bucket]) -> Result<Vec<CatalogValue>> {
    let mut cursor = ByteCursor::new(data);
    let key_count = read_count(&mut cursor)?;
    if key_count != buckets.len() {
        tracing::warn!(
            "Key blob holds {} keys but there are {} buckets",
            key_count,
            buckets.len()
        );
    }

    let mut keys = Vec::with_capacity(buckets.len());
    for bucket in buckets {
        let offset = u64::try_from(bucket.offset).map_err(|_| Error::IndexOutOfRange {
            table: "m_KeyDataString",
            index: i64::from(bucket.offset),
        })?;
        cursor.seek(offset);
        keys.push(decode_v1(&mut cursor)?);
    }
    Ok(keys)
}

fn read_count(cursor: &mut ByteCursor<'_>) -> Result<usize> {
    let offset = cursor.position();
    let len = cursor.read_i32()?;
    usize::try_from(len).map_err(|_| Error::NegativeLength { offset, len })
}

/// A count that must fit in the bytes after it, at `row_size` bytes per row.
fn read_row_count(cursor: &mut ByteCursor<'_>, row_size: usize) -> Result<usize> {
    let count = read_count(cursor)?;
    let remaining = cursor.len().saturating_sub(cursor.position() as usize);
    if count > remaining / row_size {
        return Err(Error::Io(std::io::ErrorKind::UnexpectedEof.into()));
    }
    Ok(count)
}

fn lookup<'a, T>(table: &'static str, items: &'a [T], index: i32) -> Result<&'a T> {
    usize::try_from(index)
        .ok()
        .and_then(|i| items.get(i))
        .ok_or(Error::IndexOutOfRange {
            table,
            index: i64::from(index),
        })
}

/// Undo prefix compaction: `"3#/Goblin.prefab"` becomes prefix 3 followed by
/// `/Goblin.prefab`. Ids are left untouched when there is no prefix table.
fn expand_internal_id(stored: &str, prefixes: Option<&[String]>) -> Result<String> {
    let Some(prefixes) = prefixes else {
        return Ok(stored.to_string());
    };
    let Some((index, suffix)) = stored.split_once(PREFIX_MARKER) else {
        return Ok(stored.to_string());
    };

    let index: i32 = index
        .parse()
        .map_err(|_| Error::InvalidInternalIdPrefix(stored.to_string()))?;
    let prefix = lookup("m_InternalIdPrefixes", prefixes, index)?;
    Ok(format!("{prefix}{suffix}"))
}
