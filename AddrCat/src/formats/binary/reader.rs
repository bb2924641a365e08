//! Binary catalog decoding
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

use super::header::CatalogHeader;
use crate::catalog::{ContentCatalog, LocationId, ObjectInitializationData, ResourceLocation, SerializedType};
use crate::codec::decode_v2;
use crate::error::{Error, Result};
use crate::io::CatalogBinaryReader;

/// Size of a resource location record.
pub(super) const LOCATION_RECORD_SIZE: usize = 28;

/// Parse a binary catalog from bytes
///
/// # Errors
/// Returns an error if the header is invalid or any object reference is malformed.
pub fn parse_catalog_binary(data: &[u8]) -> Result<ContentCatalog> {
    let mut reader = CatalogBinaryReader::new(data);
    let header = CatalogHeader::read(reader.cursor())?;
    reader.set_version(header.version);

    tracing::trace!(
        "Catalog header: version={} keys={:#x} id={:#x} instance={:#x} scene={:#x} init={:#x} hash={:#x}",
        header.version,
        header.keys_offset,
        header.id_offset,
        header.instance_provider_offset,
        header.scene_provider_offset,
        header.init_objects_array_offset,
        header.build_result_hash_offset
    );

    let mut catalog = ContentCatalog::new();
    catalog.version = Some(header.version);
    catalog.locator_id = reader.read_encoded_string(header.id_offset, None)?;
    catalog.build_result_hash = reader.read_encoded_string(header.build_result_hash_offset, None)?;
    catalog.instance_provider_data =
        ObjectInitializationData::read_binary(&mut reader, header.instance_provider_offset)?;
    catalog.scene_provider_data =
        ObjectInitializationData::read_binary(&mut reader, header.scene_provider_offset)?;

    for offset in reader.read_offset_array(header.init_objects_array_offset)? {
        catalog
            .resource_provider_data
            .push(ObjectInitializationData::read_binary(&mut reader, offset)?);
    }

    read_resources(&mut reader, &mut catalog, header.keys_offset)?;

    tracing::debug!(
        "Parsed binary catalog: {} bytes, {} keys, {} locations, {} providers",
        data.len(),
        catalog.resources.len(),
        catalog.location_count(),
        catalog.resource_provider_data.len()
    );
    Ok(catalog)
}

/// The key map is a flat array of (key, location list) offset pairs.
fn read_resources(
    reader: &mut CatalogBinaryReader<'_>,
    catalog: &mut ContentCatalog,
    keys_offset: u32,
) -> Result<()> {
    let pairs = reader.read_offset_array(keys_offset)?;
    if pairs.len() % 2 != 0 {
        return Err(Error::InvalidOffsetArrayLength {
            offset: keys_offset,
            byte_len: (pairs.len() * 4) as i32,
        });
    }

    catalog.resources.reserve(pairs.len() / 2);
    for pair in pairs.chunks_exact(2) {
        let key = decode_v2(reader, pair[0])?.ok_or(Error::NullKey)?;

        let location_offsets = reader.read_offset_array(pair[1])?;
        let mut ids = Vec::with_capacity(location_offsets.len());
        for offset in location_offsets {
            ids.push(read_location(reader, catalog, offset)?);
        }

        catalog.resources.insert(key, ids);
    }
    Ok(())
}

/// Decode the location record at `offset`, reusing the arena slot of an
/// offset that was already visited.
fn read_location(
    reader: &mut CatalogBinaryReader<'_>,
    catalog: &mut ContentCatalog,
    offset: u32,
) -> Result<LocationId> {
    if let Some(id) = reader.cache().location(offset) {
        return Ok(id);
    }

    // claim the slot first so a reference back to this offset terminates
    let id = catalog.add_location(ResourceLocation::default());
    reader.cache_mut().insert_location(offset, id);

    let cursor = reader.at(offset);
    let mut fields = [0u32; LOCATION_RECORD_SIZE / 4];
    for field in &mut fields {
        *field = cursor.read_u32()?;
    }
    let [primary_key_offset, internal_id_offset, provider_id_offset, dependencies_offset, dependency_hash, data_offset, type_offset] =
        fields;

    let primary_key = reader.read_encoded_string(primary_key_offset, Some('/'))?;
    let internal_id = reader.read_encoded_string(internal_id_offset, Some('/'))?;
    let provider_id = reader.read_encoded_string(provider_id_offset, Some('.'))?;

    let dependency_offsets = reader.read_offset_array(dependencies_offset)?;
    let mut dependencies = Vec::with_capacity(dependency_offsets.len());
    for dependency_offset in dependency_offsets {
        dependencies.push(read_location(reader, catalog, dependency_offset)?);
    }

    let data = decode_v2(reader, data_offset)?;
    let resource_type = SerializedType::read_binary(reader, type_offset)?;

    *catalog.location_slot(id)? = ResourceLocation {
        internal_id,
        provider_id,
        primary_key,
        dependency_key: None,
        dependencies: Some(dependencies),
        data,
        dependency_hash: dependency_hash as i32,
        resource_type,
    };
    Ok(id)
}
