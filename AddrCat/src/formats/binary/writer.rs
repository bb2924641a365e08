//! Binary catalog encoding
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

use super::header::{CatalogHeader, HEADER_SIZE, WRITE_VERSION};
use super::reader::LOCATION_RECORD_SIZE;
use crate::catalog::{ContentCatalog, LocationId, TypeAssemblies};
use crate::codec::encode_v2;
use crate::error::{Error, Result};
use crate::io::{CatalogBinaryWriter, NULL_OFFSET};
use rustc_hash::{FxHashMap, FxHashSet};

/// Serialize a catalog to the binary format with the default type assemblies
///
/// # Errors
/// Returns an error if the catalog was read from a version 1 file, a value
/// has no binary encoding, or the location graph is cyclic.
pub fn serialize_catalog_binary(catalog: &ContentCatalog) -> Result<Vec<u8>> {
    serialize_catalog_binary_with(catalog, &TypeAssemblies::default())
}

/// Serialize a catalog to the binary format
///
/// # Errors
/// See [`serialize_catalog_binary`].
pub fn serialize_catalog_binary_with(
    catalog: &ContentCatalog,
    assemblies: &TypeAssemblies,
) -> Result<Vec<u8>> {
    if let Some(version) = catalog.version
        && version != WRITE_VERSION
    {
        return Err(Error::UnsupportedWriteVersion { version });
    }

    let mut writer = CatalogBinaryWriter::new();
    writer.sink().reserve(HEADER_SIZE as usize)?;

    // the key array is filled in last, once every key and list has an offset
    let keys_length_offset = writer.position();
    writer.sink().reserve(4 + catalog.resources.len() * 8)?;

    let mut header = CatalogHeader {
        id_offset: writer.write_encoded_string(catalog.locator_id.as_deref(), None)?,
        instance_provider_offset: catalog.instance_provider_data.write_binary(&mut writer)?,
        scene_provider_offset: catalog.scene_provider_data.write_binary(&mut writer)?,
        ..CatalogHeader::default()
    };

    let mut provider_offsets = Vec::with_capacity(catalog.resource_provider_data.len());
    for provider in &catalog.resource_provider_data {
        provider_offsets.push(provider.write_binary(&mut writer)?);
    }
    header.init_objects_array_offset = writer.write_offset_array(&provider_offsets)?;
    header.build_result_hash_offset =
        writer.write_encoded_string(catalog.build_result_hash.as_deref(), None)?;

    let mut locations = LocationWriter::new(catalog, assemblies);

    let mut list_offsets = Vec::with_capacity(catalog.resources.len());
    for ids in catalog.resources.values() {
        let mut offsets = Vec::with_capacity(ids.len());
        for &id in ids {
            offsets.push(locations.write(&mut writer, id)?);
        }
        list_offsets.push(offsets);
    }

    let mut pairs = Vec::with_capacity(catalog.resources.len() * 2);
    for (key, offsets) in catalog.resources.keys().zip(&list_offsets) {
        pairs.push(encode_v2(&mut writer, assemblies, Some(key))?);
        pairs.push(writer.write_offset_array(offsets)?);
    }

    header.keys_offset = writer.overwrite_offset_array(keys_length_offset, &pairs)?;
    writer.sink().overwrite_at(0, &header.to_bytes()?)?;

    let bytes = writer.into_bytes();
    tracing::debug!(
        "Serialized binary catalog: {} keys, {} locations written, {} bytes",
        catalog.resources.len(),
        locations.written.len(),
        bytes.len()
    );
    Ok(bytes)
}

/// Writes location records, dependencies first, once per arena slot.
struct LocationWriter<'a> {
    catalog: &'a ContentCatalog,
    assemblies: &'a TypeAssemblies,
    written: FxHashMap<LocationId, u32>,
    in_progress: FxHashSet<LocationId>,
}

impl<'a> LocationWriter<'a> {
    fn new(catalog: &'a ContentCatalog, assemblies: &'a TypeAssemblies) -> Self {
        Self {
            catalog,
            assemblies,
            written: FxHashMap::default(),
            in_progress: FxHashSet::default(),
        }
    }

    fn write(&mut self, writer: &mut CatalogBinaryWriter, id: LocationId) -> Result<u32> {
        if let Some(&offset) = self.written.get(&id) {
            return Ok(offset);
        }

        let catalog = self.catalog;
        let location = catalog.require_location(id)?;
        if !self.in_progress.insert(id) {
            return Err(Error::CyclicDependency {
                internal_id: location.internal_id.clone().unwrap_or_default(),
            });
        }

        let internal_id = location
            .internal_id
            .as_deref()
            .ok_or(Error::MissingField { field: "internal_id" })?;
        let provider_id = location
            .provider_id
            .as_deref()
            .ok_or(Error::MissingField { field: "provider_id" })?;

        // a dependency key stands for every location listed under it
        let dependencies = match (&location.dependencies, &location.dependency_key) {
            (Some(deps), _) if !deps.is_empty() => deps.clone(),
            (_, Some(key)) => catalog
                .resources
                .get(key)
                .cloned()
                .ok_or_else(|| Error::UnknownKey(key.to_string()))?,
            _ => Vec::new(),
        };

        let dependencies_offset = if dependencies.is_empty() {
            NULL_OFFSET
        } else {
            let mut offsets = Vec::with_capacity(dependencies.len());
            for dependency in dependencies {
                offsets.push(self.write(writer, dependency)?);
            }
            writer.write_offset_array(&offsets)?
        };

        let primary_key_offset = writer.write_encoded_string(location.primary_key.as_deref(), Some('/'))?;
        let internal_id_offset = writer.write_encoded_string(Some(internal_id), Some('/'))?;
        let provider_id_offset = writer.write_encoded_string(Some(provider_id), Some('.'))?;
        let data_offset = encode_v2(writer, self.assemblies, location.data.as_ref())?;
        let type_offset = location.resource_type.write_binary(writer)?;

        let mut record = [0u8; LOCATION_RECORD_SIZE];
        for (chunk, field) in record.chunks_exact_mut(4).zip([
            primary_key_offset,
            internal_id_offset,
            provider_id_offset,
            dependencies_offset,
            location.dependency_hash as u32,
            data_offset,
            type_offset,
        ]) {
            chunk.copy_from_slice(&field.to_le_bytes());
        }
        let offset = writer.write_with_cache(&record)?;

        self.in_progress.remove(&id);
        self.written.insert(id, offset);
        Ok(offset)
    }
}
