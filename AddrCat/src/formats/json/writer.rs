//! JSON catalog encoding
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

use super::document::{ContentCatalogDataJson, ObjectInitializationDataJson, SerializedTypeJson};
use super::reader::PREFIX_MARKER;
use crate::catalog::{CatalogValue, ContentCatalog, ResourceLocation, SerializedType};
use crate::codec::encode_v1;
use crate::error::{Error, Result};
use crate::io::ByteSink;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use indexmap::IndexSet;

/// Serialize a catalog to a JSON string
///
/// # Errors
/// Returns an error if a location is missing a required field, carries a
/// dependency list, or references a key the catalog does not contain.
pub fn serialize_catalog_json(catalog: &ContentCatalog) -> Result<String> {
    let document = write_catalog_document(catalog)?;
    Ok(serde_json::to_string(&document)?)
}

/// Flatten the catalog model into the JSON document layout
///
/// # Errors
/// See [`serialize_catalog_json`].
pub fn write_catalog_document(catalog: &ContentCatalog) -> Result<ContentCatalogDataJson> {
    let layout = catalog.text_layout.clone().unwrap_or_default();

    let mut tables = Tables::default();
    let mut entries = ByteSink::new();
    let mut extra = ByteSink::new();

    entries.write_i32(catalog.location_count() as i32)?;
    for (_, location) in catalog.locations() {
        write_entry(catalog, layout.legacy_keys.as_deref(), &mut tables, location, &mut entries, &mut extra)?;
    }

    let mut keys = ByteSink::new();
    let mut buckets = ByteSink::new();
    keys.write_i32(catalog.resources.len() as i32)?;
    buckets.write_i32(catalog.resources.len() as i32)?;
    for (key, ids) in &catalog.resources {
        buckets.write_i32(keys.position() as i32)?;
        encode_v1(&mut keys, key)?;

        buckets.write_i32(ids.len() as i32)?;
        for id in ids {
            catalog.require_location(*id)?;
            buckets.write_i32(id.index() as i32)?;
        }
    }

    let (internal_ids, internal_id_prefixes) = if layout.internal_id_prefixes {
        let (ids, prefixes) = compact_internal_ids(&tables.internal_ids);
        (ids, Some(prefixes))
    } else {
        (tables.internal_ids.into_iter().collect(), None)
    };

    tracing::debug!(
        "Serialized JSON catalog: {} keys, {} locations, {} internal ids, {} providers",
        catalog.resources.len(),
        catalog.location_count(),
        internal_ids.len(),
        tables.provider_ids.len()
    );

    Ok(ContentCatalogDataJson {
        locator_id: catalog.locator_id.clone(),
        build_result_hash: catalog.build_result_hash.clone(),
        instance_provider_data: ObjectInitializationDataJson::from(&catalog.instance_provider_data),
        scene_provider_data: ObjectInitializationDataJson::from(&catalog.scene_provider_data),
        resource_provider_data: catalog
            .resource_provider_data
            .iter()
            .map(ObjectInitializationDataJson::from)
            .collect(),
        provider_ids: tables.provider_ids.into_iter().collect(),
        internal_ids,
        key_data_string: BASE64.encode(keys.as_bytes()),
        bucket_data_string: BASE64.encode(buckets.as_bytes()),
        entry_data_string: BASE64.encode(entries.as_bytes()),
        extra_data_string: BASE64.encode(extra.as_bytes()),
        keys: layout.legacy_keys,
        resource_types: tables.resource_types.iter().map(SerializedTypeJson::from).collect(),
        internal_id_prefixes,
    })
}

/// String tables shared by every entry row, in first-seen order.
#[derive(Default)]
struct Tables {
    internal_ids: IndexSet<String>,
    provider_ids: IndexSet<String>,
    resource_types: IndexSet<SerializedType>,
}

fn write_entry(
    catalog: &ContentCatalog,
    legacy_keys: Option<&[String]>,
    tables: &mut Tables,
    location: &ResourceLocation,
    entries: &mut ByteSink,
    extra: &mut ByteSink,
) -> Result<()> {
    if location.dependencies.as_ref().is_some_and(|deps| !deps.is_empty()) {
        return Err(Error::DependencyListInTextFormat);
    }

    let internal_id = location
        .internal_id
        .clone()
        .ok_or(Error::MissingField { field: "internal_id" })?;
    let provider_id = location
        .provider_id
        .clone()
        .ok_or(Error::MissingField { field: "provider_id" })?;
    let primary_key = location
        .primary_key
        .as_deref()
        .ok_or(Error::MissingField { field: "primary_key" })?;

    let internal_id_index = tables.internal_ids.insert_full(internal_id).0;
    let provider_index = tables.provider_ids.insert_full(provider_id).0;
    let resource_type_index = tables.resource_types.insert_full(location.resource_type.clone()).0;

    let dependency_key_index = match &location.dependency_key {
        Some(key) => catalog
            .resources
            .get_index_of(key)
            .ok_or_else(|| Error::UnknownKey(key.to_string()))? as i32,
        None => -1,
    };

    let data_index = match &location.data {
        Some(data) => {
            let position = extra.position() as i32;
            encode_v1(extra, data)?;
            position
        }
        None => -1,
    };

    for field in [
        internal_id_index as i32,
        provider_index as i32,
        dependency_key_index,
        location.dependency_hash,
        data_index,
        primary_key_index(catalog, legacy_keys, primary_key)? as i32,
        resource_type_index as i32,
    ] {
        entries.write_i32(field)?;
    }
    Ok(())
}

/// Legacy catalogs index `m_Keys`; newer ones index the key table, matching
/// non-string keys by their display form.
fn primary_key_index(catalog: &ContentCatalog, legacy_keys: Option<&[String]>, primary_key: &str) -> Result<usize> {
    let index = match legacy_keys {
        Some(legacy) => legacy.iter().position(|key| key == primary_key),
        None => catalog
            .resources
            .get_index_of(&CatalogValue::from(primary_key))
            .or_else(|| catalog.resources.keys().position(|key| key.to_string() == primary_key)),
    };
    index.ok_or_else(|| Error::UnknownKey(primary_key.to_string()))
}

/// Split each id at its last '/' into a shared prefix and a `"N#/suffix"` stub.
fn compact_internal_ids(internal_ids: &IndexSet<String>) -> (Vec<String>, Vec<String>) {
    let mut prefixes: IndexSet<&str> = IndexSet::new();
    let compacted = internal_ids
        .iter()
        .map(|id| match id.rfind('/') {
            Some(split) => {
                let (index, _) = prefixes.insert_full(&id[..split]);
                format!("{index}{PREFIX_MARKER}{}", &id[split..])
            }
            None => id.clone(),
        })
        .collect();
    (compacted, prefixes.into_iter().map(str::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TextLayout;
    use pretty_assertions::assert_eq;

    fn location(internal_id: &str, primary_key: &str) -> ResourceLocation {
        ResourceLocation {
            internal_id: Some(internal_id.to_string()),
            provider_id: Some("UnityEngine.ResourceManagement.ResourceProviders.BundledAssetProvider".into()),
            primary_key: Some(primary_key.to_string()),
            resource_type: SerializedType::new("UnityEngine.CoreModule, Version=0.0.0.0", "UnityEngine.GameObject"),
            ..ResourceLocation::default()
        }
    }

    #[test]
    fn test_internal_id_compaction() {
        let ids: IndexSet<String> = [
            "Assets/Prefabs/Goblin.prefab",
            "Assets/Prefabs/Orc.prefab",
            "Assets/Audio/roar.wav",
            "plain",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        let (compacted, prefixes) = compact_internal_ids(&ids);
        assert_eq!(compacted, vec!["0#/Goblin.prefab", "0#/Orc.prefab", "1#/roar.wav", "plain"]);
        assert_eq!(prefixes, vec!["Assets/Prefabs", "Assets/Audio"]);
    }

    #[test]
    fn test_prefixes_follow_layout() {
        let mut catalog = ContentCatalog::new();
        let id = catalog.add_location(location("Assets/Prefabs/Goblin.prefab", "Goblin"));
        catalog.resources.insert("Goblin".into(), vec![id]);

        let document = write_catalog_document(&catalog).unwrap();
        assert_eq!(document.internal_ids, vec!["0#/Goblin.prefab"]);
        assert_eq!(document.internal_id_prefixes, Some(vec!["Assets/Prefabs".to_string()]));

        catalog.text_layout = Some(TextLayout {
            legacy_keys: None,
            internal_id_prefixes: false,
        });
        let document = write_catalog_document(&catalog).unwrap();
        assert_eq!(document.internal_ids, vec!["Assets/Prefabs/Goblin.prefab"]);
        assert_eq!(document.internal_id_prefixes, None);
    }

    #[test]
    fn test_primary_key_lookup() {
        let mut catalog = ContentCatalog::new();
        let id = catalog.add_location(location("Assets/Prefabs/Goblin.prefab", "42"));
        catalog.resources.insert("Goblin".into(), vec![id]);
        catalog.resources.insert(CatalogValue::Int32(42), vec![id]);
        assert_eq!(primary_key_index(&catalog, None, "Goblin").unwrap(), 0);
        assert_eq!(primary_key_index(&catalog, None, "42").unwrap(), 1);

        let legacy = vec!["Orc".to_string(), "Goblin".to_string()];
        assert_eq!(primary_key_index(&catalog, Some(legacy.as_slice()), "Goblin").unwrap(), 1);
        assert!(matches!(
            primary_key_index(&catalog, None, "Orc"),
            Err(Error::UnknownKey(key)) if key == "Orc"
        ));
    }

    #[test]
    fn test_rejected_locations() {
        let mut catalog = ContentCatalog::new();
        let bundle = catalog.add_location(location("Assets/bundle_01", "bundle_01"));
        let asset = catalog.add_location(ResourceLocation {
            dependencies: Some(vec![bundle]),
            ..location("Assets/Goblin.prefab", "bundle_01")
        });
        catalog.resources.insert("bundle_01".into(), vec![bundle, asset]);
        assert!(matches!(
            write_catalog_document(&catalog),
            Err(Error::DependencyListInTextFormat)
        ));

        catalog.location_mut(asset).unwrap().dependencies = Some(Vec::new());
        catalog.location_mut(asset).unwrap().provider_id = None;
        assert!(matches!(
            write_catalog_document(&catalog),
            Err(Error::MissingField { field: "provider_id" })
        ));

        catalog.location_mut(asset).unwrap().provider_id = Some("Provider".into());
        catalog.location_mut(asset).unwrap().dependency_key = Some("missing".into());
        assert!(matches!(
            write_catalog_document(&catalog),
            Err(Error::UnknownKey(key)) if key == "missing"
        ));
    }

    #[test]
    fn test_optional_fields_stay_absent() {
        let mut catalog = ContentCatalog::new();
        catalog.text_layout = Some(TextLayout {
            legacy_keys: None,
            internal_id_prefixes: false,
        });
        let json = serialize_catalog_json(&catalog).unwrap();
        assert!(!json.contains("m_BuildResultHash"));
        assert!(!json.contains("m_Keys"));
        assert!(!json.contains("m_InternalIdPrefixes"));
        assert!(json.starts_with("{\"m_LocatorId\":null,\"m_InstanceProviderData\""));
    }
}
