//! JSON catalog document structures
//!
//! Field names and order follow the runtime's serialized layout. The four
//! `*DataString` fields are base64 blobs decoded by the reader.

use crate::catalog::{ObjectInitializationData, SerializedType};
use serde::{Deserialize, Serialize};

/// The named fields of a JSON content catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentCatalogDataJson {
    #[serde(rename = "m_LocatorId", default)]
    pub locator_id: Option<String>,
    #[serde(rename = "m_BuildResultHash", default, skip_serializing_if = "Option::is_none")]
    pub build_result_hash: Option<String>,
    #[serde(rename = "m_InstanceProviderData", default)]
    pub instance_provider_data: ObjectInitializationDataJson,
    #[serde(rename = "m_SceneProviderData", default)]
    pub scene_provider_data: ObjectInitializationDataJson,
    #[serde(rename = "m_ResourceProviderData", default)]
    pub resource_provider_data: Vec<ObjectInitializationDataJson>,
    #[serde(rename = "m_ProviderIds", default)]
    pub provider_ids: Vec<String>,
    #[serde(rename = "m_InternalIds", default)]
    pub internal_ids: Vec<String>,
    #[serde(rename = "m_KeyDataString", default)]
    pub key_data_string: String,
    #[serde(rename = "m_BucketDataString", default)]
    pub bucket_data_string: String,
    #[serde(rename = "m_EntryDataString", default)]
    pub entry_data_string: String,
    #[serde(rename = "m_ExtraDataString", default)]
    pub extra_data_string: String,
    /// Flat key list written by older runtimes.
    #[serde(rename = "m_Keys", default, skip_serializing_if = "Option::is_none")]
    pub keys: Option<Vec<String>>,
    #[serde(rename = "m_resourceTypes", default)]
    pub resource_types: Vec<SerializedTypeJson>,
    /// Shared internal id prefixes written by newer runtimes.
    #[serde(rename = "m_InternalIdPrefixes", default, skip_serializing_if = "Option::is_none")]
    pub internal_id_prefixes: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectInitializationDataJson {
    #[serde(rename = "m_Id", default)]
    pub id: Option<String>,
    #[serde(rename = "m_ObjectType", default)]
    pub object_type: SerializedTypeJson,
    #[serde(rename = "m_Data", default)]
    pub data: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedTypeJson {
    #[serde(rename = "m_AssemblyName", default)]
    pub assembly_name: String,
    #[serde(rename = "m_ClassName", default)]
    pub class_name: String,
}

impl From<&SerializedTypeJson> for SerializedType {
    fn from(value: &SerializedTypeJson) -> Self {
        Self::new(value.assembly_name.as_str(), value.class_name.as_str())
    }
}

impl From<&SerializedType> for SerializedTypeJson {
    fn from(value: &SerializedType) -> Self {
        Self {
            assembly_name: value.assembly_name.clone(),
            class_name: value.class_name.clone(),
        }
    }
}

impl From<&ObjectInitializationDataJson> for ObjectInitializationData {
    fn from(value: &ObjectInitializationDataJson) -> Self {
        Self {
            id: value.id.clone(),
            object_type: SerializedType::from(&value.object_type),
            data: value.data.clone(),
        }
    }
}

impl From<&ObjectInitializationData> for ObjectInitializationDataJson {
    fn from(value: &ObjectInitializationData) -> Self {
        Self {
            id: value.id.clone(),
            object_type: SerializedTypeJson::from(&value.object_type),
            data: value.data.clone(),
        }
    }
}
