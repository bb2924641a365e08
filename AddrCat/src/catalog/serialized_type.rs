//! Type descriptors and provider init records

use crate::error::{Error, Result};
use crate::io::{CatalogBinaryReader, CatalogBinaryWriter};
use std::fmt;

/// An (assembly, class) pair naming the runtime type of a serialized value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SerializedType {
    pub assembly_name: String,
    pub class_name: String,
}

impl SerializedType {
    pub fn new(assembly_name: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self {
            assembly_name: assembly_name.into(),
            class_name: class_name.into(),
        }
    }

    /// The assembly name up to its first comma.
    ///
    /// # Errors
    /// Returns [`Error::InvalidAssemblyName`] if the name has no comma.
    pub fn assembly_short_name(&self) -> Result<&str> {
        match self.assembly_name.split_once(',') {
            Some((short, _)) => Ok(short),
            None => Err(Error::InvalidAssemblyName(self.assembly_name.clone())),
        }
    }

    /// `"{short assembly}; {class}"`, the key used for codec dispatch.
    pub fn match_name(&self) -> Result<String> {
        Ok(format!("{}; {}", self.assembly_short_name()?, self.class_name))
    }

    /// Decode the 8-byte descriptor record at `offset`.
    pub fn read_binary(reader: &mut CatalogBinaryReader<'_>, offset: u32) -> Result<Self> {
        if let Some(cached) = reader.cache().serialized_type(offset) {
            return Ok(cached.clone());
        }

        let cursor = reader.at(offset);
        let assembly_offset = cursor.read_u32()?;
        let class_offset = cursor.read_u32()?;

        let value = Self {
            assembly_name: reader.read_required_string(assembly_offset, Some('.'), "assembly_name")?,
            class_name: reader.read_required_string(class_offset, Some('.'), "class_name")?,
        };
        reader.cache_mut().insert_serialized_type(offset, value.clone());
        Ok(value)
    }

    /// Encode the descriptor; returns the record offset.
    pub fn write_binary(&self, writer: &mut CatalogBinaryWriter) -> Result<u32> {
        let assembly_offset = writer.write_encoded_string(Some(&self.assembly_name), Some('.'))?;
        let class_offset = writer.write_encoded_string(Some(&self.class_name), Some('.'))?;

        let mut bytes = [0u8; 8];
        bytes[..4].copy_from_slice(&assembly_offset.to_le_bytes());
        bytes[4..].copy_from_slice(&class_offset.to_le_bytes());
        writer.write_with_cache(&bytes)
    }
}

impl fmt::Display for SerializedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}; {}", self.assembly_name, self.class_name)
    }
}

/// Provider init record: which provider to construct and with what settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectInitializationData {
    pub id: Option<String>,
    pub object_type: SerializedType,
    /// Opaque settings, usually a JSON document the runtime interprets.
    pub data: Option<String>,
}

impl ObjectInitializationData {
    pub(crate) fn read_binary(reader: &mut CatalogBinaryReader<'_>, offset: u32) -> Result<Self> {
        let cursor = reader.at(offset);
        let id_offset = cursor.read_u32()?;
        let type_offset = cursor.read_u32()?;
        let data_offset = cursor.read_u32()?;

        Ok(Self {
            id: reader.read_encoded_string(id_offset, None)?,
            object_type: SerializedType::read_binary(reader, type_offset)?,
            data: reader.read_encoded_string(data_offset, None)?,
        })
    }

    pub(crate) fn write_binary(&self, writer: &mut CatalogBinaryWriter) -> Result<u32> {
        let id_offset = writer.write_encoded_string(self.id.as_deref(), None)?;
        let type_offset = self.object_type.write_binary(writer)?;
        let data_offset = writer.write_encoded_string(self.data.as_deref(), None)?;

        let mut bytes = [0u8; 12];
        bytes[..4].copy_from_slice(&id_offset.to_le_bytes());
        bytes[4..8].copy_from_slice(&type_offset.to_le_bytes());
        bytes[8..].copy_from_slice(&data_offset.to_le_bytes());
        writer.write_with_cache(&bytes)
    }
}

/// Full assembly names the binary encoder stamps on primitive values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeAssemblies {
    /// Assembly for `System.Int32`, `System.Int64`, `System.Boolean` and `System.String`.
    pub standard_library: String,
    /// Assembly for `UnityEngine.Hash128`.
    pub hash128: String,
    /// Assembly for `AssetBundleRequestOptions`.
    pub bundle_request_options: String,
}

impl TypeAssemblies {
    /// Names used by players built against the .NET 4.x profile.
    #[must_use]
    pub fn for_net40() -> Self {
        Self {
            standard_library: "mscorlib, Version=4.0.0.0, Culture=neutral, PublicKeyToken=b77a5c561934e089"
                .to_string(),
            hash128: "UnityEngine.CoreModule, Version=0.0.0.0, Culture=neutral, PublicKeyToken=null"
                .to_string(),
            bundle_request_options: "Unity.ResourceManager, Version=0.0.0.0, Culture=neutral, PublicKeyToken=null"
                .to_string(),
        }
    }
}

impl Default for TypeAssemblies {
    fn default() -> Self {
        Self::for_net40()
    }
}
