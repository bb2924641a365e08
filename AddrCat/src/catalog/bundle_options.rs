//! Asset bundle request options, the one modeled composite payload

use super::Hash128;
use crate::error::{Error, Result};
use crate::io::{CatalogBinaryReader, CatalogBinaryWriter};
use serde::{Deserialize, Serialize};

/// How much of a bundle is loaded alongside the requested asset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AssetLoadMode {
    #[default]
    RequestedAssetAndDependencies,
    AllPackedAssetsAndDependencies,
}

impl AssetLoadMode {
    #[must_use]
    pub fn from_i32(value: i32) -> Self {
        if value & 1 != 0 {
            Self::AllPackedAssetsAndDependencies
        } else {
            Self::RequestedAssetAndDependencies
        }
    }

    #[must_use]
    pub fn as_i32(self) -> i32 {
        match self {
            Self::RequestedAssetAndDependencies => 0,
            Self::AllPackedAssetsAndDependencies => 1,
        }
    }
}

/// Which optional fields the source JSON carried.
///
/// Consulted only when writing JSON so a round trip never adds fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CommonInfoVersion {
    /// No `m_ChunkedTransfer` and none of the later flags.
    V1,
    /// `m_ChunkedTransfer` but none of the later flags.
    V2,
    /// Every field. Always the case for binary catalogs.
    #[default]
    V3,
}

/// Download settings shared by bundle request options.
///
/// The numeric fields hold the JSON `int` values as read, so Unity's
/// `m_RedirectLimit` of -1 survives a text round trip. The binary record
/// narrows them to `i16`/`u8` with wrapping casts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CommonInfo {
    pub timeout: i32,
    pub redirect_limit: i32,
    pub retry_count: i32,
    pub asset_load_mode: AssetLoadMode,
    pub chunked_transfer: bool,
    pub use_crc_for_cached_bundle: bool,
    pub use_uwr_for_local_bundles: bool,
    pub clear_other_cached_versions_when_loaded: bool,
    pub version: CommonInfoVersion,
}

const FLAG_LOAD_MODE: i32 = 1;
const FLAG_CHUNKED_TRANSFER: i32 = 1 << 1;
const FLAG_CRC_FOR_CACHED: i32 = 1 << 2;
const FLAG_UWR_FOR_LOCAL: i32 = 1 << 3;
const FLAG_CLEAR_OTHER_VERSIONS: i32 = 1 << 4;

impl CommonInfo {
    fn flags(&self) -> i32 {
        let mut flags = self.asset_load_mode.as_i32() & FLAG_LOAD_MODE;
        if self.chunked_transfer {
            flags |= FLAG_CHUNKED_TRANSFER;
        }
        if self.use_crc_for_cached_bundle {
            flags |= FLAG_CRC_FOR_CACHED;
        }
        if self.use_uwr_for_local_bundles {
            flags |= FLAG_UWR_FOR_LOCAL;
        }
        if self.clear_other_cached_versions_when_loaded {
            flags |= FLAG_CLEAR_OTHER_VERSIONS;
        }
        flags
    }

    fn read_binary(reader: &mut CatalogBinaryReader<'_>, offset: u32) -> Result<Self> {
        let cursor = reader.at(offset);
        let timeout = i32::from(cursor.read_i16()?);
        let redirect_limit = i32::from(cursor.read_u8()?);
        let retry_count = i32::from(cursor.read_u8()?);
        let flags = cursor.read_i32()?;

        Ok(Self {
            timeout,
            redirect_limit,
            retry_count,
            asset_load_mode: AssetLoadMode::from_i32(flags),
            chunked_transfer: flags & FLAG_CHUNKED_TRANSFER != 0,
            use_crc_for_cached_bundle: flags & FLAG_CRC_FOR_CACHED != 0,
            use_uwr_for_local_bundles: flags & FLAG_UWR_FOR_LOCAL != 0,
            clear_other_cached_versions_when_loaded: flags & FLAG_CLEAR_OTHER_VERSIONS != 0,
            version: CommonInfoVersion::V3,
        })
    }

    fn write_binary(&self, writer: &mut CatalogBinaryWriter) -> Result<u32> {
        let mut bytes = [0u8; 8];
        bytes[..2].copy_from_slice(&(self.timeout as i16).to_le_bytes());
        bytes[2] = self.redirect_limit as u8;
        bytes[3] = self.retry_count as u8;
        bytes[4..].copy_from_slice(&self.flags().to_le_bytes());
        writer.write_with_cache(&bytes)
    }
}

/// Request options for one asset bundle location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct AssetBundleRequestOptions {
    pub hash: Hash128,
    pub crc: u32,
    /// `None` when the binary record holds a null string reference.
    pub bundle_name: Option<String>,
    pub bundle_size: i64,
    pub common_info: CommonInfo,
}

/// JSON field layout, in the order the runtime writes it.
#[derive(Debug, Serialize, Deserialize)]
struct BundleRequestOptionsJson {
    #[serde(rename = "m_Hash")]
    hash: String,
    #[serde(rename = "m_Crc")]
    crc: u32,
    #[serde(rename = "m_Timeout")]
    timeout: i32,
    #[serde(rename = "m_RedirectLimit")]
    redirect_limit: i32,
    #[serde(rename = "m_RetryCount")]
    retry_count: i32,
    #[serde(rename = "m_BundleName")]
    bundle_name: Option<String>,
    #[serde(rename = "m_BundleSize")]
    bundle_size: i64,
    #[serde(rename = "m_ChunkedTransfer", default, skip_serializing_if = "Option::is_none")]
    chunked_transfer: Option<bool>,
    #[serde(rename = "m_AssetLoadMode", default, skip_serializing_if = "Option::is_none")]
    asset_load_mode: Option<i32>,
    #[serde(rename = "m_UseCrcForCachedBundles", default, skip_serializing_if = "Option::is_none")]
    use_crc_for_cached_bundles: Option<bool>,
    #[serde(rename = "m_UseUWRForLocalBundles", default, skip_serializing_if = "Option::is_none")]
    use_uwr_for_local_bundles: Option<bool>,
    #[serde(
        rename = "m_ClearOtherCachedVersionsWhenLoaded",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    clear_other_cached_versions_when_loaded: Option<bool>,
}

impl AssetBundleRequestOptions {
    /// Parse the JSON payload carried by a V1 object.
    pub fn from_json(text: &str) -> Result<Self> {
        let json: BundleRequestOptionsJson =
            serde_json::from_str(text).map_err(|e| Error::InvalidObjectJson {
                type_name: "AssetBundleRequestOptions",
                message: e.to_string(),
            })?;

        let version = if json.chunked_transfer.is_none() {
            CommonInfoVersion::V1
        } else if json.asset_load_mode.is_none()
            && json.use_crc_for_cached_bundles.is_none()
            && json.use_uwr_for_local_bundles.is_none()
            && json.clear_other_cached_versions_when_loaded.is_none()
        {
            CommonInfoVersion::V2
        } else {
            CommonInfoVersion::V3
        };

        Ok(Self {
            hash: Hash128::new(json.hash),
            crc: json.crc,
            bundle_name: json.bundle_name,
            bundle_size: json.bundle_size,
            common_info: CommonInfo {
                timeout: json.timeout,
                redirect_limit: json.redirect_limit,
                retry_count: json.retry_count,
                asset_load_mode: json
                    .asset_load_mode
                    .map_or(AssetLoadMode::default(), AssetLoadMode::from_i32),
                chunked_transfer: json.chunked_transfer.unwrap_or(false),
                use_crc_for_cached_bundle: json.use_crc_for_cached_bundles.unwrap_or(false),
                use_uwr_for_local_bundles: json.use_uwr_for_local_bundles.unwrap_or(false),
                clear_other_cached_versions_when_loaded: json
                    .clear_other_cached_versions_when_loaded
                    .unwrap_or(false),
                version,
            },
        })
    }

    /// Render the JSON payload, emitting only the fields the source version had.
    pub fn to_json(&self) -> Result<String> {
        let info = &self.common_info;
        let has_chunked = info.version != CommonInfoVersion::V1;
        let has_flags = info.version == CommonInfoVersion::V3;

        let json = BundleRequestOptionsJson {
            hash: self.hash.as_str().to_string(),
            crc: self.crc,
            timeout: info.timeout,
            redirect_limit: info.redirect_limit,
            retry_count: info.retry_count,
            bundle_name: self.bundle_name.clone(),
            bundle_size: self.bundle_size,
            chunked_transfer: has_chunked.then_some(info.chunked_transfer),
            asset_load_mode: has_flags.then_some(info.asset_load_mode.as_i32()),
            use_crc_for_cached_bundles: has_flags.then_some(info.use_crc_for_cached_bundle),
            use_uwr_for_local_bundles: has_flags.then_some(info.use_uwr_for_local_bundles),
            clear_other_cached_versions_when_loaded: has_flags
                .then_some(info.clear_other_cached_versions_when_loaded),
        };
        Ok(serde_json::to_string(&json)?)
    }

    /// Decode the 20-byte record at `offset`, sharing repeat references.
    pub(crate) fn read_binary(reader: &mut CatalogBinaryReader<'_>, offset: u32) -> Result<Self> {
        if let Some(cached) = reader.cache().bundle_options(offset) {
            return Ok(cached.clone());
        }

        let cursor = reader.at(offset);
        let hash_offset = cursor.read_u32()?;
        let bundle_name_offset = cursor.read_u32()?;
        let crc = cursor.read_u32()?;
        let bundle_size = cursor.read_u32()?;
        let common_info_offset = cursor.read_u32()?;

        let hash = Hash128::read_binary(reader.at(hash_offset))?;
        let bundle_name = reader.read_encoded_string(bundle_name_offset, Some('_'))?;
        let common_info = CommonInfo::read_binary(reader, common_info_offset)?;

        let value = Self {
            hash,
            crc,
            bundle_name,
            bundle_size: i64::from(bundle_size),
            common_info,
        };
        reader.cache_mut().insert_bundle_options(offset, value.clone());
        Ok(value)
    }

    pub(crate) fn write_binary(&self, writer: &mut CatalogBinaryWriter) -> Result<u32> {
        let hash_offset = writer.write_with_cache(&self.hash.to_binary()?)?;
        let bundle_name_offset = writer.write_encoded_string(self.bundle_name.as_deref(), Some('_'))?;
        let common_info_offset = self.common_info.write_binary(writer)?;

        let mut bytes = [0u8; 20];
        bytes[..4].copy_from_slice(&hash_offset.to_le_bytes());
        bytes[4..8].copy_from_slice(&bundle_name_offset.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.crc.to_le_bytes());
        // the binary record only has room for 32 bits
        bytes[12..16].copy_from_slice(&(self.bundle_size as u32).to_le_bytes());
        bytes[16..].copy_from_slice(&common_info_offset.to_le_bytes());
        writer.write_with_cache(&bytes)
    }
}
