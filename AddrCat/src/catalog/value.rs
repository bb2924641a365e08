//! Heterogeneous catalog values (keys and location payloads)

use super::{AssetBundleRequestOptions, Hash128, SerializedType};
use std::fmt;

/// A decoded key or location payload.
///
/// Compared and hashed by value, so two keys decoded from different offsets
/// with the same content are the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CatalogValue {
    String(String),
    UInt16(u16),
    UInt32(u32),
    Int32(i32),
    Int64(i64),
    Bool(bool),
    Hash128(Hash128),
    /// A type reference by class id (text format only).
    TypeReference(String),
    BundleRequestOptions {
        ty: SerializedType,
        options: AssetBundleRequestOptions,
    },
    /// A typed JSON payload with no dedicated model.
    Json {
        ty: SerializedType,
        json_text: String,
    },
}

impl CatalogValue {
    /// Short name of the variant, used in error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::String(_) => "String",
            Self::UInt16(_) => "UInt16",
            Self::UInt32(_) => "UInt32",
            Self::Int32(_) => "Int32",
            Self::Int64(_) => "Int64",
            Self::Bool(_) => "Bool",
            Self::Hash128(_) => "Hash128",
            Self::TypeReference(_) => "TypeReference",
            Self::BundleRequestOptions { .. } => "BundleRequestOptions",
            Self::Json { .. } => "Json",
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bundle_request_options(&self) -> Option<&AssetBundleRequestOptions> {
        match self {
            Self::BundleRequestOptions { options, .. } => Some(options),
            _ => None,
        }
    }

    pub fn as_bundle_request_options_mut(&mut self) -> Option<&mut AssetBundleRequestOptions> {
        match self {
            Self::BundleRequestOptions { options, .. } => Some(options),
            _ => None,
        }
    }
}

impl fmt::Display for CatalogValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) | Self::TypeReference(s) => f.write_str(s),
            Self::UInt16(v) => write!(f, "{v}"),
            Self::UInt32(v) => write!(f, "{v}"),
            Self::Int32(v) => write!(f, "{v}"),
            Self::Int64(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Hash128(h) => write!(f, "{h}"),
            Self::BundleRequestOptions { options, .. } => {
                f.write_str(options.bundle_name.as_deref().unwrap_or_default())
            }
            Self::Json { ty, .. } => write!(f, "{}", ty.class_name),
        }
    }
}

impl From<&str> for CatalogValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for CatalogValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i32> for CatalogValue {
    fn from(value: i32) -> Self {
        Self::Int32(value)
    }
}

impl From<i64> for CatalogValue {
    fn from(value: i64) -> Self {
        Self::Int64(value)
    }
}

impl From<bool> for CatalogValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Hash128> for CatalogValue {
    fn from(value: Hash128) -> Self {
        Self::Hash128(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_value_equality_is_structural() {
        let mut keys = HashSet::new();
        keys.insert(CatalogValue::from("Assets/Goblin.prefab"));
        keys.insert(CatalogValue::String("Assets/Goblin.prefab".to_string()));
        keys.insert(CatalogValue::Int32(5));
        keys.insert(CatalogValue::UInt32(5));
        assert_eq!(keys.len(), 3);
    }

    #[test]
    fn test_display() {
        assert_eq!(CatalogValue::Int32(-3).to_string(), "-3");
        assert_eq!(CatalogValue::from("key").to_string(), "key");
        assert_eq!(
            CatalogValue::Hash128(Hash128::zero()).to_string(),
            "00000000000000000000000000000000"
        );
    }
}
