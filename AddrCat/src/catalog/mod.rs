//! Logical catalog model shared by the binary and JSON formats
//!
//! Resource locations live in an arena owned by the catalog and are referred
//! to by [`LocationId`]. A location listed under several keys, or depended on
//! by several parents, is one arena slot referenced from each place.

mod bundle_options;
mod hash128;
mod serialized_type;
mod value;

pub use bundle_options::{AssetBundleRequestOptions, AssetLoadMode, CommonInfo, CommonInfoVersion};
pub use hash128::Hash128;
pub use serialized_type::{ObjectInitializationData, SerializedType, TypeAssemblies};
pub use value::CatalogValue;

use crate::error::{Error, Result};
use indexmap::IndexMap;

/// Index of a location in its catalog's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocationId(usize);

impl LocationId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// One loadable entry: where it lives, how to load it, what it needs first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceLocation {
    pub internal_id: Option<String>,
    pub provider_id: Option<String>,
    pub primary_key: Option<String>,
    /// Key whose locations must load first (JSON catalogs).
    pub dependency_key: Option<CatalogValue>,
    /// Direct dependencies (binary catalogs). `None` for JSON catalogs.
    pub dependencies: Option<Vec<LocationId>>,
    pub data: Option<CatalogValue>,
    /// Carried through unchanged, never recomputed.
    pub dependency_hash: i32,
    pub resource_type: SerializedType,
}

/// JSON presentation details that must survive a round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLayout {
    /// The legacy flat `m_Keys` array; primary key indices point into it.
    pub legacy_keys: Option<Vec<String>>,
    /// Whether internal ids are compacted through `m_InternalIdPrefixes`.
    pub internal_id_prefixes: bool,
}

impl Default for TextLayout {
    fn default() -> Self {
        Self {
            legacy_keys: None,
            internal_id_prefixes: true,
        }
    }
}

/// A decoded content catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentCatalog {
    /// Binary header version; `None` for catalogs not read from the binary format.
    pub version: Option<i32>,
    pub locator_id: Option<String>,
    pub build_result_hash: Option<String>,
    pub instance_provider_data: ObjectInitializationData,
    pub scene_provider_data: ObjectInitializationData,
    pub resource_provider_data: Vec<ObjectInitializationData>,
    /// Key -> locations, in catalog order.
    pub resources: IndexMap<CatalogValue, Vec<LocationId>>,
    /// Set when decoded from JSON.
    pub text_layout: Option<TextLayout>,
    pub(crate) locations: Vec<ResourceLocation>,
}

impl ContentCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a location to the arena.
    pub fn add_location(&mut self, location: ResourceLocation) -> LocationId {
        self.locations.push(location);
        LocationId(self.locations.len() - 1)
    }

    #[must_use]
    pub fn location(&self, id: LocationId) -> Option<&ResourceLocation> {
        self.locations.get(id.0)
    }

    pub fn location_mut(&mut self, id: LocationId) -> Option<&mut ResourceLocation> {
        self.locations.get_mut(id.0)
    }

    /// Every location in the arena, in insertion order.
    pub fn locations(&self) -> impl Iterator<Item = (LocationId, &ResourceLocation)> {
        self.locations
            .iter()
            .enumerate()
            .map(|(i, location)| (LocationId(i), location))
    }

    #[must_use]
    pub fn location_count(&self) -> usize {
        self.locations.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = &CatalogValue> {
        self.resources.keys()
    }

    /// The locations listed under `key`.
    #[must_use]
    pub fn locations_for(&self, key: &CatalogValue) -> Vec<&ResourceLocation> {
        self.resources
            .get(key)
            .map(|ids| ids.iter().filter_map(|&id| self.location(id)).collect())
            .unwrap_or_default()
    }

    /// Direct dependencies of a location, resolving a dependency key to its
    /// location list when there is no explicit list.
    #[must_use]
    pub fn dependencies_of(&self, id: LocationId) -> Vec<LocationId> {
        let Some(location) = self.location(id) else {
            return Vec::new();
        };
        match (&location.dependencies, &location.dependency_key) {
            (Some(deps), _) if !deps.is_empty() => deps.clone(),
            (_, Some(key)) => self.resources.get(key).cloned().unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    pub(crate) fn require_location(&self, id: LocationId) -> Result<&ResourceLocation> {
        self.location(id).ok_or(Error::IndexOutOfRange {
            table: "locations",
            index: id.0 as i64,
        })
    }

    pub(crate) fn location_slot(&mut self, id: LocationId) -> Result<&mut ResourceLocation> {
        self.locations.get_mut(id.0).ok_or(Error::IndexOutOfRange {
            table: "locations",
            index: id.0 as i64,
        })
    }
}
