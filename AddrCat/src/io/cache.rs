//! Per-invocation deduplication caches
//!
//! The write side keys already-written byte runs by content hash so identical
//! objects are stored once. The read side keys decoded objects by the offset
//! they were read from so shared references resolve to one object.

use crate::catalog::{AssetBundleRequestOptions, LocationId, SerializedType};
use rustc_hash::FxHashMap;
use xxhash_rust::xxh3::xxh3_128;

/// Write-side content cache.
#[derive(Debug, Default)]
pub struct WriteCache {
    /// xxh3-128 of a byte run -> offset it was written at
    data: FxHashMap<u128, u32>,
    /// string value -> offset of its first character (skips re-encoding),
    /// one map per character width
    narrow_strings: FxHashMap<String, u32>,
    wide_strings: FxHashMap<String, u32>,
}

impl WriteCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash a byte run into the key used by the data cache.
    #[must_use]
    pub fn content_key(data: &[u8]) -> u128 {
        xxh3_128(data)
    }

    #[must_use]
    pub fn lookup_data(&self, key: u128) -> Option<u32> {
        self.data.get(&key).copied()
    }

    pub fn record_data(&mut self, key: u128, offset: u32) {
        self.data.insert(key, offset);
    }

    fn strings(&self, wide: bool) -> &FxHashMap<String, u32> {
        if wide { &self.wide_strings } else { &self.narrow_strings }
    }

    #[must_use]
    pub fn lookup_string(&self, value: &str, wide: bool) -> Option<u32> {
        self.strings(wide).get(value).copied()
    }

    pub fn record_string(&mut self, value: &str, wide: bool, offset: u32) {
        let strings = if wide { &mut self.wide_strings } else { &mut self.narrow_strings };
        strings.insert(value.to_owned(), offset);
    }

    /// Number of distinct byte runs written.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Read-side offset cache.
#[derive(Debug, Default)]
pub struct ReadCache {
    strings: FxHashMap<(u32, Option<char>), Option<String>>,
    types: FxHashMap<u32, SerializedType>,
    bundle_options: FxHashMap<u32, AssetBundleRequestOptions>,
    locations: FxHashMap<u32, LocationId>,
}

impl ReadCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn string(&self, encoded_offset: u32, separator: Option<char>) -> Option<&Option<String>> {
        self.strings.get(&(encoded_offset, separator))
    }

    pub fn insert_string(&mut self, encoded_offset: u32, separator: Option<char>, value: Option<String>) {
        self.strings.insert((encoded_offset, separator), value);
    }

    #[must_use]
    pub fn serialized_type(&self, offset: u32) -> Option<&SerializedType> {
        self.types.get(&offset)
    }

    pub fn insert_serialized_type(&mut self, offset: u32, value: SerializedType) {
        self.types.insert(offset, value);
    }

    #[must_use]
    pub fn bundle_options(&self, offset: u32) -> Option<&AssetBundleRequestOptions> {
        self.bundle_options.get(&offset)
    }

    pub fn insert_bundle_options(&mut self, offset: u32, value: AssetBundleRequestOptions) {
        self.bundle_options.insert(offset, value);
    }

    #[must_use]
    pub fn location(&self, offset: u32) -> Option<LocationId> {
        self.locations.get(&offset).copied()
    }

    /// Register a location before its fields are decoded, so a reference back
    /// to the same offset resolves to the in-progress slot.
    pub fn insert_location(&mut self, offset: u32, id: LocationId) {
        self.locations.insert(offset, id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_key_is_content_based() {
        let a = WriteCache::content_key(b"Assets/bundle_01");
        let b = WriteCache::content_key(b"Assets/bundle_01");
        let c = WriteCache::content_key(b"Assets/bundle_02");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_write_cache_records() {
        let mut cache = WriteCache::new();
        let key = WriteCache::content_key(&[1, 2, 3, 4]);
        assert_eq!(cache.lookup_data(key), None);
        cache.record_data(key, 40);
        assert_eq!(cache.lookup_data(key), Some(40));
        assert_eq!(cache.len(), 1);

        cache.record_string("abc", false, 12);
        assert_eq!(cache.lookup_string("abc", false), Some(12));
        assert_eq!(cache.lookup_string("abc", true), None);
        assert_eq!(cache.lookup_string("abd", false), None);

        cache.record_string("abc", true, 40);
        assert_eq!(cache.lookup_string("abc", true), Some(40));
        assert_eq!(cache.lookup_string("abc", false), Some(12));
    }

    #[test]
    fn test_read_cache_keys_strings_by_separator() {
        let mut cache = ReadCache::new();
        cache.insert_string(0x4000_0010, Some('/'), Some("a/b".into()));
        assert_eq!(cache.string(0x4000_0010, Some('/')), Some(&Some("a/b".to_string())));
        assert_eq!(cache.string(0x4000_0010, None), None);
    }
}
