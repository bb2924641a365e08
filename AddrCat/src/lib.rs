#![allow(non_snake_case)]
//! # AddrCat
//!
//! A pure-Rust codec for Unity Addressables content catalogs.
//!
//! ## Supported Formats
//!
//! - **Binary catalogs** - offset-addressed object graphs (`catalog.bin`), versions 1 and 2
//! - **JSON catalogs** - named fields with base64 key, bucket, entry and extra-data blobs
//!
//! Both decode to the same [`ContentCatalog`] model and either can be written
//! from it, so a catalog read from one format can be converted to the other.
//!
//! ## Quick Start
//!
//! ### Reading a Catalog
//!
//! ```no_run
//! use addrcat::formats::parse_catalog;
//!
//! let data = std::fs::read("catalog.bin")?;
//! let catalog = parse_catalog(&data)?;
//! for key in catalog.keys() {
//!     println!("{key}: {} locations", catalog.locations_for(key).len());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ### Editing and Re-encoding
//!
//! ```
//! use addrcat::prelude::*;
//!
//! let mut catalog = ContentCatalog::new();
//! let bundle = catalog.add_location(ResourceLocation {
//!     internal_id: Some("Assets/bundle_01".into()),
//!     provider_id: Some("UnityEngine.ResourceManagement.ResourceProviders.AssetBundleProvider".into()),
//!     primary_key: Some("bundle_01".into()),
//!     ..ResourceLocation::default()
//! });
//! catalog.resources.insert("bundle_01".into(), vec![bundle]);
//!
//! let bytes = serialize_catalog_binary(&catalog)?;
//! let decoded = parse_catalog_binary(&bytes)?;
//! assert_eq!(decoded.location_count(), 1);
//! # Ok::<(), addrcat::Error>(())
//! ```

pub mod catalog;
pub mod codec;
pub mod error;
pub mod formats;
pub mod io;

// Re-exports for convenience
pub use catalog::ContentCatalog;
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, Result};

    pub use crate::catalog::{
        AssetBundleRequestOptions, AssetLoadMode, CatalogValue, CommonInfo, CommonInfoVersion,
        ContentCatalog, Hash128, LocationId, ObjectInitializationData, ResourceLocation,
        SerializedType, TextLayout, TypeAssemblies,
    };

    pub use crate::formats::{
        CatalogFileType, detect_catalog_format, parse_catalog, parse_catalog_binary,
        parse_catalog_json, serialize_catalog_binary, serialize_catalog_binary_with,
        serialize_catalog_json,
    };
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
