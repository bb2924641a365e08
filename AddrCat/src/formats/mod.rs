//! Physical catalog formats
//!
//! The same [`ContentCatalog`](crate::catalog::ContentCatalog) model is read
//! from and written to both the binary offset-graph format and the JSON
//! format with base64 blob sections.

pub mod binary;
pub mod detect;
pub mod json;

pub use binary::{parse_catalog_binary, serialize_catalog_binary, serialize_catalog_binary_with};
pub use detect::{CatalogFileType, detect_catalog_format, parse_catalog};
pub use json::{ContentCatalogDataJson, parse_catalog_json, serialize_catalog_json};
