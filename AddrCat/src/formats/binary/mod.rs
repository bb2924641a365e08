//! Binary content catalog format
//!
//! An offset-addressed object graph: every object is referenced by its
//! absolute byte offset, and identical objects are stored once.

mod header;
mod reader;
mod writer;

pub use header::{CATALOG_MAGIC, CatalogHeader, HEADER_SIZE, REVERSED_CATALOG_MAGIC};
pub use reader::parse_catalog_binary;
pub use writer::{serialize_catalog_binary, serialize_catalog_binary_with};
