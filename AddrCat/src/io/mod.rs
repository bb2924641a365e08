//! Low-level buffer access for the binary catalog format
//!
//! Cursor and sink primitives, the string encodings, and the per-invocation
//! reader/writer contexts that pair them with their deduplication caches.

pub mod cache;
pub mod cursor;
pub mod reader;
pub mod sink;
pub mod strings;
pub mod writer;

pub use cache::{ReadCache, WriteCache};
pub use cursor::ByteCursor;
pub use reader::CatalogBinaryReader;
pub use sink::ByteSink;
pub use strings::NULL_OFFSET;
pub use writer::CatalogBinaryWriter;
