//! Error types for `AddrCat`

use thiserror::Error;

/// The error type for catalog decode/encode operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from the in-memory cursor (reading past the end of the buffer
    /// surfaces as `UnexpectedEof`).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== Binary Header Errors ====================
    /// The buffer does not start with the binary catalog magic.
    #[error("invalid catalog magic: {0:#010x}")]
    InvalidCatalogMagic(u32),

    /// The magic is byte-reversed, i.e. the catalog was written big-endian.
    #[error("unsupported byte order: big endian catalogs are not supported")]
    UnsupportedByteOrder,

    /// The binary header version is not one we know how to read.
    #[error("unsupported catalog version: {version} (supported: 1-2)")]
    UnsupportedCatalogVersion {
        /// The version number found in the header.
        version: i32,
    },

    /// The catalog was decoded from a binary version that cannot be written.
    #[error("cannot write catalog version {version}: only version 2 catalogs can be written")]
    UnsupportedWriteVersion {
        /// The version of the source catalog.
        version: i32,
    },

    // ==================== Offset Graph Errors ====================
    /// An offset array's byte length is not a multiple of 4.
    #[error("offset array at {offset:#x} has invalid byte length {byte_len}")]
    InvalidOffsetArrayLength {
        /// The offset of the array's first element.
        offset: u32,
        /// The byte length read from the length prefix.
        byte_len: i32,
    },

    /// A length prefix is negative.
    #[error("negative length {len} at offset {offset:#x}")]
    NegativeLength {
        /// The offset of the length prefix.
        offset: u64,
        /// The length read.
        len: i32,
    },

    /// A string reference points at an invalid offset or a chain that never ends.
    #[error("malformed string at offset {offset:#x}")]
    MalformedString {
        /// The offset of the string or chain node.
        offset: u32,
    },

    /// A location transitively depends on itself and cannot be laid out.
    #[error("cyclic dependency through location '{internal_id}'")]
    CyclicDependency {
        /// Internal id of the location where the cycle was detected.
        internal_id: String,
    },

    // ==================== Typed Object Errors ====================
    /// A serialized type descriptor does not match any supported type.
    #[error("unsupported type for deserialization: {match_name}")]
    UnsupportedType {
        /// The "assembly; class" match name.
        match_name: String,
    },

    /// A value kind cannot be written by the given object codec.
    #[error("{kind} values cannot be encoded by the {codec} object codec")]
    UnsupportedValue {
        /// The value kind that was rejected.
        kind: &'static str,
        /// The codec that rejected it ("V1" or "V2").
        codec: &'static str,
    },

    /// A V1 object starts with an unknown type tag.
    #[error("unknown object type tag: {0}")]
    UnknownObjectTag(u8),

    /// An assembly name has no comma-separated short name.
    #[error("assembly name must contain a comma: '{0}'")]
    InvalidAssemblyName(String),

    /// A content hash is not 32 hex digits.
    #[error("invalid Hash128 value: '{0}'")]
    InvalidHash128(String),

    /// A single-byte length-prefixed string exceeds 255 bytes.
    #[error("string length {len} cannot be greater than 255")]
    StringTooLong {
        /// The byte length of the string.
        len: usize,
    },

    /// The JSON payload of a known composite type is malformed.
    #[error("invalid {type_name} JSON payload: {message}")]
    InvalidObjectJson {
        /// The class that was being decoded.
        type_name: &'static str,
        /// What was wrong with it.
        message: String,
    },

    // ==================== Catalog Graph Errors ====================
    /// A required string field is null.
    #[error("required field '{field}' is null")]
    MissingField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// A key in the key map decoded as null.
    #[error("resource key is null")]
    NullKey,

    /// A location references a key that is not in the catalog.
    #[error("key '{0}' is not present in the catalog")]
    UnknownKey(String),

    /// An index into one of the text format's tables is out of range.
    #[error("index {index} out of range for {table}")]
    IndexOutOfRange {
        /// The table being indexed.
        table: &'static str,
        /// The bad index.
        index: i64,
    },

    /// An internal id uses a prefix index that cannot be parsed.
    #[error("invalid internal id prefix reference: '{0}'")]
    InvalidInternalIdPrefix(String),

    /// A location carries a dependency list, which the text format cannot hold.
    #[error("location dependency lists cannot be written to the JSON catalog format")]
    DependencyListInTextFormat,

    // ==================== Parsing Errors ====================
    /// The source is neither a binary nor a JSON catalog.
    #[error("unrecognized catalog format")]
    UnrecognizedFormat,

    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Base64 decoding error in one of the blob sections.
    #[error("base64 error: {0}")]
    Base64Error(#[from] base64::DecodeError),

    /// UTF-8 conversion error.
    #[error("UTF-8 conversion error: {0}")]
    Utf8Error(#[from] std::str::Utf8Error),
}

/// A specialized Result type for `AddrCat` operations.
pub type Result<T> = std::result::Result<T, Error>;
