//! Typed object codecs
//!
//! Values are tagged with the runtime type they came from. [`v1`] handles the
//! flat tag-byte encoding inside the JSON catalog's key and extra-data blobs;
//! [`v2`] handles (type, value) offset pairs inside the binary catalog.

pub mod v1;
pub mod v2;

pub use v1::{decode_v1, encode_v1};
pub use v2::{decode_v2, encode_v2};

pub const INT32_CLASS: &str = "System.Int32";
pub const INT64_CLASS: &str = "System.Int64";
pub const BOOL_CLASS: &str = "System.Boolean";
pub const STRING_CLASS: &str = "System.String";
pub const HASH128_CLASS: &str = "UnityEngine.Hash128";
pub const BUNDLE_REQUEST_OPTIONS_CLASS: &str =
    "UnityEngine.ResourceManagement.ResourceProviders.AssetBundleRequestOptions";

pub const INT32_MATCH: &str = "mscorlib; System.Int32";
pub const INT64_MATCH: &str = "mscorlib; System.Int64";
pub const BOOL_MATCH: &str = "mscorlib; System.Boolean";
pub const STRING_MATCH: &str = "mscorlib; System.String";
pub const HASH128_MATCH: &str = "UnityEngine.CoreModule; UnityEngine.Hash128";
pub const BUNDLE_REQUEST_OPTIONS_MATCH: &str =
    "Unity.ResourceManager; UnityEngine.ResourceManagement.ResourceProviders.AssetBundleRequestOptions";
