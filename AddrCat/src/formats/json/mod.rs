//! JSON catalog format module
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

mod document;
mod reader;
mod writer;

pub use document::{ContentCatalogDataJson, ObjectInitializationDataJson, SerializedTypeJson};
pub use reader::{parse_catalog_json, read_catalog_document};
pub use writer::{serialize_catalog_json, write_catalog_document};
