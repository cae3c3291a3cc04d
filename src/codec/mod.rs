//! Catalog Codecs
//!
//! Two JSON schemas for the same catalog: a hierarchical one grouping DICOM
//! files by their grouping tags, and a flat one listing every file. Both share
//! the `ID`/`version`/`type` header and the per-file block shape.

pub mod flat;
pub mod hierarchical;
pub mod persistence;

pub use flat::FlatCodec;
pub use hierarchical::HierarchicalCodec;
pub use persistence::{load_catalog, remove_catalog, save_catalog};

use crate::catalog::{CatalogKind, DirectoryCatalog};
use crate::error::{CatalogError, RecordParseError};
use crate::record::FileRecord;
use crate::types::{is_grouping_tag, TagSet};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::Path;

/// Value of the `ID` header field.
pub const CATALOG_ID: &str = "purpose: Dicom catalog";

/// Value of the `version` header field.
pub const CATALOG_VERSION: &str = "0.0";

pub const FIELD_ID: &str = "ID";
pub const FIELD_VERSION: &str = "version";
pub const FIELD_TYPE: &str = "type";

/// Encodes and decodes one catalog schema.
pub trait CatalogCodec {
    const KIND: CatalogKind;

    /// Encode the indexed records of `catalog`.
    ///
    /// Returns `None` when there is nothing to write; an empty catalog never
    /// produces a document.
    fn encode(catalog: &DirectoryCatalog) -> Result<Option<CatalogDocument>, CatalogError>;

    /// Rebuild a catalog for `directory` from a document of this schema.
    ///
    /// Header problems abort with `CatalogError::Format`; malformed entries
    /// are logged and skipped.
    fn decode(document: &Value, directory: &Path) -> Result<DirectoryCatalog, CatalogError>;
}

/// An encoded catalog document.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogDocument {
    kind: CatalogKind,
    value: Value,
}

impl CatalogDocument {
    pub fn kind(&self) -> CatalogKind {
        self.kind
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    /// Pretty-printed bytes with a trailing newline.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CatalogError> {
        let mut bytes = serde_json::to_vec_pretty(&self.value)?;
        bytes.push(b'\n');
        Ok(bytes)
    }

    /// Parse bytes and validate the header.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CatalogError> {
        let value: Value = serde_json::from_slice(bytes)?;
        let kind = read_header(&value)?;
        Ok(Self { kind, value })
    }

    /// Decode with the codec matching the document's `type`.
    pub fn decode(&self, directory: &Path) -> Result<DirectoryCatalog, CatalogError> {
        decode_document(&self.value, directory)
    }
}

/// Encode `catalog` with the schema `kind`.
pub fn encode(
    catalog: &DirectoryCatalog,
    kind: CatalogKind,
) -> Result<Option<CatalogDocument>, CatalogError> {
    match kind {
        CatalogKind::Hierarchical => HierarchicalCodec::encode(catalog),
        CatalogKind::Flat => FlatCodec::encode(catalog),
    }
}

/// Decode any catalog document, dispatching on its `type` field.
pub fn decode_document(document: &Value, directory: &Path) -> Result<DirectoryCatalog, CatalogError> {
    match read_header(document)? {
        CatalogKind::Hierarchical => HierarchicalCodec::decode(document, directory),
        CatalogKind::Flat => FlatCodec::decode(document, directory),
    }
}

/// Validate the header and return the schema it names.
pub fn read_header(document: &Value) -> Result<CatalogKind, CatalogError> {
    let object = document
        .as_object()
        .ok_or_else(|| CatalogError::Format("catalog document is not a JSON object".to_string()))?;

    for field in [FIELD_ID, FIELD_VERSION, FIELD_TYPE] {
        match object.get(field) {
            None => {
                return Err(CatalogError::Format(format!(
                    "missing header field '{}'",
                    field
                )))
            }
            Some(Value::String(_)) => {}
            Some(Value::Null) => {
                return Err(CatalogError::Format(format!("header field '{}' is null", field)))
            }
            Some(other) => {
                return Err(CatalogError::Format(format!(
                    "header field '{}' is not a string: {}",
                    field, other
                )))
            }
        }
    }

    let label = object
        .get(FIELD_TYPE)
        .and_then(Value::as_str)
        .unwrap_or_default();
    CatalogKind::from_label(label)
        .ok_or_else(|| CatalogError::Format(format!("unknown catalog type '{}'", label)))
}

/// Fresh document object holding the header of `kind`.
fn header(kind: CatalogKind) -> Map<String, Value> {
    let mut object = Map::new();
    object.insert(FIELD_ID.to_string(), Value::from(CATALOG_ID));
    object.insert(FIELD_VERSION.to_string(), Value::from(CATALOG_VERSION));
    object.insert(FIELD_TYPE.to_string(), Value::from(kind.label()));
    object
}

/// Records to persist, in byte-wise file name order.
///
/// Records still waiting for reindexing are left out: their cached tags are
/// not authoritative.
fn encodable_records(catalog: &DirectoryCatalog) -> Vec<&FileRecord> {
    let records: Vec<&FileRecord> = catalog
        .sorted_records()
        .into_iter()
        .filter(|r| !r.needs_indexing)
        .collect();
    let skipped = catalog.len() - records.len();
    if skipped > 0 {
        tracing::debug!(
            "Leaving {} pending records of {} out of the catalog document",
            skipped,
            catalog.path().display()
        );
    }
    records
}

/// Per-file block shared by both schemas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileBlock {
    pub filename: String,
    pub size: u64,
    pub modified_time: DateTime<Utc>,
    /// Present for DICOM files only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<TagSet>,
}

impl FileBlock {
    /// Block carrying all tags of `record`.
    pub fn from_record(record: &FileRecord) -> Self {
        Self {
            filename: record.file_name().to_string(),
            size: record.size,
            modified_time: record.modified_time,
            tags: record.tags().cloned(),
        }
    }

    /// Block for a hierarchical leaf: grouping tags live in the tree path.
    pub fn without_grouping_tags(record: &FileRecord) -> Self {
        let mut block = Self::from_record(record);
        if let Some(tags) = block.tags.as_mut() {
            tags.retain(|tag, _| !is_grouping_tag(*tag));
        }
        block
    }

    pub fn into_record(self) -> FileRecord {
        match self.tags {
            Some(tags) => FileRecord::dicom(self.filename, self.size, self.modified_time, tags),
            None => FileRecord::non_dicom(self.filename, self.size, self.modified_time),
        }
    }
}

/// Collects decoded records while rejecting duplicate file names.
struct RecordSink {
    catalog: DirectoryCatalog,
    seen: HashSet<String>,
    skipped: usize,
}

impl RecordSink {
    fn new(directory: &Path) -> Self {
        let mut catalog = DirectoryCatalog::new(directory);
        catalog.set_needs_indexing(false);
        Self {
            catalog,
            seen: HashSet::new(),
            skipped: 0,
        }
    }

    fn push(&mut self, location: &str, record: FileRecord) {
        if !self.seen.insert(record.file_name().to_string()) {
            self.skip(RecordParseError::new(
                location,
                format!("duplicate entry for {}", record.file_name()),
            ));
            return;
        }
        self.catalog.add_file_index(record);
    }

    fn skip(&mut self, error: RecordParseError) {
        tracing::warn!("{}", error);
        self.skipped += 1;
    }

    /// Decode an array of flat per-file blocks.
    fn push_blocks(&mut self, field: &str, blocks: &[Value]) {
        for (i, element) in blocks.iter().enumerate() {
            let location = format!("{}[{}]", field, i);
            match FileBlock::deserialize(element) {
                Ok(block) => self.push(&location, block.into_record()),
                Err(e) => self.skip(RecordParseError::new(location, e)),
            }
        }
    }

    fn finish(self) -> DirectoryCatalog {
        if self.skipped > 0 {
            tracing::warn!(
                "Skipped {} malformed entries while decoding catalog of {}",
                self.skipped,
                self.catalog.path().display()
            );
        }
        self.catalog
    }
}

/// Optional array section: absent means empty, null or non-array is a format error.
fn optional_array<'a>(document: &'a Value, field: &str) -> Result<&'a [Value], CatalogError> {
    match document.get(field) {
        None => Ok(&[]),
        Some(Value::Array(items)) => Ok(items),
        Some(Value::Null) => Err(CatalogError::Format(format!("field '{}' is null", field))),
        Some(_) => Err(CatalogError::Format(format!("field '{}' is not an array", field))),
    }
}
