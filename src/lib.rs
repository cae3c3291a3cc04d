//! dcmcat: per-directory DICOM metadata catalogs
//!
//! Indexes the files of a directory by their identifying tags, caches the
//! result in JSON catalog documents (hierarchical or flat schema) and keeps
//! the cache in line with the directory as files appear, change or vanish.

pub mod catalog;
pub mod codec;
pub mod config;
pub mod error;
pub mod extract;
pub mod logging;
pub mod record;
pub mod scan;
pub mod tooling;
pub mod types;
pub mod verify;

pub use catalog::{CatalogKind, DirectoryCatalog, ListingDiff, NameFilter, UpdateSummary};
pub use codec::{CatalogCodec, CatalogDocument, FlatCodec, HierarchicalCodec};
pub use error::{CatalogError, ExtractionError, RecordParseError};
pub use extract::{DirectoryLister, FsDirectoryLister, TagExtractor};
pub use record::{FileInfo, FileRecord};
pub use scan::{scan_directory, ScanOptions, ScanReport};
pub use types::{Tag, TagSet};
