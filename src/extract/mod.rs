//! Extraction seams: listing a directory and deriving a record from one file.
//!
//! The catalog never reads files itself. It asks a `DirectoryLister` for stat
//! information and a `TagExtractor` for tag sets, so tests and callers can
//! substitute their own implementations.

pub mod header;
pub mod sniff;

pub use header::DatasetHeaderParser;
pub use sniff::{HeaderParser, SniffingExtractor};

use crate::error::{CatalogError, ExtractionError};
use crate::record::{FileInfo, FileRecord};
use chrono::{DateTime, Utc};
use std::path::Path;
use walkdir::WalkDir;

/// Derives an indexed record for `file_name` inside `directory`.
///
/// Must be deterministic for unchanged file content.
pub trait TagExtractor: Send + Sync {
    fn extract(&self, directory: &Path, file_name: &str) -> Result<FileRecord, ExtractionError>;
}

/// Lists the files of one directory with basic stat info.
pub trait DirectoryLister {
    fn list(&self, directory: &Path) -> Result<Vec<FileInfo>, CatalogError>;
}

/// Lists regular files directly inside a directory (no recursion).
#[derive(Debug, Default, Clone, Copy)]
pub struct FsDirectoryLister;

impl DirectoryLister for FsDirectoryLister {
    fn list(&self, directory: &Path) -> Result<Vec<FileInfo>, CatalogError> {
        let meta = std::fs::metadata(directory).map_err(|e| CatalogError::io(directory, e))?;
        if !meta.is_dir() {
            return Err(CatalogError::io(
                directory,
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a directory"),
            ));
        }

        let mut infos = Vec::new();
        for entry in WalkDir::new(directory)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
        {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!("Failed to read entry in {}: {}", directory.display(), e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(file_name) = entry.file_name().to_str() else {
                tracing::warn!("Skipping non UTF-8 file name: {:?}", entry.path());
                continue;
            };
            let metadata = match entry.metadata() {
                Ok(m) => m,
                Err(e) => {
                    tracing::warn!("Failed to stat {}: {}", entry.path().display(), e);
                    continue;
                }
            };
            infos.push(FileInfo::new(
                file_name,
                metadata.len(),
                modified_time(&metadata),
            ));
        }
        Ok(infos)
    }
}

/// Modification time of a file, falling back to the Unix epoch where the
/// platform does not report one.
pub(crate) fn modified_time(metadata: &std::fs::Metadata) -> DateTime<Utc> {
    metadata
        .modified()
        .map(DateTime::<Utc>::from)
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}
