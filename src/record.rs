//! File records: the cached metadata for one file of a directory.

use crate::types::{Tag, TagSet, GROUPING_DEPTH, GROUPING_TAGS};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Listing entry for one file, as produced by a `DirectoryLister`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    pub file_name: String,
    pub size: u64,
    pub modified_time: DateTime<Utc>,
}

impl FileInfo {
    pub fn new(file_name: impl Into<String>, size: u64, modified_time: DateTime<Utc>) -> Self {
        Self {
            file_name: file_name.into(),
            size,
            modified_time,
        }
    }
}

/// Cached metadata for one file.
///
/// `tags` is `Some` exactly when the file was classified as DICOM and its tag
/// set extracted. A DICOM record always carries every grouping tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    file_name: String,
    tags: Option<TagSet>,
    pub size: u64,
    pub modified_time: DateTime<Utc>,
    pub needs_indexing: bool,
}

impl FileRecord {
    /// Record for a listed file whose tags have not been read yet.
    pub fn pending(info: FileInfo) -> Self {
        Self {
            file_name: info.file_name,
            tags: None,
            size: info.size,
            modified_time: info.modified_time,
            needs_indexing: true,
        }
    }

    /// Indexed DICOM record. Missing grouping tags are stored as empty values.
    pub fn dicom(
        file_name: impl Into<String>,
        size: u64,
        modified_time: DateTime<Utc>,
        mut tags: TagSet,
    ) -> Self {
        for tag in GROUPING_TAGS {
            tags.entry(tag).or_default();
        }
        Self {
            file_name: file_name.into(),
            tags: Some(tags),
            size,
            modified_time,
            needs_indexing: false,
        }
    }

    /// Indexed record for a readable file that is not DICOM.
    pub fn non_dicom(file_name: impl Into<String>, size: u64, modified_time: DateTime<Utc>) -> Self {
        Self {
            file_name: file_name.into(),
            tags: None,
            size,
            modified_time,
            needs_indexing: false,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn is_dicom(&self) -> bool {
        self.tags.is_some()
    }

    pub fn tags(&self) -> Option<&TagSet> {
        self.tags.as_ref()
    }

    pub fn tag_value(&self, tag: Tag) -> Option<&str> {
        self.tags.as_ref()?.get(&tag).map(String::as_str)
    }

    /// Grouping tag values in index order; `None` for non-DICOM records.
    pub fn grouping_values(&self) -> Option<[&str; GROUPING_DEPTH]> {
        let tags = self.tags.as_ref()?;
        Some(GROUPING_TAGS.map(|tag| tags.get(&tag).map(String::as_str).unwrap_or("")))
    }

    /// Identity used by catalog comparison: name, classification and tags.
    /// Stat fields and the indexing flag are not compared.
    pub fn same_entry(&self, other: &FileRecord) -> bool {
        self.file_name == other.file_name && self.tags == other.tags
    }

    /// Whether the listed stat differs from the cached one.
    pub fn is_stale_against(&self, info: &FileInfo) -> bool {
        self.size != info.size || self.modified_time != info.modified_time
    }
}
