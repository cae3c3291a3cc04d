//! Reserved catalog file names and filename plausibility checks.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Base name shared by both catalog documents.
pub const CATALOG_BASE_NAME: &str = "type";

/// Extension shared by both catalog documents.
pub const CATALOG_EXTENSION: &str = "jcatalog";

/// Extensions that never hold DICOM data.
const NON_DICOM_EXTENSIONS: &[&str] = &[
    "txt", "log", "ini", "cfg", "xml", "json", "html", "htm", "csv", "md", "pdf", "doc", "docx",
    "xls", "xlsx", "ppt", "pptx", "rtf", "zip", "rar", "7z", "gz", "tar", "bz2", "exe", "dll",
    "so", "dylib", "bat", "cmd", "sh", "jpg", "jpeg", "png", "gif", "bmp", "tif", "tiff", "avi",
    "mp4", "mov", "mkv", "wav", "mp3", "lnk", "db",
];

/// Schema of a catalog document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogKind {
    /// Records grouped into a tree keyed by the grouping tags.
    Hierarchical,
    /// One flat list of per-file blocks.
    Flat,
}

impl CatalogKind {
    pub const ALL: [CatalogKind; 2] = [CatalogKind::Hierarchical, CatalogKind::Flat];

    /// Value of the document `type` discriminator.
    pub fn label(self) -> &'static str {
        match self {
            CatalogKind::Hierarchical => "hierarchical",
            CatalogKind::Flat => "flat",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.label() == label)
    }

    /// Canonical file name of this document inside the catalogued directory.
    pub fn file_name(self) -> &'static str {
        match self {
            CatalogKind::Hierarchical => "type1.jcatalog",
            CatalogKind::Flat => "type2.jcatalog",
        }
    }

    /// Which reserved catalog file `file_name` is, if any.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.file_name() == file_name)
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Decides which listed files are worth handing to the tag extractor.
#[derive(Debug, Clone, Default)]
pub struct NameFilter {
    extra_ignored_extensions: Vec<String>,
}

impl NameFilter {
    pub fn new(extra_ignored_extensions: &[String]) -> Self {
        Self {
            extra_ignored_extensions: extra_ignored_extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        }
    }

    /// Whether `file_name` could plausibly be a DICOM file.
    ///
    /// DICOM files frequently carry no extension at all, so only names known
    /// to belong to other formats are rejected.
    pub fn may_be_dicom(&self, file_name: &str) -> bool {
        if file_name.is_empty() || file_name.starts_with('.') {
            return false;
        }
        let Some((_, ext)) = file_name.rsplit_once('.') else {
            return true;
        };
        let ext = ext.to_ascii_lowercase();
        !NON_DICOM_EXTENSIONS.contains(&ext.as_str())
            && !self.extra_ignored_extensions.iter().any(|e| *e == ext)
    }
}

/// `NameFilter::may_be_dicom` with the built-in extension list only.
pub fn may_be_dicom_filename(file_name: &str) -> bool {
    NameFilter::default().may_be_dicom(file_name)
}
