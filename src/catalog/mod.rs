//! Directory Catalog
//!
//! Cached metadata for the files of one directory, plus references to catalog
//! documents previously written there. Persistence always goes through a codec;
//! the catalog itself is an in-memory aggregate.

pub mod naming;
pub mod reconcile;

pub use naming::{may_be_dicom_filename, CatalogKind, NameFilter};
pub use reconcile::UpdateSummary;

use crate::record::{FileInfo, FileRecord};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// File records of one directory, keyed by unique file name.
#[derive(Debug, Clone)]
pub struct DirectoryCatalog {
    path: PathBuf,
    hierarchical_file: Option<String>,
    flat_file: Option<String>,
    needs_indexing: bool,
    records: Vec<FileRecord>,
}

/// Outcome of `DirectoryCatalog::reconcile_listing`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingDiff {
    pub added: usize,
    pub changed: usize,
    pub removed: usize,
}

impl ListingDiff {
    pub fn is_unchanged(&self) -> bool {
        self.added == 0 && self.changed == 0 && self.removed == 0
    }
}

impl Default for DirectoryCatalog {
    fn default() -> Self {
        Self::new(PathBuf::new())
    }
}

impl DirectoryCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            hierarchical_file: None,
            flat_file: None,
            needs_indexing: true,
            records: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.path = path.into();
    }

    /// Whether the catalog as a whole still has to be reconciled.
    pub fn needs_indexing(&self) -> bool {
        self.needs_indexing
    }

    pub fn set_needs_indexing(&mut self, value: bool) {
        self.needs_indexing = value;
    }

    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FileRecord> {
        self.records.iter()
    }

    pub fn get(&self, file_name: &str) -> Option<&FileRecord> {
        self.records.iter().find(|r| r.file_name() == file_name)
    }

    pub fn pending_count(&self) -> usize {
        self.records.iter().filter(|r| r.needs_indexing).count()
    }

    /// Name of the catalog document of `kind` seen in this directory.
    pub fn catalog_file(&self, kind: CatalogKind) -> Option<&str> {
        match kind {
            CatalogKind::Hierarchical => self.hierarchical_file.as_deref(),
            CatalogKind::Flat => self.flat_file.as_deref(),
        }
    }

    pub fn set_catalog_file(&mut self, kind: CatalogKind, file_name: Option<String>) {
        match kind {
            CatalogKind::Hierarchical => self.hierarchical_file = file_name,
            CatalogKind::Flat => self.flat_file = file_name,
        }
    }

    /// Full path of the catalog document of `kind`, if one was seen.
    pub fn catalog_file_path(&self, kind: CatalogKind) -> Option<PathBuf> {
        self.catalog_file(kind).map(|name| self.path.join(name))
    }

    pub fn hierarchical_catalog_path(&self) -> Option<PathBuf> {
        self.catalog_file_path(CatalogKind::Hierarchical)
    }

    pub fn flat_catalog_path(&self) -> Option<PathBuf> {
        self.catalog_file_path(CatalogKind::Flat)
    }

    fn has_catalog_files(&self) -> bool {
        self.hierarchical_file.is_some() || self.flat_file.is_some()
    }

    /// Populate from a directory listing with the built-in name filter.
    ///
    /// Reserved catalog files become catalog-file references, implausible
    /// names are skipped, everything else becomes a pending record. Returns
    /// whether anything was found.
    pub fn fill_from_fileinfo(&mut self, path: impl Into<PathBuf>, file_infos: &[FileInfo]) -> bool {
        self.fill_from_fileinfo_filtered(path, file_infos, &NameFilter::default())
    }

    pub fn fill_from_fileinfo_filtered(
        &mut self,
        path: impl Into<PathBuf>,
        file_infos: &[FileInfo],
        filter: &NameFilter,
    ) -> bool {
        self.path = path.into();
        for info in file_infos {
            if let Some(kind) = CatalogKind::from_file_name(&info.file_name) {
                self.set_catalog_file(kind, Some(info.file_name.clone()));
                continue;
            }
            if !filter.may_be_dicom(&info.file_name) {
                continue;
            }
            self.records.push(FileRecord::pending(info.clone()));
        }
        !self.records.is_empty() || self.has_catalog_files()
    }

    /// Append a record.
    ///
    /// The caller guarantees that no record with the same file name is
    /// already present.
    pub fn add_file_index(&mut self, record: FileRecord) {
        self.records.push(record);
    }

    /// Drop all records and release their storage.
    pub fn clear(&mut self) {
        self.records.clear();
        self.records.shrink_to_fit();
    }

    /// Whether every record of `self` has a matching record in `other`.
    ///
    /// Directional: `a.is_equal(&b)` does not imply `b.is_equal(&a)`. Stat
    /// fields and indexing flags are not compared.
    pub fn is_equal(&self, other: &DirectoryCatalog) -> bool {
        self.records
            .iter()
            .all(|mine| other.records.iter().any(|theirs| mine.same_entry(theirs)))
    }

    /// `is_equal` checked in both directions.
    pub fn is_equivalent(&self, other: &DirectoryCatalog) -> bool {
        self.is_equal(other) && other.is_equal(self)
    }

    /// Records in byte-wise order of their UTF-8 file names.
    pub fn sorted_records(&self) -> Vec<&FileRecord> {
        let mut sorted: Vec<&FileRecord> = self.records.iter().collect();
        sorted.sort_by(|a, b| a.file_name().as_bytes().cmp(b.file_name().as_bytes()));
        sorted
    }

    /// Bring a catalog decoded from disk in line with the live listing.
    ///
    /// Records of vanished files are dropped, records whose size or
    /// modification time changed are flagged for reindexing with the new stat,
    /// and new plausible files are appended as pending records.
    pub fn reconcile_listing(&mut self, file_infos: &[FileInfo], filter: &NameFilter) -> ListingDiff {
        let mut diff = ListingDiff::default();
        let mut listed: HashMap<&str, &FileInfo> = HashMap::new();
        for info in file_infos {
            if let Some(kind) = CatalogKind::from_file_name(&info.file_name) {
                self.set_catalog_file(kind, Some(info.file_name.clone()));
            } else if filter.may_be_dicom(&info.file_name) {
                listed.insert(info.file_name.as_str(), info);
            }
        }

        let before = self.records.len();
        self.records
            .retain(|record| listed.contains_key(record.file_name()));
        diff.removed = before - self.records.len();

        let mut known: HashSet<String> = HashSet::with_capacity(self.records.len());
        for record in &mut self.records {
            if let Some(info) = listed.get(record.file_name()) {
                if record.is_stale_against(info) {
                    record.size = info.size;
                    record.modified_time = info.modified_time;
                    record.needs_indexing = true;
                    diff.changed += 1;
                }
            }
            known.insert(record.file_name().to_string());
        }

        for info in file_infos {
            if listed.contains_key(info.file_name.as_str()) && known.insert(info.file_name.clone())
            {
                self.records.push(FileRecord::pending(info.clone()));
                diff.added += 1;
            }
        }

        if !diff.is_unchanged() {
            self.needs_indexing = true;
        }
        diff
    }
}

impl<'a> IntoIterator for &'a DirectoryCatalog {
    type Item = &'a FileRecord;
    type IntoIter = std::slice::Iter<'a, FileRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
