use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use dcmcat::extract::{DatasetHeaderParser, SniffingExtractor};
use dcmcat::types::{MODALITY, PATIENT_ID, SERIES_INSTANCE_UID};
use dcmcat::verify::{verify, verify_on_disk};
use dcmcat::{
    scan_directory, CatalogKind, DirectoryLister, ExtractionError, FileRecord, FsDirectoryLister,
    ScanOptions, TagExtractor,
};
use tempfile::TempDir;

use crate::integration::support::series_file;

/// Counts extractions and delegates to the real sniffer.
struct CountingExtractor {
    inner: SniffingExtractor<DatasetHeaderParser>,
    calls: AtomicUsize,
}

impl CountingExtractor {
    fn new() -> Self {
        Self {
            inner: SniffingExtractor::new(DatasetHeaderParser),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TagExtractor for CountingExtractor {
    fn extract(&self, directory: &Path, file_name: &str) -> Result<FileRecord, ExtractionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.extract(directory, file_name)
    }
}

fn populate(dir: &Path) {
    fs::write(dir.join("IM0001"), series_file("P1", "1.2.3.1")).unwrap();
    fs::write(dir.join("IM0002"), series_file("P1", "1.2.3.1")).unwrap();
    fs::write(dir.join("IM0003"), series_file("P2", "1.2.3.9")).unwrap();
    fs::write(dir.join("scanner.log"), "exported 3 images\n").unwrap();
    fs::write(dir.join("notes"), "no preamble here").unwrap();
}

#[test]
fn scan_indexes_and_persists_both_documents() {
    let temp = TempDir::new().unwrap();
    populate(temp.path());
    let extractor = CountingExtractor::new();

    let (catalog, report) =
        scan_directory(temp.path(), &FsDirectoryLister, &extractor, &ScanOptions::default())
            .unwrap();

    // scanner.log is filtered by extension
    assert_eq!(catalog.len(), 4);
    assert_eq!(extractor.calls(), 4);
    assert_eq!(report.written.len(), 2);
    assert!(temp.path().join("type1.jcatalog").is_file());
    assert!(temp.path().join("type2.jcatalog").is_file());
    assert_eq!(catalog.catalog_file(CatalogKind::Flat), Some("type2.jcatalog"));

    let image = catalog.get("IM0003").unwrap();
    assert!(image.is_dicom());
    assert_eq!(image.tag_value(PATIENT_ID), Some("P2"));
    assert_eq!(image.tag_value(SERIES_INSTANCE_UID), Some("1.2.3.9"));
    assert_eq!(image.tag_value(MODALITY), Some("MR"));
    assert!(!catalog.get("notes").unwrap().is_dicom());
    assert!(verify(&catalog));
}

#[test]
fn rescan_reuses_cached_catalog() {
    let temp = TempDir::new().unwrap();
    populate(temp.path());

    let first = CountingExtractor::new();
    scan_directory(temp.path(), &FsDirectoryLister, &first, &ScanOptions::default()).unwrap();

    let second = CountingExtractor::new();
    let (catalog, report) =
        scan_directory(temp.path(), &FsDirectoryLister, &second, &ScanOptions::default()).unwrap();

    assert_eq!(second.calls(), 0);
    assert_eq!(report.reused, Some(CatalogKind::Hierarchical));
    assert!(report.listing.is_unchanged());
    assert_eq!(catalog.len(), 4);
    assert_eq!(catalog.get("IM0001").unwrap().tag_value(PATIENT_ID), Some("P1"));
}

#[test]
fn deleted_and_added_files_are_reconciled() {
    let temp = TempDir::new().unwrap();
    populate(temp.path());
    scan_directory(
        temp.path(),
        &FsDirectoryLister,
        &CountingExtractor::new(),
        &ScanOptions::default(),
    )
    .unwrap();

    fs::remove_file(temp.path().join("IM0002")).unwrap();
    fs::write(temp.path().join("IM0004"), series_file("P3", "1.2.3.4")).unwrap();

    let extractor = CountingExtractor::new();
    let (catalog, report) =
        scan_directory(temp.path(), &FsDirectoryLister, &extractor, &ScanOptions::default())
            .unwrap();

    assert_eq!(report.listing.removed, 1);
    assert_eq!(report.listing.added, 1);
    assert_eq!(extractor.calls(), 1);
    assert!(catalog.get("IM0002").is_none());
    assert_eq!(catalog.get("IM0004").unwrap().tag_value(PATIENT_ID), Some("P3"));

    let on_disk = fs::read_to_string(temp.path().join("type2.jcatalog")).unwrap();
    assert!(!on_disk.contains("IM0002"));
    assert!(on_disk.contains("IM0004"));
}

#[test]
fn file_vanishing_before_reindex_is_dropped() {
    let temp = TempDir::new().unwrap();
    populate(temp.path());

    let infos = FsDirectoryLister.list(temp.path()).unwrap();
    fs::remove_file(temp.path().join("IM0001")).unwrap();

    let mut catalog = dcmcat::DirectoryCatalog::default();
    assert!(catalog.fill_from_fileinfo(temp.path(), &infos));
    let summary = catalog.update(&SniffingExtractor::new(DatasetHeaderParser));

    assert_eq!(summary.dropped, 1);
    assert!(catalog.get("IM0001").is_none());
    assert_eq!(catalog.pending_count(), 0);
    assert!(!catalog.needs_indexing());
}

#[test]
fn unreadable_cached_document_is_ignored() {
    let temp = TempDir::new().unwrap();
    populate(temp.path());
    fs::write(temp.path().join("type1.jcatalog"), "{\"ID\": null}").unwrap();

    let extractor = CountingExtractor::new();
    let (catalog, report) =
        scan_directory(temp.path(), &FsDirectoryLister, &extractor, &ScanOptions::default())
            .unwrap();

    assert!(report.reused.is_none());
    assert_eq!(extractor.calls(), 4);
    assert_eq!(catalog.len(), 4);
    // rewritten with valid content
    let rewritten = fs::read(temp.path().join("type1.jcatalog")).unwrap();
    assert!(dcmcat::CatalogDocument::from_slice(&rewritten).is_ok());
}

#[test]
fn on_disk_verification_round_trips_through_files() {
    let temp = TempDir::new().unwrap();
    populate(temp.path());
    let options = ScanOptions {
        save: false,
        ..ScanOptions::default()
    };
    let (catalog, _) = scan_directory(
        temp.path(),
        &FsDirectoryLister,
        &CountingExtractor::new(),
        &options,
    )
    .unwrap();

    assert!(!temp.path().join("type1.jcatalog").exists());
    assert!(verify_on_disk(&catalog));
    assert!(temp.path().join("type1.jcatalog").is_file());

    let detached = dcmcat::DirectoryCatalog::default();
    assert!(verify_on_disk(&detached));
}

#[test]
fn disabled_schema_is_not_reused_after_it_goes_stale() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("IM0001"), series_file("P1", "1.2.3.1")).unwrap();
    scan_directory(
        temp.path(),
        &FsDirectoryLister,
        &CountingExtractor::new(),
        &ScanOptions::default(),
    )
    .unwrap();
    assert!(temp.path().join("type1.jcatalog").is_file());

    let mut options = ScanOptions::default();
    options.config.persist.write_hierarchical = false;
    fs::write(temp.path().join("IM0002"), series_file("P1", "1.2.3.1")).unwrap();

    let second = CountingExtractor::new();
    let (_, report) = scan_directory(temp.path(), &FsDirectoryLister, &second, &options).unwrap();
    assert_eq!(second.calls(), 1);
    assert_eq!(report.removed, vec![temp.path().join("type1.jcatalog")]);
    assert!(!temp.path().join("type1.jcatalog").exists());

    for _ in 0..2 {
        let extractor = CountingExtractor::new();
        let (catalog, report) =
            scan_directory(temp.path(), &FsDirectoryLister, &extractor, &options).unwrap();
        assert_eq!(extractor.calls(), 0);
        assert_eq!(report.reused, Some(CatalogKind::Flat));
        assert!(report.removed.is_empty());
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.catalog_file(CatalogKind::Hierarchical), None);
    }
}
