//! Scan session for one directory: list, reuse the cached catalog, reindex, persist.

use crate::catalog::{CatalogKind, DirectoryCatalog, ListingDiff, UpdateSummary};
use crate::codec::{load_catalog, remove_catalog, save_catalog};
use crate::config::CatalogConfig;
use crate::error::CatalogError;
use crate::extract::{DirectoryLister, TagExtractor};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Options for `scan_directory`.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub config: CatalogConfig,
    /// Write catalog documents after reindexing
    pub save: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            config: CatalogConfig::default(),
            save: true,
        }
    }
}

/// What a scan did.
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    pub listed: usize,
    /// Catalog document the cached state was taken from
    pub reused: Option<CatalogKind>,
    pub listing: ListingDiff,
    pub update: UpdateSummary,
    pub written: Vec<PathBuf>,
    /// Documents of disabled kinds deleted by this scan
    pub removed: Vec<PathBuf>,
}

/// Build an up-to-date catalog for `directory`.
///
/// When a catalog document is present its records are reused and only files
/// that are new or whose stat changed are reindexed. A document that cannot
/// be read is ignored and the directory is indexed from scratch.
pub fn scan_directory(
    directory: &Path,
    lister: &dyn DirectoryLister,
    extractor: &dyn TagExtractor,
    options: &ScanOptions,
) -> Result<(DirectoryCatalog, ScanReport), CatalogError> {
    let filter = options.config.scan.name_filter();
    let infos = lister.list(directory)?;
    let mut report = ScanReport {
        listed: infos.len(),
        ..ScanReport::default()
    };

    let mut fresh = DirectoryCatalog::new(directory);
    if !fresh.fill_from_fileinfo_filtered(directory, &infos, &filter) {
        debug!("Nothing to catalog in {}", directory.display());
    }

    let mut catalog = match reuse_cached(&fresh) {
        Some((kind, mut cached)) => {
            report.listing = cached.reconcile_listing(&infos, &filter);
            report.reused = Some(kind);
            debug!(
                "Reusing {} catalog of {}: {:?}",
                kind,
                directory.display(),
                report.listing
            );
            cached.set_path(directory);
            cached
        }
        None => {
            report.listing.added = fresh.len();
            fresh
        }
    };

    report.update = catalog.update_with(extractor, &options.config.update);

    if options.save {
        let persist = &options.config.persist;
        for (kind, enabled) in [
            (CatalogKind::Hierarchical, persist.write_hierarchical),
            (CatalogKind::Flat, persist.write_flat),
        ] {
            if !enabled {
                // disabled kinds keep no document on disk
                if remove_catalog(&catalog, kind)? {
                    report.removed.push(catalog.path().join(kind.file_name()));
                }
                catalog.set_catalog_file(kind, None);
                continue;
            }
            if let Some(path) = save_catalog(&catalog, kind)? {
                catalog.set_catalog_file(kind, Some(kind.file_name().to_string()));
                report.written.push(path);
            } else {
                catalog.set_catalog_file(kind, None);
            }
        }
    }

    info!(
        "Cataloged {}: {} records ({} reindexed, {} dropped)",
        directory.display(),
        catalog.len(),
        report.update.reindexed,
        report.update.dropped
    );
    Ok((catalog, report))
}

/// Load the first readable catalog document referenced by `listed`.
fn reuse_cached(listed: &DirectoryCatalog) -> Option<(CatalogKind, DirectoryCatalog)> {
    for kind in CatalogKind::ALL {
        let Some(path) = listed.catalog_file_path(kind) else {
            continue;
        };
        match load_catalog(&path) {
            Ok(mut cached) => {
                for other in CatalogKind::ALL {
                    cached.set_catalog_file(other, listed.catalog_file(other).map(str::to_string));
                }
                return Some((kind, cached));
            }
            Err(e) => warn!("Ignoring unreadable catalog {}: {}", path.display(), e),
        }
    }
    None
}
