//! Reading and writing catalog documents inside the catalogued directory.

use super::{encode, CatalogDocument};
use crate::catalog::{CatalogKind, DirectoryCatalog};
use crate::error::CatalogError;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Write the `kind` document of `catalog` to its canonical file.
///
/// Returns the written path, or `None` when the catalog had nothing to write.
/// In that case a previously seen document of the same kind is removed so it
/// cannot be mistaken for the current state.
pub fn save_catalog(
    catalog: &DirectoryCatalog,
    kind: CatalogKind,
) -> Result<Option<PathBuf>, CatalogError> {
    let target = catalog.path().join(kind.file_name());

    let Some(document) = encode(catalog, kind)? else {
        remove_catalog(catalog, kind)?;
        return Ok(None);
    };

    write_atomically(&target, &document.to_bytes()?)?;
    debug!(
        "Wrote {} catalog with {} records to {}",
        kind,
        catalog.len(),
        target.display()
    );
    Ok(Some(target))
}

/// Delete the `kind` document referenced by `catalog`, if any.
///
/// Returns whether a file was removed.
pub fn remove_catalog(catalog: &DirectoryCatalog, kind: CatalogKind) -> Result<bool, CatalogError> {
    if catalog.catalog_file(kind).is_none() {
        return Ok(false);
    }
    let target = catalog.path().join(kind.file_name());
    match fs::remove_file(&target) {
        Ok(()) => {
            info!("Removed stale catalog {}", target.display());
            Ok(true)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(CatalogError::io(&target, e)),
    }
}

/// Read a catalog document of either schema.
///
/// The resulting catalog is rooted at the document's directory and references
/// the document it came from.
pub fn load_catalog(file: &Path) -> Result<DirectoryCatalog, CatalogError> {
    let bytes = fs::read(file).map_err(|e| CatalogError::io(file, e))?;
    let document = CatalogDocument::from_slice(&bytes)?;
    let directory = file.parent().unwrap_or_else(|| Path::new(""));

    let mut catalog = document.decode(directory)?;
    let file_name = file
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string);
    catalog.set_catalog_file(document.kind(), file_name);
    Ok(catalog)
}

/// Replace `target` through a hidden sibling so readers never see a partial document.
fn write_atomically(target: &Path, bytes: &[u8]) -> Result<(), CatalogError> {
    let file_name = target
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("catalog");
    let staging = target.with_file_name(format!(".{}.tmp", file_name));

    fs::write(&staging, bytes).map_err(|e| CatalogError::io(&staging, e))?;
    if let Err(e) = fs::rename(&staging, target) {
        let _ = fs::remove_file(&staging);
        return Err(CatalogError::io(target, e));
    }
    Ok(())
}
