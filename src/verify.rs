//! Consistency Verifier
//!
//! Round-trips a catalog through both codecs and checks that nothing was lost.
//! Every failure is reported as `false`; nothing propagates past this module.

use crate::catalog::{CatalogKind, DirectoryCatalog};
use crate::codec::{
    load_catalog, save_catalog, CatalogCodec, CatalogDocument, FlatCodec, HierarchicalCodec,
};
use crate::error::CatalogError;
use thiserror::Error;
use tracing::warn;

/// Why a verification did not pass.
#[derive(Debug, Error)]
pub enum VerificationFailure {
    #[error("codec failure: {0}")]
    Codec(#[from] CatalogError),

    #[error("{0} does not cover {1}")]
    NotCovered(&'static str, &'static str),
}

/// Which directions of the covers relation are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coverage {
    /// original covers hierarchical, original covers flat, hierarchical covers flat
    Directional,
    /// all of the above plus the reverse directions
    Symmetric,
}

/// Round-trip `catalog` through both codecs in memory.
pub fn verify(catalog: &DirectoryCatalog) -> bool {
    report(catalog, check(catalog, Coverage::Directional))
}

/// Like `verify`, additionally requiring each decoded catalog to cover the original.
pub fn verify_symmetric(catalog: &DirectoryCatalog) -> bool {
    report(catalog, check(catalog, Coverage::Symmetric))
}

/// Round-trip through the canonical files in the catalog directory.
///
/// Overwrites both catalog documents. A catalog without a path passes.
pub fn verify_on_disk(catalog: &DirectoryCatalog) -> bool {
    if catalog.path().as_os_str().is_empty() {
        return true;
    }
    let outcome = (|| -> Result<(), VerificationFailure> {
        let hierarchical = disk_round_trip(catalog, CatalogKind::Hierarchical)?;
        let flat = disk_round_trip(catalog, CatalogKind::Flat)?;
        compare(catalog, &hierarchical, &flat, Coverage::Directional)
    })();
    report(catalog, outcome)
}

/// Run the round trips and return the first failure.
pub fn check(catalog: &DirectoryCatalog, coverage: Coverage) -> Result<(), VerificationFailure> {
    let hierarchical = memory_round_trip::<HierarchicalCodec>(catalog)?;
    let flat = memory_round_trip::<FlatCodec>(catalog)?;
    compare(catalog, &hierarchical, &flat, coverage)
}

fn compare(
    original: &DirectoryCatalog,
    hierarchical: &DirectoryCatalog,
    flat: &DirectoryCatalog,
    coverage: Coverage,
) -> Result<(), VerificationFailure> {
    let mut pairs = vec![
        ("original", original, "hierarchical", hierarchical),
        ("original", original, "flat", flat),
        ("hierarchical", hierarchical, "flat", flat),
    ];
    if coverage == Coverage::Symmetric {
        pairs.extend([
            ("hierarchical", hierarchical, "original", original),
            ("flat", flat, "original", original),
            ("flat", flat, "hierarchical", hierarchical),
        ]);
    }
    for (a_name, a, b_name, b) in pairs {
        if !a.is_equal(b) {
            return Err(VerificationFailure::NotCovered(a_name, b_name));
        }
    }
    Ok(())
}

/// Encode, serialize, parse and decode without touching the filesystem.
fn memory_round_trip<C: CatalogCodec>(
    catalog: &DirectoryCatalog,
) -> Result<DirectoryCatalog, CatalogError> {
    match C::encode(catalog)? {
        Some(document) => {
            let reparsed = CatalogDocument::from_slice(&document.to_bytes()?)?;
            C::decode(reparsed.value(), catalog.path())
        }
        None => Ok(DirectoryCatalog::new(catalog.path())),
    }
}

fn disk_round_trip(
    catalog: &DirectoryCatalog,
    kind: CatalogKind,
) -> Result<DirectoryCatalog, CatalogError> {
    match save_catalog(catalog, kind)? {
        Some(path) => load_catalog(&path),
        None => Ok(DirectoryCatalog::new(catalog.path())),
    }
}

fn report(catalog: &DirectoryCatalog, outcome: Result<(), VerificationFailure>) -> bool {
    match outcome {
        Ok(()) => true,
        Err(e) => {
            warn!(
                "Catalog verification failed for {}: {}",
                catalog.path().display(),
                e
            );
            false
        }
    }
}
