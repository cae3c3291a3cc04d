//! Configuration for scanning, reindexing, persistence and logging.
//!
//! Sources are layered by `ConfigLoader`: built-in defaults, the global file,
//! the per-directory file, then `DCMCAT__*` environment variables.

pub mod facade;
pub mod merge;
pub mod sources;

pub use facade::ConfigLoader;

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};

/// Name of the per-directory configuration file.
pub const DIRECTORY_CONFIG_FILE: &str = ".dcmcat.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub update: UpdateConfig,
    pub persist: PersistConfig,
    pub scan: ScanConfig,
    pub logging: LoggingConfig,
}

/// How `DirectoryCatalog::update` runs tag extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateConfig {
    /// Extract pending records on the rayon pool
    pub parallel: bool,
    /// Dedicated pool size; `None` uses the global pool
    pub threads: Option<usize>,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            threads: None,
        }
    }
}

/// Which catalog documents a scan writes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistConfig {
    pub write_hierarchical: bool,
    pub write_flat: bool,
}

impl Default for PersistConfig {
    fn default() -> Self {
        Self {
            write_hierarchical: true,
            write_flat: true,
        }
    }
}

/// Directory listing filters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Extensions skipped in addition to the built-in non-DICOM list
    pub extra_ignored_extensions: Vec<String>,
}

impl ScanConfig {
    pub fn name_filter(&self) -> crate::catalog::NameFilter {
        crate::catalog::NameFilter::new(&self.extra_ignored_extensions)
    }
}
