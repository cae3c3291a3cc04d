//! MergeService: orchestrates sources and deserializes to CatalogConfig.

use crate::config::sources::{environment, global_file, directory_file};
use crate::config::CatalogConfig;
use config::{Config, ConfigError, File};
use std::path::Path;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Load config for a directory from the standard sources.
    /// Precedence: defaults (lowest) -> global file -> directory file -> environment (highest).
    pub fn load(directory: &Path) -> Result<CatalogConfig, ConfigError> {
        let builder = Config::builder();
        let builder = global_file::add_to_builder(builder)?;
        let builder = directory_file::add_to_builder(builder, directory)?;
        let builder = environment::add_to_builder(builder)?;

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Load config from a specific file with environment overlay.
    pub fn load_from_file(path: &Path) -> Result<CatalogConfig, ConfigError> {
        let builder = Config::builder().add_source(File::from(path));
        let builder = environment::add_to_builder(builder)?;

        let config = builder.build()?;
        config.try_deserialize()
    }
}
