//! Per-directory config file source: `<directory>/.dcmcat.toml`

use crate::config::DIRECTORY_CONFIG_FILE;
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File};
use std::path::Path;

pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    directory: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let path = directory.join(DIRECTORY_CONFIG_FILE);
    Ok(builder.add_source(File::from(path).required(false)))
}
