//! Environment variable source: DCMCAT_* prefix with __ separator

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

/// Add environment variable overlay to builder.
/// Uses DCMCAT__ prefix and __ as separator for nested keys,
/// e.g. `DCMCAT__UPDATE__PARALLEL=false`.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let builder = builder.add_source(
        Environment::with_prefix("DCMCAT")
            .separator("__")
            .try_parsing(true),
    );
    Ok(builder)
}
