//! CLI Tooling
//!
//! Command-line interface for scanning directories into catalogs, inspecting
//! catalog documents and verifying codec consistency.

use crate::codec::load_catalog;
use crate::config::{CatalogConfig, ConfigLoader};
use crate::error::CatalogError;
use crate::extract::{DatasetHeaderParser, FsDirectoryLister, SniffingExtractor};
use crate::logging::LoggingConfig;
use crate::scan::{scan_directory, ScanOptions};
use crate::tooling::format::{catalog_summary_json, format_catalog_text, format_scan_report_text};
use crate::verify::{verify, verify_on_disk, verify_symmetric};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::info;

/// dcmcat - per-directory DICOM metadata catalogs
#[derive(Parser)]
#[command(name = "dcmcat")]
#[command(about = "Index DICOM directories into cached JSON catalogs")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (overrides default config loading)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long, global = true)]
    pub log_output: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Index a directory, reusing its catalog documents when present
    Scan {
        /// Directory to catalog
        directory: PathBuf,
        /// Do not write catalog documents
        #[arg(long)]
        no_save: bool,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Print the contents of a catalog document
    Show {
        /// Path to a type1/type2 catalog document
        catalog: PathBuf,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Index a directory and check that both schemas round-trip
    Verify {
        /// Directory to catalog
        directory: PathBuf,
        /// Round-trip through the catalog files instead of memory
        #[arg(long)]
        on_disk: bool,
        /// Also require decoded catalogs to cover the original
        #[arg(long)]
        symmetric: bool,
    },
}

impl Commands {
    /// Directory whose configuration applies to this command.
    pub fn directory(&self) -> &Path {
        match self {
            Commands::Scan { directory, .. } | Commands::Verify { directory, .. } => directory,
            Commands::Show { catalog, .. } => catalog.parent().unwrap_or_else(|| Path::new(".")),
        }
    }
}

impl Cli {
    /// Logging settings from the config file with command-line overrides applied.
    pub fn logging_config(&self, config: &CatalogConfig) -> LoggingConfig {
        let mut logging = config.logging.clone();
        if let Some(level) = &self.log_level {
            logging.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            logging.format = format.clone();
        }
        if let Some(output) = &self.log_output {
            logging.output = output.clone();
        }
        logging
    }
}

/// Resolved configuration plus the extraction stack used by commands.
pub struct CliContext {
    config: CatalogConfig,
    extractor: SniffingExtractor<DatasetHeaderParser>,
}

impl CliContext {
    /// Create a context, loading config from `config_path` or the layered sources of `directory`.
    pub fn new(directory: &Path, config_path: Option<&Path>) -> Result<Self, CatalogError> {
        let config = match config_path {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(directory)?,
        };
        Ok(Self::with_config(config))
    }

    pub fn with_config(config: CatalogConfig) -> Self {
        Self {
            config,
            extractor: SniffingExtractor::new(DatasetHeaderParser),
        }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    pub fn execute(&self, command: &Commands) -> Result<String, CatalogError> {
        match command {
            Commands::Scan {
                directory,
                no_save,
                format,
            } => {
                let options = ScanOptions {
                    config: self.config.clone(),
                    save: !no_save,
                };
                let (catalog, report) =
                    scan_directory(directory, &FsDirectoryLister, &self.extractor, &options)?;
                match format.as_str() {
                    "json" => Ok(serde_json::to_string_pretty(&json!({
                        "catalog": catalog_summary_json(&catalog),
                        "listed": report.listed,
                        "reused": report.reused.map(|k| k.label()),
                        "added": report.listing.added,
                        "changed": report.listing.changed,
                        "removed": report.listing.removed,
                        "reindexed": report.update.reindexed,
                        "dropped": report.update.dropped,
                        "written": report.written,
                        "deleted": report.removed,
                    }))?),
                    "text" => Ok(format_scan_report_text(&catalog, &report)),
                    other => Err(invalid_format(other)),
                }
            }
            Commands::Show { catalog, format } => {
                let loaded = load_catalog(catalog)?;
                match format.as_str() {
                    "json" => Ok(serde_json::to_string_pretty(&catalog_summary_json(
                        &loaded,
                    ))?),
                    "text" => Ok(format_catalog_text(&loaded)),
                    other => Err(invalid_format(other)),
                }
            }
            Commands::Verify {
                directory,
                on_disk,
                symmetric,
            } => {
                let options = ScanOptions {
                    config: self.config.clone(),
                    save: false,
                };
                let (catalog, _) =
                    scan_directory(directory, &FsDirectoryLister, &self.extractor, &options)?;
                let passed = match (on_disk, symmetric) {
                    (true, _) => verify_on_disk(&catalog),
                    (false, true) => verify_symmetric(&catalog),
                    (false, false) => verify(&catalog),
                };
                if !passed {
                    return Err(CatalogError::Verification(directory.clone()));
                }
                info!("Verified catalog of {}", directory.display());
                Ok(format!(
                    "Catalog of {} verified ({} records)",
                    directory.display(),
                    catalog.len()
                ))
            }
        }
    }
}

fn invalid_format(format: &str) -> CatalogError {
    CatalogError::Config(format!(
        "Invalid output format: {} (must be 'text' or 'json')",
        format
    ))
}
