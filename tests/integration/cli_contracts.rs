use std::fs;

use clap::Parser;
use dcmcat::config::CatalogConfig;
use dcmcat::tooling::cli::{Cli, CliContext, Commands};
use tempfile::TempDir;

use crate::integration::support::series_file;

fn context() -> CliContext {
    CliContext::with_config(CatalogConfig::default())
}

#[test]
fn parse_valid_command_matrix() {
    let cli = Cli::try_parse_from(["dcmcat", "scan", "/data", "--no-save", "--format", "json"]).unwrap();
    assert!(matches!(cli.command, Commands::Scan { no_save: true, .. }));

    let cli = Cli::try_parse_from(["dcmcat", "--log-level", "debug", "verify", "/data", "--on-disk"])
        .unwrap();
    assert_eq!(cli.log_level.as_deref(), Some("debug"));
    assert!(matches!(cli.command, Commands::Verify { on_disk: true, symmetric: false, .. }));

    let cli = Cli::try_parse_from(["dcmcat", "show", "/data/type2.jcatalog"]).unwrap();
    assert_eq!(cli.command.directory(), std::path::Path::new("/data"));

    assert!(Cli::try_parse_from(["dcmcat", "scan"]).is_err());
}

#[test]
fn log_flags_override_config() {
    let cli = Cli::try_parse_from([
        "dcmcat",
        "scan",
        "/data",
        "--log-format",
        "json",
        "--log-output",
        "stdout",
    ])
    .unwrap();
    let logging = cli.logging_config(&CatalogConfig::default());
    assert_eq!(logging.format, "json");
    assert_eq!(logging.output, "stdout");
    assert_eq!(logging.level, CatalogConfig::default().logging.level);
}

#[test]
fn scan_json_contract_has_required_fields() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("IM0001"), series_file("P1", "1.2.3")).unwrap();
    fs::write(temp.path().join("README"), "hello").unwrap();

    let output = context()
        .execute(&Commands::Scan {
            directory: temp.path().to_path_buf(),
            no_save: false,
            format: "json".to_string(),
        })
        .unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["listed"], 2);
    assert_eq!(parsed["reindexed"], 2);
    assert_eq!(parsed["reused"], serde_json::Value::Null);
    assert_eq!(parsed["written"].as_array().unwrap().len(), 2);
    assert_eq!(parsed["catalog"]["total"], 2);
    assert_eq!(parsed["catalog"]["files"][0]["filename"], "IM0001");
    assert_eq!(parsed["catalog"]["files"][0]["dicom"], true);
}

#[test]
fn show_reads_written_catalog() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("IM0001"), series_file("P1", "1.2.3")).unwrap();
    let ctx = context();
    ctx.execute(&Commands::Scan {
        directory: temp.path().to_path_buf(),
        no_save: false,
        format: "text".to_string(),
    })
    .unwrap();

    let output = ctx
        .execute(&Commands::Show {
            catalog: temp.path().join("type1.jcatalog"),
            format: "json".to_string(),
        })
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["total"], 1);
    assert_eq!(parsed["files"][0]["tags"]["0010,0020"], "P1");

    let text = ctx
        .execute(&Commands::Show {
            catalog: temp.path().join("type2.jcatalog"),
            format: "text".to_string(),
        })
        .unwrap();
    assert!(text.contains("IM0001"));
}

#[test]
fn invalid_format_is_rejected() {
    let temp = TempDir::new().unwrap();
    let result = context().execute(&Commands::Scan {
        directory: temp.path().to_path_buf(),
        no_save: true,
        format: "yaml".to_string(),
    });
    assert!(result.is_err());
}

#[test]
fn verify_reports_success_without_writing() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("IM0001"), series_file("P1", "1.2.3")).unwrap();
    fs::write(temp.path().join("IM0002"), series_file("P1", "1.2.3")).unwrap();

    let output = context()
        .execute(&Commands::Verify {
            directory: temp.path().to_path_buf(),
            on_disk: false,
            symmetric: true,
        })
        .unwrap();
    assert!(output.contains("verified (2 records)"));
    assert!(!temp.path().join("type1.jcatalog").exists());
}
