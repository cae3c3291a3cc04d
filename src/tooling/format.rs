//! Format catalogs and scan reports as text or JSON summaries.

use crate::catalog::DirectoryCatalog;
use crate::scan::ScanReport;
use crate::types::{MODALITY, PATIENT_ID, SERIES_INSTANCE_UID};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde_json::{json, Value};

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

/// One table row per record, in catalog document order.
pub fn format_catalog_text(catalog: &DirectoryCatalog) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{}\n\n",
        format_section_heading(&format!("Catalog of {}", catalog.path().display()))
    ));
    if catalog.is_empty() {
        out.push_str("No files cataloged.\n");
        return out;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["File", "DICOM", "Modality", "Patient", "Series", "Size"]);
    for record in catalog.sorted_records() {
        let tag = |t| record.tag_value(t).unwrap_or("-").to_string();
        table.add_row(vec![
            record.file_name().to_string(),
            if record.is_dicom() { "yes" } else { "no" }.to_string(),
            tag(MODALITY),
            tag(PATIENT_ID),
            tag(SERIES_INSTANCE_UID),
            record.size.to_string(),
        ]);
    }
    out.push_str(&format!("{}\n\n", table));

    let dicom = catalog.iter().filter(|r| r.is_dicom()).count();
    out.push_str(&format!(
        "Total: {} files, {} DICOM.\n",
        catalog.len(),
        dicom
    ));
    out
}

/// Scan outcome followed by the catalog table.
pub fn format_scan_report_text(catalog: &DirectoryCatalog, report: &ScanReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Scan")));
    out.push_str(&format!("  Listed files: {}\n", report.listed));
    match report.reused {
        Some(kind) => out.push_str(&format!("  Reused catalog: {}\n", kind)),
        None => out.push_str("  Reused catalog: none\n"),
    }
    out.push_str(&format!(
        "  Added: {}, changed: {}, removed: {}\n",
        report.listing.added, report.listing.changed, report.listing.removed
    ));
    out.push_str(&format!(
        "  Reindexed: {}, dropped: {}\n",
        report.update.reindexed, report.update.dropped
    ));
    for path in &report.written {
        out.push_str(&format!("  Wrote {}\n", path.display()));
    }
    for path in &report.removed {
        out.push_str(&format!("  Removed {}\n", path.display()));
    }
    out.push('\n');
    out.push_str(&format_catalog_text(catalog));
    out
}

/// Compact JSON view of a catalog.
pub fn catalog_summary_json(catalog: &DirectoryCatalog) -> Value {
    let files: Vec<Value> = catalog
        .sorted_records()
        .into_iter()
        .map(|record| {
            json!({
                "filename": record.file_name(),
                "dicom": record.is_dicom(),
                "size": record.size,
                "modified_time": record.modified_time,
                "tags": record.tags(),
            })
        })
        .collect();
    json!({
        "path": catalog.path(),
        "total": catalog.len(),
        "files": files,
    })
}
