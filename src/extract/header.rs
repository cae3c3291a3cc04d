//! DICOM header reading on top of `dicom-object`.
//!
//! Only the indexed tags are kept. The data set is read up to pixel data, so
//! image payloads are never loaded.

use super::sniff::HeaderParser;
use crate::error::ExtractionError;
use crate::types::{TagSet, DESCRIPTIVE_TAGS, GROUPING_TAGS};
use dicom_dictionary_std::tags;
use dicom_object::file::ReadPreamble;
use dicom_object::{DefaultDicomObject, OpenFileOptions};
use std::path::Path;

/// Header parser for any transfer syntax the DICOM-rs registry can decode.
#[derive(Debug, Default, Clone, Copy)]
pub struct DatasetHeaderParser;

impl HeaderParser for DatasetHeaderParser {
    fn parse(&self, path: &Path) -> Result<TagSet, ExtractionError> {
        let object = OpenFileOptions::new()
            .read_preamble(ReadPreamble::Always)
            .read_until(tags::PIXEL_DATA)
            .open_file(path)
            .map_err(|e| ExtractionError::Malformed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        Ok(indexed_tags(&object))
    }
}

/// Indexed tags present in `object` with a textual value.
fn indexed_tags(object: &DefaultDicomObject) -> TagSet {
    let mut found = TagSet::new();
    for tag in GROUPING_TAGS.iter().chain(DESCRIPTIVE_TAGS.iter()) {
        let Ok(element) = object.element(dicom_object::Tag(tag.group, tag.element)) else {
            continue;
        };
        match element.to_str() {
            Ok(value) => {
                found.insert(*tag, clean(&value));
            }
            Err(e) => tracing::debug!("Ignoring non-text value of {}: {}", tag, e),
        }
    }
    found
}

/// Strip DICOM value padding.
fn clean(value: &str) -> String {
    value
        .trim_end_matches(|c: char| c == '\0' || c == ' ')
        .trim_start_matches(' ')
        .to_string()
}
