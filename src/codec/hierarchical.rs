//! Hierarchical schema: DICOM files grouped in a tree keyed by grouping tag values.
//!
//! ```text
//! "dicomlist": { <tag 4>: { <tag 3>: { <tag 2>: { <tag 1>: { <tag 0>: [block, ...] } } } } }
//! "non Dicom": [block, ...]
//! ```
//!
//! The outermost level is keyed by the last grouping tag. Leaf blocks omit the
//! grouping tags since the path already carries them.

use super::{
    encodable_records, header, optional_array, CatalogCodec, CatalogDocument, FileBlock,
    RecordSink,
};
use crate::catalog::{CatalogKind, DirectoryCatalog};
use crate::error::{CatalogError, RecordParseError};
use crate::record::FileRecord;
use crate::types::{GROUPING_DEPTH, GROUPING_TAGS};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;

/// Field holding the grouping tree.
pub const FIELD_DICOM_TREE: &str = "dicomlist";

/// Field holding non-DICOM file blocks.
pub const FIELD_NON_DICOM: &str = "non Dicom";

pub struct HierarchicalCodec;

impl CatalogCodec for HierarchicalCodec {
    const KIND: CatalogKind = CatalogKind::Hierarchical;

    fn encode(catalog: &DirectoryCatalog) -> Result<Option<CatalogDocument>, CatalogError> {
        let records = encodable_records(catalog);
        if records.is_empty() {
            return Ok(None);
        }

        let mut tree = Map::new();
        let mut non_dicom = Vec::new();
        for record in records {
            match record.grouping_values() {
                Some(path) => {
                    let block = serde_json::to_value(FileBlock::without_grouping_tags(record))?;
                    leaf_for(&mut tree, &path)?.push(block);
                }
                None => non_dicom.push(serde_json::to_value(FileBlock::from_record(record))?),
            }
        }

        let mut document = header(Self::KIND);
        if !tree.is_empty() {
            document.insert(FIELD_DICOM_TREE.to_string(), Value::Object(tree));
        }
        if !non_dicom.is_empty() {
            document.insert(FIELD_NON_DICOM.to_string(), Value::Array(non_dicom));
        }

        Ok(Some(CatalogDocument {
            kind: Self::KIND,
            value: Value::Object(document),
        }))
    }

    fn decode(document: &Value, directory: &Path) -> Result<DirectoryCatalog, CatalogError> {
        let kind = super::read_header(document)?;
        if kind != Self::KIND {
            return Err(CatalogError::Format(format!(
                "expected a {} catalog, found {}",
                Self::KIND,
                kind
            )));
        }

        let mut sink = RecordSink::new(directory);
        match document.get(FIELD_DICOM_TREE) {
            None => {}
            Some(Value::Object(tree)) => {
                let mut path = Vec::with_capacity(GROUPING_DEPTH);
                walk_level(tree, &mut path, &mut sink);
            }
            Some(Value::Null) => {
                return Err(CatalogError::Format(format!(
                    "field '{}' is null",
                    FIELD_DICOM_TREE
                )))
            }
            Some(_) => {
                return Err(CatalogError::Format(format!(
                    "field '{}' is not an object",
                    FIELD_DICOM_TREE
                )))
            }
        }

        let non_dicom = optional_array(document, FIELD_NON_DICOM)?;
        sink.push_blocks(FIELD_NON_DICOM, non_dicom);

        Ok(sink.finish())
    }
}

/// Leaf array for a record's grouping values, creating intermediate levels.
fn leaf_for<'a>(
    tree: &'a mut Map<String, Value>,
    values: &[&str; GROUPING_DEPTH],
) -> Result<&'a mut Vec<Value>, CatalogError> {
    let conflict = || CatalogError::Format("inconsistent grouping tree".to_string());

    let mut level = tree;
    for index in (1..GROUPING_DEPTH).rev() {
        level = level
            .entry(values[index])
            .or_insert_with(|| Value::Object(Map::new()))
            .as_object_mut()
            .ok_or_else(conflict)?;
    }
    level
        .entry(values[0])
        .or_insert_with(|| Value::Array(Vec::new()))
        .as_array_mut()
        .ok_or_else(conflict)
}

/// Depth-first walk; `path` holds the keys taken so far, outermost first.
fn walk_level(level: &Map<String, Value>, path: &mut Vec<String>, sink: &mut RecordSink) {
    for (key, child) in level {
        path.push(key.clone());
        if path.len() == GROUPING_DEPTH {
            decode_leaf(child, path, sink);
        } else {
            match child.as_object() {
                Some(next) => walk_level(next, path, sink),
                None => sink.skip(RecordParseError::new(
                    location(path),
                    "expected a nested object",
                )),
            }
        }
        path.pop();
    }
}

fn decode_leaf(leaf: &Value, path: &[String], sink: &mut RecordSink) {
    let Some(blocks) = leaf.as_array() else {
        sink.skip(RecordParseError::new(location(path), "expected an array of files"));
        return;
    };

    for (i, element) in blocks.iter().enumerate() {
        let at = format!("{}[{}]", location(path), i);
        match leaf_record(element, path) {
            Ok(record) => sink.push(&at, record),
            Err(reason) => sink.skip(RecordParseError::new(at, reason)),
        }
    }
}

fn leaf_record(element: &Value, path: &[String]) -> Result<FileRecord, String> {
    let block = FileBlock::deserialize(element).map_err(|e| e.to_string())?;
    let mut tags = block
        .tags
        .ok_or_else(|| "leaf entry has no tags".to_string())?;
    // path[0] is keyed by the last grouping tag
    for (depth, value) in path.iter().enumerate() {
        tags.insert(GROUPING_TAGS[GROUPING_DEPTH - 1 - depth], value.clone());
    }
    Ok(FileRecord::dicom(
        block.filename,
        block.size,
        block.modified_time,
        tags,
    ))
}

fn location(path: &[String]) -> String {
    let keys: Vec<String> = path.iter().map(|k| format!("[{:?}]", k)).collect();
    format!("{}{}", FIELD_DICOM_TREE, keys.concat())
}
