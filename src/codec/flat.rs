//! Flat schema: every file as one block under `filelist`.

use super::{
    encodable_records, header, optional_array, read_header, CatalogCodec, CatalogDocument,
    FileBlock, RecordSink,
};
use crate::catalog::{CatalogKind, DirectoryCatalog};
use crate::error::CatalogError;
use serde_json::Value;
use std::path::Path;

/// Field holding all file blocks.
pub const FIELD_FILE_LIST: &str = "filelist";

pub struct FlatCodec;

impl CatalogCodec for FlatCodec {
    const KIND: CatalogKind = CatalogKind::Flat;

    fn encode(catalog: &DirectoryCatalog) -> Result<Option<CatalogDocument>, CatalogError> {
        let records = encodable_records(catalog);
        if records.is_empty() {
            return Ok(None);
        }

        let blocks = records
            .into_iter()
            .map(|record| serde_json::to_value(FileBlock::from_record(record)))
            .collect::<Result<Vec<_>, _>>()?;

        let mut document = header(Self::KIND);
        document.insert(FIELD_FILE_LIST.to_string(), Value::Array(blocks));
        Ok(Some(CatalogDocument {
            kind: Self::KIND,
            value: Value::Object(document),
        }))
    }

    fn decode(document: &Value, directory: &Path) -> Result<DirectoryCatalog, CatalogError> {
        let kind = read_header(document)?;
        if kind != Self::KIND {
            return Err(CatalogError::Format(format!(
                "expected a {} catalog, found {}",
                Self::KIND,
                kind
            )));
        }

        let mut sink = RecordSink::new(directory);
        sink.push_blocks(FIELD_FILE_LIST, optional_array(document, FIELD_FILE_LIST)?);
        Ok(sink.finish())
    }
}
