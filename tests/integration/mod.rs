//! Integration tests for the directory catalog, its codecs and the scan session

mod catalog_documents;
mod cli_contracts;
mod directory_lifecycle;
mod support;
