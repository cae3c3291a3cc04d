use std::path::Path;

use dcmcat::codec::{encode, CatalogDocument};
use dcmcat::types::{MODALITY, PATIENT_ID};
use dcmcat::{CatalogCodec, CatalogError, CatalogKind, DirectoryCatalog, FlatCodec, HierarchicalCodec};
use serde_json::{json, Value};

use crate::integration::support::series_catalog;

#[test]
fn hierarchical_document_shares_one_tree_path_for_a_series() {
    let catalog = series_catalog();
    let document = HierarchicalCodec::encode(&catalog).unwrap().unwrap();
    let value = document.value();

    assert_eq!(value["ID"], "purpose: Dicom catalog");
    assert_eq!(value["version"], "0.0");
    assert_eq!(value["type"], "hierarchical");

    let tree = value["dicomlist"].as_object().unwrap();
    assert_eq!(tree.len(), 1);
    let leaf = &value["dicomlist"]["7"]["1"]["1.2.840.1.3"]["1.2.840.1"]["P1"];
    let leaf = leaf.as_array().expect("leaf array under the shared path");
    assert_eq!(leaf.len(), 2);
    assert_eq!(leaf[0]["filename"], "IM0001");
    assert_eq!(leaf[1]["filename"], "IM0002");
    assert_eq!(leaf[0]["tags"]["0008,0060"], "CT");
    assert!(leaf[0]["tags"].get("0010,0020").is_none());

    let non_dicom = value["non Dicom"].as_array().unwrap();
    assert_eq!(non_dicom.len(), 1);
    assert_eq!(non_dicom[0]["filename"], "notes.txt");
    assert!(non_dicom[0].get("tags").is_none());
}

#[test]
fn flat_document_lists_every_file_once() {
    let catalog = series_catalog();
    let document = FlatCodec::encode(&catalog).unwrap().unwrap();
    let value = document.value();

    assert_eq!(value["type"], "flat");
    let names: Vec<&str> = value["filelist"]
        .as_array()
        .unwrap()
        .iter()
        .map(|block| block["filename"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["IM0001", "IM0002", "notes.txt"]);
    assert_eq!(value["filelist"][0]["tags"]["0010,0020"], "P1");
    assert_eq!(value["filelist"][0]["modified_time"], "2023-11-14T22:14:10Z");
}

#[test]
fn encoding_is_independent_of_insertion_order() {
    let catalog = series_catalog();
    let mut reversed = DirectoryCatalog::new(catalog.path());
    for record in catalog.records().iter().rev() {
        reversed.add_file_index(record.clone());
    }

    for kind in CatalogKind::ALL {
        let a = encode(&catalog, kind).unwrap().unwrap().to_bytes().unwrap();
        let b = encode(&reversed, kind).unwrap().unwrap().to_bytes().unwrap();
        assert_eq!(a, b, "{} documents differ", kind);
        assert_eq!(a.last(), Some(&b'\n'));
    }
}

#[test]
fn both_schemas_decode_to_the_same_catalog() {
    let catalog = series_catalog();
    let dir = Path::new("/studies/p1");

    let hierarchical = encode(&catalog, CatalogKind::Hierarchical)
        .unwrap()
        .unwrap()
        .decode(dir)
        .unwrap();
    let flat = encode(&catalog, CatalogKind::Flat)
        .unwrap()
        .unwrap()
        .decode(dir)
        .unwrap();

    assert!(catalog.is_equivalent(&hierarchical));
    assert!(catalog.is_equivalent(&flat));
    assert!(hierarchical.is_equivalent(&flat));
    assert!(!hierarchical.needs_indexing());
    assert_eq!(
        hierarchical.get("IM0001").unwrap().tag_value(PATIENT_ID),
        Some("P1")
    );
    assert_eq!(flat.get("notes.txt").unwrap().size, 12);
}

#[test]
fn decoding_keeps_nine_of_ten_when_one_entry_is_broken() {
    let mut files: Vec<Value> = (0..10)
        .map(|i| {
            json!({
                "filename": format!("IM{:04}", i),
                "size": 512,
                "modified_time": "2024-03-01T10:00:00Z",
                "tags": {"0008,0060": "US", "0010,0020": "P7"}
            })
        })
        .collect();
    files[4] = json!({"filename": "IM0004", "size": "large"});
    let document = json!({
        "ID": "purpose: Dicom catalog",
        "version": "0.0",
        "type": "flat",
        "filelist": files
    });

    let bytes = serde_json::to_vec(&document).unwrap();
    let catalog = CatalogDocument::from_slice(&bytes)
        .unwrap()
        .decode(Path::new("/d"))
        .unwrap();

    assert_eq!(catalog.len(), 9);
    assert!(catalog.get("IM0004").is_none());
    assert_eq!(catalog.get("IM0009").unwrap().tag_value(MODALITY), Some("US"));
}

#[test]
fn header_problems_abort_decoding() {
    let missing_type = json!({"ID": "purpose: Dicom catalog", "version": "0.0", "filelist": []});
    assert!(matches!(
        CatalogDocument::from_slice(&serde_json::to_vec(&missing_type).unwrap()),
        Err(CatalogError::Format(_))
    ));

    let null_list = json!({
        "ID": "purpose: Dicom catalog",
        "version": "0.0",
        "type": "flat",
        "filelist": null
    });
    assert!(matches!(
        FlatCodec::decode(&null_list, Path::new("/d")),
        Err(CatalogError::Format(_))
    ));
}

#[test]
fn empty_catalog_yields_no_document() {
    let mut catalog = series_catalog();
    catalog.clear();
    assert!(catalog.is_empty());
    for kind in CatalogKind::ALL {
        assert!(encode(&catalog, kind).unwrap().is_none());
    }
}

#[test]
fn pending_records_are_left_out_of_documents() {
    let mut catalog = DirectoryCatalog::new("/d");
    catalog.fill_from_fileinfo(
        "/d",
        &[dcmcat::FileInfo::new("IM0001", 10, crate::integration::support::ts(0))],
    );
    assert_eq!(catalog.pending_count(), 1);
    assert!(encode(&catalog, CatalogKind::Flat).unwrap().is_none());
    assert!(!dcmcat::verify::verify(&catalog));
}

#[test]
fn hierarchical_decoding_keeps_nine_of_ten_leaf_entries() {
    let mut leaf: Vec<Value> = (0..10)
        .map(|i| {
            json!({
                "filename": format!("IM{:04}", i),
                "size": 512,
                "modified_time": "2024-03-01T10:00:00Z",
                "tags": {"0008,0060": "MR"}
            })
        })
        .collect();
    leaf[6] = json!({"filename": "IM0006", "size": 512, "modified_time": "yesterday", "tags": {}});
    let document = json!({
        "ID": "purpose: Dicom catalog",
        "version": "0.0",
        "type": "hierarchical",
        "dicomlist": {"3": {"1": {"1.2.5": {"1.2": {"P9": leaf}}}}}
    });

    let catalog = HierarchicalCodec::decode(&document, Path::new("/d")).unwrap();

    assert_eq!(catalog.len(), 9);
    assert!(catalog.get("IM0006").is_none());
    let record = catalog.get("IM0009").unwrap();
    assert_eq!(record.tag_value(PATIENT_ID), Some("P9"));
    assert_eq!(record.tag_value(MODALITY), Some("MR"));
    assert_eq!(record.grouping_values(), Some(["P9", "1.2", "1.2.5", "1", "3"]));
}
