use chrono::{DateTime, TimeZone, Utc};
use dcmcat::types::{
    Tag, TagSet, ACQUISITION_NUMBER, MODALITY, PATIENT_ID, SERIES_INSTANCE_UID, STACK_ID,
    STUDY_INSTANCE_UID,
};
use dcmcat::{DirectoryCatalog, FileRecord};

pub fn ts(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

/// Full tag set for one image of a series.
pub fn image_tags(patient: &str, series: &str, modality: &str) -> TagSet {
    let mut tags = TagSet::new();
    tags.insert(PATIENT_ID, patient.to_string());
    tags.insert(STUDY_INSTANCE_UID, "1.2.840.1".to_string());
    tags.insert(SERIES_INSTANCE_UID, series.to_string());
    tags.insert(STACK_ID, "1".to_string());
    tags.insert(ACQUISITION_NUMBER, "7".to_string());
    tags.insert(MODALITY, modality.to_string());
    tags
}

/// Two images of one series plus a text file.
pub fn series_catalog() -> DirectoryCatalog {
    let mut catalog = DirectoryCatalog::new("/studies/p1");
    catalog.add_file_index(FileRecord::dicom(
        "IM0002",
        2048,
        ts(1_700_000_100),
        image_tags("P1", "1.2.840.1.3", "CT"),
    ));
    catalog.add_file_index(FileRecord::non_dicom("notes.txt", 12, ts(1_700_000_000)));
    catalog.add_file_index(FileRecord::dicom(
        "IM0001",
        2048,
        ts(1_700_000_050),
        image_tags("P1", "1.2.840.1.3", "CT"),
    ));
    catalog
}

/// A Part 10 file: preamble, magic, file meta group and an explicit VR
/// little endian data set.
pub fn dicom_file_bytes(values: &[(Tag, &[u8; 2], &str)]) -> Vec<u8> {
    let mut meta = Vec::new();
    element(&mut meta, Tag::new(0x0002, 0x0001), b"OB", &[0, 1]);
    element(&mut meta, Tag::new(0x0002, 0x0002), b"UI", b"1.2.840.10008.5.1.4.1.1.4");
    element(&mut meta, Tag::new(0x0002, 0x0003), b"UI", b"1.2.826.0.1.3680043.2.1");
    element(&mut meta, Tag::new(0x0002, 0x0010), b"UI", b"1.2.840.10008.1.2.1");
    element(&mut meta, Tag::new(0x0002, 0x0012), b"UI", b"1.2.826.0.1.3680043.2");

    let mut out = vec![0u8; 128];
    out.extend_from_slice(b"DICM");
    element(&mut out, Tag::new(0x0002, 0x0000), b"UL", &(meta.len() as u32).to_le_bytes());
    out.extend_from_slice(&meta);

    let mut sorted: Vec<&(Tag, &[u8; 2], &str)> = values.iter().collect();
    sorted.sort_by_key(|(tag, _, _)| *tag);
    for (tag, vr, value) in sorted {
        element(&mut out, *tag, vr, value.as_bytes());
    }
    // pixel data marks the end of the header
    element(&mut out, Tag::new(0x7FE0, 0x0010), b"OW", &[0u8; 4]);
    out
}

fn element(out: &mut Vec<u8>, tag: Tag, vr: &[u8; 2], value: &[u8]) {
    let mut value = value.to_vec();
    if value.len() % 2 == 1 {
        value.push(if vr == b"UI" { 0 } else { b' ' });
    }
    out.extend_from_slice(&tag.group.to_le_bytes());
    out.extend_from_slice(&tag.element.to_le_bytes());
    out.extend_from_slice(vr);
    if vr == b"OB" || vr == b"OW" {
        out.extend_from_slice(&[0, 0]);
        out.extend_from_slice(&(value.len() as u32).to_le_bytes());
    } else {
        out.extend_from_slice(&(value.len() as u16).to_le_bytes());
    }
    out.extend_from_slice(&value);
}

pub fn series_file(patient: &str, series: &str) -> Vec<u8> {
    dicom_file_bytes(&[
        (PATIENT_ID, b"LO", patient),
        (STUDY_INSTANCE_UID, b"UI", "1.2.840.1"),
        (SERIES_INSTANCE_UID, b"UI", series),
        (STACK_ID, b"SH", "1"),
        (ACQUISITION_NUMBER, b"IS", "7"),
        (MODALITY, b"CS", "MR"),
    ])
}
