//! Core types shared by the catalog, the codecs and the extractors.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// DICOM data element tag: `(group, element)`.
///
/// Rendered as `"GGGG,EEEE"` in catalog documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tag {
    pub group: u16,
    pub element: u16,
}

impl Tag {
    pub const fn new(group: u16, element: u16) -> Self {
        Tag { group, element }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04X},{:04X}", self.group, self.element)
    }
}

impl FromStr for Tag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (group, element) = s
            .split_once(',')
            .ok_or_else(|| format!("invalid tag '{}': expected GGGG,EEEE", s))?;
        let parse = |part: &str| {
            if part.len() != 4 || !part.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(format!("invalid tag '{}': expected 4 hex digits", s));
            }
            u16::from_str_radix(part, 16).map_err(|e| format!("invalid tag '{}': {}", s, e))
        };
        Ok(Tag::new(parse(group)?, parse(element)?))
    }
}

impl Serialize for Tag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Tag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Ordered tag values of one file.
pub type TagSet = BTreeMap<Tag, String>;

pub const PATIENT_ID: Tag = Tag::new(0x0010, 0x0020);
pub const STUDY_INSTANCE_UID: Tag = Tag::new(0x0020, 0x000D);
pub const SERIES_INSTANCE_UID: Tag = Tag::new(0x0020, 0x000E);
pub const STACK_ID: Tag = Tag::new(0x0020, 0x9056);
pub const ACQUISITION_NUMBER: Tag = Tag::new(0x0020, 0x0012);

pub const SOP_INSTANCE_UID: Tag = Tag::new(0x0008, 0x0018);
pub const STUDY_DATE: Tag = Tag::new(0x0008, 0x0020);
pub const ACCESSION_NUMBER: Tag = Tag::new(0x0008, 0x0050);
pub const MODALITY: Tag = Tag::new(0x0008, 0x0060);
pub const MANUFACTURER: Tag = Tag::new(0x0008, 0x0070);
pub const STUDY_DESCRIPTION: Tag = Tag::new(0x0008, 0x1030);
pub const SERIES_DESCRIPTION: Tag = Tag::new(0x0008, 0x103E);
pub const PATIENT_NAME: Tag = Tag::new(0x0010, 0x0010);
pub const INSTANCE_NUMBER: Tag = Tag::new(0x0020, 0x0013);

/// Number of grouping tags forming the hierarchical tree path.
pub const GROUPING_DEPTH: usize = 5;

/// Grouping tags in index order. The outermost level of the hierarchical
/// tree is keyed by the last entry, the innermost by the first.
pub const GROUPING_TAGS: [Tag; GROUPING_DEPTH] = [
    PATIENT_ID,
    STUDY_INSTANCE_UID,
    SERIES_INSTANCE_UID,
    STACK_ID,
    ACQUISITION_NUMBER,
];

/// Descriptive tags cached alongside the grouping prefix.
pub const DESCRIPTIVE_TAGS: [Tag; 9] = [
    SOP_INSTANCE_UID,
    MODALITY,
    STUDY_DATE,
    ACCESSION_NUMBER,
    MANUFACTURER,
    STUDY_DESCRIPTION,
    SERIES_DESCRIPTION,
    PATIENT_NAME,
    INSTANCE_NUMBER,
];

/// Whether `tag` is one of the cached tags.
pub fn is_indexed_tag(tag: Tag) -> bool {
    GROUPING_TAGS.contains(&tag) || DESCRIPTIVE_TAGS.contains(&tag)
}

pub fn is_grouping_tag(tag: Tag) -> bool {
    GROUPING_TAGS.contains(&tag)
}
