//! Format sniffing: picks the DICOM header parser or the non-DICOM path per file.

use super::{modified_time, TagExtractor};
use crate::error::ExtractionError;
use crate::record::FileRecord;
use crate::types::TagSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const PREAMBLE_LEN: usize = 128;
const MAGIC: &[u8; 4] = b"DICM";

/// Reads the indexed tag set of a file already sniffed as DICOM Part 10.
pub trait HeaderParser: Send + Sync {
    fn parse(&self, path: &Path) -> Result<TagSet, ExtractionError>;
}

/// Extractor that classifies each file by its preamble.
///
/// Files carrying the Part 10 preamble and magic go through `P`; any other
/// readable file yields a non-DICOM record with its stat info.
pub struct SniffingExtractor<P> {
    parser: P,
}

impl<P: HeaderParser> SniffingExtractor<P> {
    pub fn new(parser: P) -> Self {
        Self { parser }
    }
}

impl<P: HeaderParser> TagExtractor for SniffingExtractor<P> {
    fn extract(&self, directory: &Path, file_name: &str) -> Result<FileRecord, ExtractionError> {
        let path = directory.join(file_name);
        let io_err = |source| ExtractionError::Io {
            path: path.clone(),
            source,
        };

        let metadata = std::fs::metadata(&path).map_err(io_err)?;
        if !metadata.is_file() {
            return Err(ExtractionError::NotReadable(path.clone()));
        }
        let size = metadata.len();
        let mtime = modified_time(&metadata);

        let mut file = File::open(&path).map_err(io_err)?;
        let mut head = [0u8; PREAMBLE_LEN + 4];
        let read = read_up_to(&mut file, &mut head).map_err(io_err)?;

        drop(file);

        if read == head.len() && &head[PREAMBLE_LEN..] == MAGIC {
            let tags = self.parser.parse(&path)?;
            Ok(FileRecord::dicom(file_name, size, mtime, tags))
        } else {
            tracing::debug!("{} has no DICOM preamble", path.display());
            Ok(FileRecord::non_dicom(file_name, size, mtime))
        }
    }
}

/// Fill as much of `buf` as the stream allows; returns the byte count.
fn read_up_to(reader: &mut impl Read, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
