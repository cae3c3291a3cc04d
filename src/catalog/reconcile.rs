//! Reindexing of pending records against the live files.

use super::DirectoryCatalog;
use crate::config::UpdateConfig;
use crate::error::ExtractionError;
use crate::extract::TagExtractor;
use crate::record::FileRecord;
use rayon::prelude::*;
use tracing::{debug, warn};

/// Counts from one `update` pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateSummary {
    /// Pending records replaced by freshly extracted ones
    pub reindexed: usize,
    /// Pending records removed because extraction failed
    pub dropped: usize,
}

type Extracted = (usize, Result<FileRecord, ExtractionError>);

impl DirectoryCatalog {
    /// Reindex every record flagged `needs_indexing`, with default settings.
    pub fn update(&mut self, extractor: &dyn TagExtractor) -> UpdateSummary {
        self.update_with(extractor, &UpdateConfig::default())
    }

    /// Reindex every record flagged `needs_indexing`.
    ///
    /// Successful extractions replace the record in place; records whose
    /// extraction fails are removed once all extractions have finished.
    /// Failures are logged, never returned. Single pass, no retries.
    pub fn update_with(
        &mut self,
        extractor: &dyn TagExtractor,
        options: &UpdateConfig,
    ) -> UpdateSummary {
        let pending: Vec<usize> = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.needs_indexing)
            .map(|(i, _)| i)
            .collect();

        let mut summary = UpdateSummary::default();
        if !pending.is_empty() {
            let results = self.extract_pending(&pending, extractor, options);
            for (index, result) in results {
                let file_name = self.records[index].file_name().to_string();
                match result {
                    Ok(mut fresh) if fresh.file_name() == file_name => {
                        fresh.needs_indexing = false;
                        self.records[index] = fresh;
                        summary.reindexed += 1;
                    }
                    Ok(fresh) => {
                        warn!(
                            "Extractor returned record for {} when asked for {} in {}",
                            fresh.file_name(),
                            file_name,
                            self.path.display()
                        );
                    }
                    Err(e) => {
                        debug!("Dropping {} from catalog: {}", file_name, e);
                    }
                }
            }

            let before = self.records.len();
            self.records.retain(|r| !r.needs_indexing);
            summary.dropped = before - self.records.len();
            if summary.dropped > 0 {
                warn!(
                    "{} of {} files in {} could not be indexed",
                    summary.dropped,
                    pending.len(),
                    self.path.display()
                );
            }
        }

        self.needs_indexing = false;
        summary
    }

    fn extract_pending(
        &self,
        pending: &[usize],
        extractor: &dyn TagExtractor,
        options: &UpdateConfig,
    ) -> Vec<Extracted> {
        let directory = self.path.as_path();
        let extract_one = |&index: &usize| -> Extracted {
            (index, extractor.extract(directory, self.records[index].file_name()))
        };

        if !options.parallel || pending.len() < 2 {
            return pending.iter().map(extract_one).collect();
        }

        match options.threads {
            Some(threads) => match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
                Ok(pool) => pool.install(|| pending.par_iter().map(extract_one).collect()),
                Err(e) => {
                    warn!("Failed to build {}-thread pool, using global pool: {}", threads, e);
                    pending.par_iter().map(extract_one).collect()
                }
            },
            None => pending.par_iter().map(extract_one).collect(),
        }
    }
}
