//! Greedy first-match deduplication across source lists.
//!
//! Records are visited source by source, in order. Each one is compared
//! against the canonical entries built so far, in insertion order, and is
//! folded into the first entry whose similarity is strictly above the
//! threshold. There is no best-match search: grouping depends on input order.

use crate::config::MatchConfig;
use crate::model::{BusinessRecord, MergedRecord, SourceRecords};
use crate::similarity::{Similarity, WeightedSimilarity};

/// Strictly greater than: a score equal to the threshold is not a duplicate.
pub fn is_duplicate(score: f64, threshold: f64) -> bool {
    score > threshold
}

#[derive(Debug, Clone)]
pub struct Merger<S = WeightedSimilarity> {
    scorer: S,
    threshold: f64,
}

impl Merger<WeightedSimilarity> {
    pub fn new(config: MatchConfig) -> Self {
        let threshold = config.threshold;
        Self {
            scorer: WeightedSimilarity::new(config),
            threshold,
        }
    }
}

impl Default for Merger<WeightedSimilarity> {
    fn default() -> Self {
        Self::new(MatchConfig::default())
    }
}

impl<S: Similarity> Merger<S> {
    pub fn with_scorer(scorer: S, threshold: f64) -> Self {
        Self { scorer, threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Merge ordered source lists into an ordered canonical list.
    pub fn merge<L>(&self, source_lists: &[L]) -> Vec<MergedRecord>
    where
        L: AsRef<[BusinessRecord]>,
    {
        let mut canonical: Vec<MergedRecord> = Vec::new();
        let mut input_count = 0;

        for list in source_lists {
            for record in list.as_ref() {
                input_count += 1;
                self.fold(&mut canonical, record);
            }
        }

        tracing::info!(
            input = input_count,
            merged = canonical.len(),
            threshold = self.threshold,
            "dedup pass complete"
        );
        canonical
    }

    /// Like [`Merger::merge`], but records with a blank `source` take the
    /// name of the list they arrived in.
    pub fn merge_sources(&self, sources: &[SourceRecords]) -> Vec<MergedRecord> {
        let lists: Vec<Vec<BusinessRecord>> = sources
            .iter()
            .map(|source| {
                source
                    .records
                    .iter()
                    .map(|record| {
                        let mut record = record.clone();
                        if record.source.trim().is_empty() {
                            record.source = source.name.clone();
                        }
                        record
                    })
                    .collect()
            })
            .collect();
        self.merge(&lists)
    }

    fn fold(&self, canonical: &mut Vec<MergedRecord>, record: &BusinessRecord) {
        for (index, entry) in canonical.iter_mut().enumerate() {
            let score = self.scorer.similarity(record, &entry.record);
            if is_duplicate(score, self.threshold) {
                tracing::debug!(
                    index,
                    source = %record.source,
                    name = %record.name,
                    canonical = %entry.record.name,
                    score,
                    "folding duplicate"
                );
                entry.absorb(record);
                return;
            }
        }
        canonical.push(MergedRecord::from_record(record));
    }
}

/// Merge with the default matching config (threshold 85).
pub fn merge<L: AsRef<[BusinessRecord]>>(source_lists: &[L]) -> Vec<MergedRecord> {
    Merger::new(MatchConfig::default()).merge(source_lists)
}
