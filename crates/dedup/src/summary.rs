use std::collections::BTreeMap;

use crate::model::{Badge, DedupSummary, ScoredRecord};

/// Compute summary statistics from a finished run.
pub fn compute_summary(input_records: usize, records: &[ScoredRecord]) -> DedupSummary {
    let mut source_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut badge_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut multi_source_records = 0;
    let mut high_opportunity = 0;

    for r in records {
        for source in &r.merged.data_sources {
            *source_counts.entry(source.clone()).or_insert(0) += 1;
        }
        if r.merged.data_sources.len() > 1 {
            multi_source_records += 1;
        }
        for badge in &r.badges {
            *badge_counts.entry(badge.to_string()).or_insert(0) += 1;
        }
        if r.badges.contains(&Badge::HighOpportunity) {
            high_opportunity += 1;
        }
    }

    DedupSummary {
        input_records,
        merged_records: records.len(),
        duplicates_folded: input_records.saturating_sub(records.len()),
        multi_source_records,
        high_opportunity,
        source_counts,
        badge_counts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BusinessRecord, MergedRecord};
    use std::collections::BTreeSet;

    fn scored(sources: &[&str], badges: &[Badge]) -> ScoredRecord {
        let mut merged = MergedRecord::from_record(&BusinessRecord::new("x", sources[0]));
        for s in &sources[1..] {
            merged.absorb(&BusinessRecord::new("x", *s));
        }
        ScoredRecord {
            merged,
            opportunity_score: 0,
            badges: badges.iter().copied().collect::<BTreeSet<_>>(),
        }
    }

    #[test]
    fn summary_counts() {
        let records = vec![
            scored(&["yelp", "google"], &[Badge::GrowthMarket, Badge::HighOpportunity]),
            scored(&["dataaxle"], &[Badge::GrowthMarket]),
            scored(&["yelp"], &[]),
        ];
        let summary = compute_summary(4, &records);
        assert_eq!(summary.input_records, 4);
        assert_eq!(summary.merged_records, 3);
        assert_eq!(summary.duplicates_folded, 1);
        assert_eq!(summary.multi_source_records, 1);
        assert_eq!(summary.high_opportunity, 1);
        assert_eq!(summary.source_counts["yelp"], 2);
        assert_eq!(summary.source_counts["google"], 1);
        assert_eq!(summary.badge_counts["Growth Market"], 2);
        assert!(!summary.badge_counts.contains_key("Market Leader"));
    }
}
