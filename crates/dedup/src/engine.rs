use crate::config::DedupConfig;
use crate::error::DedupError;
use crate::merger::Merger;
use crate::model::{DedupInput, DedupMeta, DedupResult};
use crate::opportunity::{score_all, unscored};
use crate::summary::compute_summary;

/// Run dedup + scoring per config. Returns annotated records + summary.
pub fn run(config: &DedupConfig, input: &DedupInput) -> Result<DedupResult, DedupError> {
    config.validate()?;

    let input_records: usize = input.sources.iter().map(|s| s.records.len()).sum();

    let merger = Merger::new(config.matching.clone());
    let merged = merger.merge_sources(&input.sources);

    let records = if config.opportunity.enabled {
        score_all(merged, &config.opportunity.rules)
    } else {
        unscored(merged)
    };

    let summary = compute_summary(input_records, &records);
    tracing::info!(
        config = %config.name,
        sources = input.sources.len(),
        input = summary.input_records,
        merged = summary.merged_records,
        high_opportunity = summary.high_opportunity,
        "run complete"
    );

    Ok(DedupResult {
        meta: DedupMeta {
            config_name: config.name.clone(),
            threshold: merger.threshold(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        records,
    })
}
