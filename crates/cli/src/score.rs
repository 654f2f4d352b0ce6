//! `bizscout score` — opportunity scoring without a merge pass.

use std::path::PathBuf;

use bizscout_dedup::config::OpportunityRules;
use bizscout_dedup::model::MergedRecord;
use bizscout_dedup::opportunity::score_all;
use bizscout_dedup::summary::compute_summary;

use crate::exit_codes::EXIT_MERGE_RUNTIME;
use crate::{emit_json, CliError};

pub fn cmd_score(input: PathBuf, json_output: bool, output_file: Option<PathBuf>) -> Result<(), CliError> {
    let text = std::fs::read_to_string(&input).map_err(|e| {
        CliError::new(EXIT_MERGE_RUNTIME, format!("cannot read {}: {e}", input.display()))
    })?;
    let merged: Vec<MergedRecord> = serde_json::from_str(&text).map_err(|e| {
        CliError::new(EXIT_MERGE_RUNTIME, format!("{}: {e}", input.display()))
            .with_hint("expected a JSON array of record objects")
    })?;

    let input_records = merged.len();
    let scored = score_all(merged, &OpportunityRules::default());
    emit_json(&scored, json_output, output_file.as_ref(), EXIT_MERGE_RUNTIME)?;

    let summary = compute_summary(input_records, &scored);
    eprintln!(
        "scored {} records: {} high opportunity",
        summary.merged_records, summary.high_opportunity
    );
    Ok(())
}
