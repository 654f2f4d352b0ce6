use std::collections::BTreeSet;
use std::path::PathBuf;

use bizscout_dedup::config::{DedupConfig, EmptyFieldPolicy, FieldWeights};
use bizscout_dedup::engine::run;
use bizscout_dedup::loader::load_records;
use bizscout_dedup::model::{Badge, DedupInput, DedupResult, SourceRecords};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_input(config: &DedupConfig) -> DedupInput {
    let dir = fixtures_dir();
    let sources = config
        .sources
        .iter()
        .map(|source| {
            let path = dir.join(&source.file);
            let text = std::fs::read_to_string(&path)
                .unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()));
            SourceRecords {
                name: source.name.clone(),
                records: load_records(&source.name, &text, source.resolved_format()).unwrap(),
            }
        })
        .collect();
    DedupInput { sources }
}

fn scan_config() -> DedupConfig {
    let toml = std::fs::read_to_string(fixtures_dir().join("scan.toml")).unwrap();
    DedupConfig::from_toml(&toml).unwrap()
}

fn load_and_run(config: &DedupConfig) -> DedupResult {
    run(config, &load_input(config)).unwrap()
}

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn scan_merges_across_sources() {
    let result = load_and_run(&scan_config());

    assert_eq!(result.meta.config_name, "Denver scan");
    assert_eq!(result.summary.input_records, 6);
    assert_eq!(result.summary.merged_records, 4);
    assert_eq!(result.summary.duplicates_folded, 2);
    assert_eq!(result.summary.multi_source_records, 2);

    let names: Vec<&str> = result.records.iter().map(|r| r.merged.record.name.as_str()).collect();
    assert_eq!(names, vec!["Joe's HVAC", "Mile High Roofing", "", "Smith Plumbing"]);

    assert_eq!(result.records[0].merged.data_sources, set(&["yelp", "google"]));
    assert_eq!(result.records[1].merged.data_sources, set(&["yelp"]));
    // Blank google and dataaxle rows collapse under the default blank-match policy
    assert_eq!(result.records[2].merged.data_sources, set(&["google", "dataaxle"]));
    assert_eq!(result.records[3].merged.data_sources, set(&["dataaxle"]));
}

#[test]
fn scan_scores_first_seen_fields() {
    let result = load_and_run(&scan_config());

    let joes = &result.records[0];
    // yelp's fields win over google's later succession_risk_score = 10
    assert_eq!(joes.opportunity_score, 80);
    assert_eq!(joes.badges.len(), 5);
    assert!(joes.badges.contains(&Badge::HighOpportunity));

    let smith = &result.records[3];
    assert_eq!(smith.opportunity_score, 15);
    assert_eq!(smith.badges, BTreeSet::from([Badge::MarketLeader]));

    assert_eq!(result.summary.high_opportunity, 1);
    assert_eq!(result.summary.badge_counts["Market Leader"], 2);
}

#[test]
fn ignore_policy_keeps_blank_rows_apart() {
    let mut config = scan_config();
    config.matching.empty_fields = EmptyFieldPolicy::Ignore;
    let result = load_and_run(&config);

    assert_eq!(result.summary.merged_records, 5);
    assert_eq!(result.records[0].merged.data_sources, set(&["yelp", "google"]));
}

#[test]
fn extended_weights_still_merge_variants() {
    let mut config = scan_config();
    config.matching.weights = FieldWeights::extended();
    let result = load_and_run(&config);

    assert_eq!(result.records[0].merged.data_sources, set(&["yelp", "google"]));
    assert_eq!(result.records[0].merged.member_count, 2);
}

#[test]
fn reordering_sources_changes_canonical_fields() {
    let mut config = scan_config();
    config.sources.swap(0, 1);
    let result = load_and_run(&config);

    let joes = &result.records[0];
    assert_eq!(joes.merged.record.name, "Joes HVAC Service");
    assert_eq!(joes.merged.record.source, "google");
    assert_eq!(joes.merged.data_sources, set(&["yelp", "google"]));
    // google's record carries no market data
    assert_eq!(joes.opportunity_score, 0);
}

#[test]
fn result_serializes_flat_records() {
    let result = load_and_run(&scan_config());
    let v = serde_json::to_value(&result).unwrap();

    let first = &v["records"][0];
    assert_eq!(first["name"], "Joe's HVAC");
    assert_eq!(first["rating"], 4.5);
    assert_eq!(first["market_context"]["market_maturity"], "developing");
    assert_eq!(first["data_sources"], serde_json::json!(["google", "yelp"]));
    assert_eq!(first["opportunity_score"], 80);
    assert_eq!(v["summary"]["merged_records"], 4);
    assert_eq!(v["meta"]["threshold"], 85.0);
}
