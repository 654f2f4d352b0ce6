//! `bizscout merge` — config-driven multi-source dedup.

use std::path::{Path, PathBuf};

use bizscout_dedup::loader::load_records;
use bizscout_dedup::{DedupConfig, DedupInput, SourceRecords};
use clap::Subcommand;

use crate::exit_codes::{EXIT_MERGE_INVALID_CONFIG, EXIT_MERGE_RUNTIME};
use crate::{emit_json, CliError};

#[derive(Subcommand)]
pub enum MergeCommands {
    /// Merge sources listed in a TOML config file
    #[command(after_help = "\
Examples:
  bizscout merge run scan.toml
  bizscout merge run scan.toml --json
  bizscout merge run scan.toml --output merged.json")]
    Run {
        /// Path to the merge config file
        config: PathBuf,

        /// Also output JSON to stdout (summary still goes to stderr)
        #[arg(long)]
        json: bool,

        /// Write JSON output to file (overrides [output] json in the config)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Validate a merge config without running
    #[command(after_help = "\
Examples:
  bizscout merge validate scan.toml")]
    Validate {
        /// Path to the merge config file
        config: PathBuf,
    },
}

pub fn cmd_merge(cmd: MergeCommands) -> Result<(), CliError> {
    match cmd {
        MergeCommands::Run { config, json, output } => cmd_merge_run(config, json, output),
        MergeCommands::Validate { config } => cmd_merge_validate(config),
    }
}

fn merge_err(code: u8, msg: impl Into<String>) -> CliError {
    CliError::new(code, msg)
}

fn load_config(config_path: &Path) -> Result<DedupConfig, CliError> {
    let config_str = std::fs::read_to_string(config_path)
        .map_err(|e| merge_err(EXIT_MERGE_RUNTIME, format!("cannot read config: {e}")))?;
    DedupConfig::from_toml(&config_str).map_err(|e| merge_err(EXIT_MERGE_INVALID_CONFIG, e.to_string()))
}

fn cmd_merge_run(
    config_path: PathBuf,
    json_output: bool,
    output_file: Option<PathBuf>,
) -> Result<(), CliError> {
    let config = load_config(&config_path)?;

    // Resolve file paths relative to config file's directory
    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));

    let mut sources = Vec::with_capacity(config.sources.len());
    for source in &config.sources {
        let path = base_dir.join(&source.file);
        let text = std::fs::read_to_string(&path).map_err(|e| {
            merge_err(EXIT_MERGE_RUNTIME, format!("cannot read {}: {e}", path.display()))
        })?;
        let records = load_records(&source.name, &text, source.resolved_format())
            .map_err(|e| merge_err(EXIT_MERGE_RUNTIME, e.to_string()))?;
        tracing::debug!(source = %source.name, records = records.len(), "loaded source");
        sources.push(SourceRecords { name: source.name.clone(), records });
    }

    let input = DedupInput { sources };
    let result = bizscout_dedup::run(&config, &input)
        .map_err(|e| merge_err(EXIT_MERGE_RUNTIME, e.to_string()))?;

    let output_file = output_file.or_else(|| config.output.json.as_ref().map(|p| base_dir.join(p)));
    emit_json(&result, json_output, output_file.as_ref(), EXIT_MERGE_RUNTIME)?;

    // Human summary to stderr
    let s = &result.summary;
    eprintln!(
        "{} sources, {} records → {} businesses ({} duplicates folded, {} multi-source, {} high opportunity)",
        input.sources.len(),
        s.input_records,
        s.merged_records,
        s.duplicates_folded,
        s.multi_source_records,
        s.high_opportunity,
    );

    Ok(())
}

fn cmd_merge_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = load_config(&config_path)?;
    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));

    let missing: Vec<String> = config
        .sources
        .iter()
        .map(|s| base_dir.join(&s.file))
        .filter(|p| !p.exists())
        .map(|p| p.display().to_string())
        .collect();
    if !missing.is_empty() {
        return Err(merge_err(
            EXIT_MERGE_INVALID_CONFIG,
            format!("source file(s) not found: {}", missing.join(", ")),
        )
        .with_hint("source paths are resolved relative to the config file"));
    }

    eprintln!(
        "config '{}' OK: {} sources, threshold {}",
        config.name,
        config.sources.len(),
        config.matching.threshold
    );
    Ok(())
}
