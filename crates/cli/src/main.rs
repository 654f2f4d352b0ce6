// bizscout CLI - merge provider listings and score the result

mod exit_codes;
mod merge;
mod score;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};

use exit_codes::{EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE};
use merge::MergeCommands;

#[derive(Parser)]
#[command(name = "bizscout")]
#[command(about = "Deduplicate business listings from multiple providers")]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge per-source listing files described by a TOML config
    Merge {
        #[command(subcommand)]
        command: MergeCommands,
    },

    /// Score an already merged JSON array of records
    #[command(after_help = "\
Examples:
  bizscout score merged.json
  bizscout score merged.json --json
  bizscout score merged.json --output scored.json")]
    Score {
        /// JSON array of records
        input: PathBuf,

        /// Also output JSON to stdout (summary still goes to stderr)
        #[arg(long)]
        json: bool,

        /// Write JSON output to file
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        None => {
            eprintln!("Usage: bizscout <command> [options]");
            eprintln!("       bizscout --help for more information");
            Err(CliError { code: EXIT_USAGE, message: String::new(), hint: None })
        }
        Some(Commands::Merge { command }) => merge::cmd_merge(command),
        Some(Commands::Score { input, json, output }) => score::cmd_score(input, json, output),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn general(msg: impl Into<String>) -> Self {
        Self::new(EXIT_ERROR, msg)
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Pretty JSON to an optional file and/or stdout.
pub(crate) fn emit_json<T: serde::Serialize>(
    value: &T,
    json_output: bool,
    output_file: Option<&PathBuf>,
    write_code: u8,
) -> Result<(), CliError> {
    let json_str = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;

    if let Some(path) = output_file {
        std::fs::write(path, &json_str)
            .map_err(|e| CliError::new(write_code, format!("cannot write output: {e}")))?;
        eprintln!("wrote {}", path.display());
    }

    if json_output {
        println!("{json_str}");
    }
    Ok(())
}
