mod commands;
mod config;
mod logging;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::GateConfig;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Exit status when the gate denies a transition.
pub(crate) const EXIT_DENIED: i32 = 2;

/// Phase transition validation for deal-flow pipelines.
#[derive(Parser)]
#[command(
    name = "phasegate",
    version,
    about = "Phase transition validation for deal-flow pipelines"
)]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Log engine decisions at debug level (overridden by PHASEGATE_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Path to a phasegate.toml field registry config
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decide whether a track may move between two stages
    Check {
        /// Path to the rules JSON document
        #[arg(long)]
        rules: PathBuf,
        /// Current stage of the track
        #[arg(long)]
        from: String,
        /// Requested stage
        #[arg(long)]
        to: String,
        /// Path to a snapshot JSON document keyed by dotted field paths
        #[arg(long, conflicts_with_all = ["track", "deal"])]
        snapshot: Option<PathBuf>,
        /// Path to the track JSON document (exposed as `track.*`)
        #[arg(long)]
        track: Option<PathBuf>,
        /// Path to the parent deal JSON document (exposed as `deal.*`)
        #[arg(long, requires = "track")]
        deal: Option<PathBuf>,
    },

    /// Validate a rules document against the schema and the field registry
    Validate {
        /// Path to the rules JSON document
        rules: PathBuf,
    },

    /// Print rules as human-readable descriptions
    Describe {
        /// Path to the rules JSON document
        rules: PathBuf,
    },

    /// List registry fields and the operators each one accepts
    Fields,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = match GateConfig::resolve(cli.config.as_deref()) {
        Ok(c) => c,
        Err(msg) => {
            report_error(&msg, cli.output, cli.quiet);
            process::exit(1);
        }
    };

    match cli.command {
        Commands::Check {
            rules,
            from,
            to,
            snapshot,
            track,
            deal,
        } => {
            let input = commands::check::SnapshotInput {
                snapshot: snapshot.as_deref(),
                track: track.as_deref(),
                deal: deal.as_deref(),
            };
            commands::check::cmd_check(&config, &rules, &from, &to, input, cli.output, cli.quiet);
        }
        Commands::Validate { rules } => {
            commands::validate::cmd_validate(&config, &rules, cli.output, cli.quiet);
        }
        Commands::Describe { rules } => {
            commands::describe::cmd_describe(&config, &rules, cli.output, cli.quiet);
        }
        Commands::Fields => {
            commands::fields::cmd_fields(&config, cli.output, cli.quiet);
        }
    }
}

/// Read and parse a JSON file, exiting with status 1 on failure.
pub(crate) fn read_json(path: &Path, what: &str, output: OutputFormat, quiet: bool) -> serde_json::Value {
    let contents = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(_) => {
            let msg = format!("error: {} file not found: {}", what, path.display());
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };
    match serde_json::from_str(&contents) {
        Ok(v) => v,
        Err(e) => {
            let msg = format!("error: invalid JSON in {}: {}", path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}

pub(crate) fn print_json(value: &serde_json::Value) {
    println!(
        "{}",
        serde_json::to_string_pretty(value)
            .unwrap_or_else(|e| format!("serialization error: {}", e))
    );
}
