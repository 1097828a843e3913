use std::path::Path;
use std::process;

use phasegate_eval::{Snapshot, Stage};

use crate::commands::load_rules;
use crate::config::GateConfig;
use crate::{print_json, read_json, report_error, OutputFormat, EXIT_DENIED};

/// Where the snapshot comes from: one pre-composed document, or a track
/// document with an optional parent deal.
pub(crate) struct SnapshotInput<'a> {
    pub snapshot: Option<&'a Path>,
    pub track: Option<&'a Path>,
    pub deal: Option<&'a Path>,
}

pub(crate) fn cmd_check(
    config: &GateConfig,
    rules_path: &Path,
    from: &str,
    to: &str,
    input: SnapshotInput<'_>,
    output: OutputFormat,
    quiet: bool,
) {
    let rules = load_rules(rules_path, output, quiet);
    let snapshot = build_snapshot(input, output, quiet);

    let decision =
        config
            .gate
            .can_transition(&Stage::from(from), &Stage::from(to), &snapshot, &rules);

    if !quiet {
        match output {
            OutputFormat::Json => print_json(&decision.to_json()),
            OutputFormat::Text => {
                if decision.allowed {
                    println!("allowed: {} -> {}", from, to);
                } else {
                    println!("denied: {} -> {}", from, to);
                    if let Some(message) = &decision.message {
                        println!("  {}", message);
                    }
                    if let Some(rule) = &decision.blocking_rule {
                        println!("  blocking rule: {}", rule.id);
                    }
                    for condition in &decision.failed_conditions {
                        println!(
                            "  - {}",
                            phasegate_eval::describe_condition(condition, config.registry())
                        );
                    }
                }
            }
        }
    }

    if !decision.allowed {
        process::exit(EXIT_DENIED);
    }
}

fn build_snapshot(input: SnapshotInput<'_>, output: OutputFormat, quiet: bool) -> Snapshot {
    if let Some(path) = input.snapshot {
        return Snapshot::new(read_json(path, "snapshot", output, quiet));
    }
    let Some(track_path) = input.track else {
        report_error(
            "error: one of --snapshot or --track is required",
            output,
            quiet,
        );
        process::exit(1);
    };

    let mut entities = vec![("track", read_json(track_path, "track", output, quiet))];
    if let Some(deal_path) = input.deal {
        entities.push(("deal", read_json(deal_path, "deal", output, quiet)));
    }
    Snapshot::compose(entities)
}
