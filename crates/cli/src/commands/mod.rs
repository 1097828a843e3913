pub(crate) mod check;
pub(crate) mod describe;
pub(crate) mod fields;
pub(crate) mod validate;

use std::path::Path;
use std::process;

use phasegate_eval::{rules_from_json, Rule};

use crate::{read_json, report_error, OutputFormat};

/// Read a rules document and convert it to engine rules, exiting with
/// status 1 when the file or its records are malformed.
pub(crate) fn load_rules(path: &Path, output: OutputFormat, quiet: bool) -> Vec<Rule> {
    let doc = read_json(path, "rules", output, quiet);
    match rules_from_json(&doc) {
        Ok(rules) => rules,
        Err(e) => {
            let msg = format!("error: invalid rules in {}: {}", path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }
}
