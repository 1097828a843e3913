use std::path::Path;
use std::process;

use phasegate_eval::{rules_from_json, validate_rule_set};

use crate::config::GateConfig;
use crate::{read_json, report_error, OutputFormat};

static RULES_SCHEMA_STR: &str = include_str!("../../../../docs/rules-schema.json");

/// Validate a rules document in two passes: structural (JSON Schema), then
/// semantic (field registry and operator legality).
pub(crate) fn cmd_validate(config: &GateConfig, rules_path: &Path, output: OutputFormat, quiet: bool) {
    let schema: serde_json::Value = match serde_json::from_str(RULES_SCHEMA_STR) {
        Ok(s) => s,
        Err(e) => {
            let msg = format!("internal error: failed to parse embedded rules schema: {}", e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };
    let validator = match jsonschema::validator_for(&schema) {
        Ok(v) => v,
        Err(e) => {
            let msg = format!("internal error: failed to compile schema: {}", e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    let doc = read_json(rules_path, "rules", output, quiet);

    let mut errors: Vec<String> = validator
        .iter_errors(&doc)
        .map(|e| format!("{}", e))
        .collect();

    if errors.is_empty() {
        match rules_from_json(&doc) {
            Ok(rules) => {
                tracing::debug!(rules = rules.len(), "rules document parsed");
                if let Err(config_errors) = validate_rule_set(&rules, config.registry()) {
                    errors.extend(config_errors.iter().map(|e| e.to_string()));
                }
            }
            Err(e) => errors.push(e.to_string()),
        }
    }

    if errors.is_empty() {
        if !quiet {
            match output {
                OutputFormat::Text => println!("valid"),
                OutputFormat::Json => println!("{{\"valid\": true}}"),
            }
        }
        return;
    }

    match output {
        OutputFormat::Text => {
            if !quiet {
                eprintln!("invalid rules");
                for err in &errors {
                    eprintln!("  - {}", err);
                }
            }
        }
        OutputFormat::Json => {
            let json = serde_json::json!({
                "valid": false,
                "errors": errors
            });
            eprintln!(
                "{}",
                serde_json::to_string_pretty(&json).unwrap_or_default()
            );
        }
    }
    process::exit(1);
}
