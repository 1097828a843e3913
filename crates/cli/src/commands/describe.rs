use std::path::Path;

use phasegate_eval::{describe_condition, describe_rule};

use crate::commands::load_rules;
use crate::config::GateConfig;
use crate::{print_json, OutputFormat};

pub(crate) fn cmd_describe(config: &GateConfig, rules_path: &Path, output: OutputFormat, quiet: bool) {
    let rules = load_rules(rules_path, output, quiet);
    if quiet {
        return;
    }
    let registry = config.registry();

    match output {
        OutputFormat::Text => {
            if rules.is_empty() {
                println!("no rules");
            }
            for rule in &rules {
                println!("{}: {}", rule.id, describe_rule(rule, registry));
            }
        }
        OutputFormat::Json => {
            let described: Vec<serde_json::Value> = rules
                .iter()
                .map(|rule| {
                    let conditions: Vec<String> = rule
                        .conditions
                        .iter()
                        .map(|c| describe_condition(c, registry))
                        .collect();
                    serde_json::json!({
                        "id": rule.id,
                        "summary": describe_rule(rule, registry),
                        "conditions": conditions,
                    })
                })
                .collect();
            print_json(&serde_json::Value::Array(described));
        }
    }
}
