use phasegate_eval::{operators_for, FieldDescriptor};
use phasegate_interchange::FieldRecord;

use crate::config::GateConfig;
use crate::{print_json, OutputFormat};

pub(crate) fn cmd_fields(config: &GateConfig, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    let registry = config.registry();

    match output {
        OutputFormat::Text => {
            for field in registry.iter() {
                println!(
                    "{:<24} {:<8} {:<24} {}",
                    field.path,
                    field.field_type.as_str(),
                    field.label,
                    operator_names(field).join(", ")
                );
            }
        }
        OutputFormat::Json => {
            let fields: Vec<serde_json::Value> = registry
                .iter()
                .map(|field| {
                    let record = FieldRecord {
                        path: field.path.clone(),
                        field_type: field.field_type.as_str().to_string(),
                        label: field.label.clone(),
                    };
                    let mut value = serde_json::to_value(record).unwrap_or_default();
                    value["operators"] = serde_json::json!(operator_names(field));
                    value
                })
                .collect();
            print_json(&serde_json::Value::Array(fields));
        }
    }
}

fn operator_names(field: &FieldDescriptor) -> Vec<&'static str> {
    operators_for(field.field_type)
        .iter()
        .map(|op| op.as_str())
        .collect()
}
