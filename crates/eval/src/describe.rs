//! Human-readable descriptions of conditions and rules, as shown in rule
//! management screens.

use crate::operators::operator_label;
use crate::registry::FieldRegistry;
use crate::types::{Condition, Rule, StageSelector};

/// Render a condition as prose: `Track notes is filled`,
/// `Master deal volume is greater than "0"`.
///
/// The field label comes from the registry, then the condition's own
/// label, then the raw path.
pub fn describe_condition(condition: &Condition, registry: &FieldRegistry) -> String {
    let field = registry
        .describe(&condition.field_path)
        .map(|f| f.label.as_str())
        .or(condition.label.as_deref())
        .unwrap_or(condition.field_path.as_str());
    let operator = operator_label(condition.operator);

    if condition.operator.is_unary() {
        return format!("{} {}", field, operator);
    }
    let value = match &condition.expected {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    };
    format!("{} {} \"{}\"", field, operator, value)
}

/// One-line summary of a rule: stages, combination mode and conditions.
pub fn describe_rule(rule: &Rule, registry: &FieldRegistry) -> String {
    let from = match &rule.from_stage {
        StageSelector::Any => "any stage".to_string(),
        StageSelector::Exact(s) => s.to_string(),
    };
    let joiner = if rule.require_all { " AND " } else { " OR " };
    let conditions: Vec<String> = rule
        .conditions
        .iter()
        .map(|c| describe_condition(c, registry))
        .collect();
    let mut line = format!("{} -> {}: {}", from, rule.to_stage, conditions.join(joiner));
    if !rule.enabled {
        line.push_str(" (disabled)");
    }
    line
}
