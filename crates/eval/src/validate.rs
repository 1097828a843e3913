//! Save-time configuration checks for rules.
//!
//! A rule is well-formed when it has an id, a concrete target stage, a
//! non-blank message and at least one condition, and every condition
//! names a registered field with its registered type, uses an operator
//! legal for that type, and (for binary operators) carries an expected
//! value that coerces to that type.
//!
//! The gate reuses [`check_condition`] at evaluation time to fail closed
//! on rules that slipped past these checks.

use std::collections::BTreeSet;

use crate::coerce;
use crate::operators;
use crate::registry::FieldRegistry;
use crate::types::{Condition, FieldType, Operator, Rule};

/// A configuration problem in a rule or condition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("rule has a blank id")]
    BlankRuleId,
    #[error("rule '{rule_id}' is declared more than once")]
    DuplicateRule { rule_id: String },
    #[error("rule '{rule_id}' has no conditions")]
    NoConditions { rule_id: String },
    #[error("rule '{rule_id}' has a blank source or target stage")]
    BlankStage { rule_id: String },
    #[error("rule '{rule_id}' targets the wildcard stage 'any'")]
    WildcardTarget { rule_id: String },
    #[error("rule '{rule_id}' has a blank error message")]
    BlankErrorMessage { rule_id: String },
    #[error("rule '{rule_id}' declares condition '{condition_id}' more than once")]
    DuplicateCondition {
        rule_id: String,
        condition_id: String,
    },
    #[error("condition '{condition_id}': unknown field '{field_path}'")]
    UnknownField {
        condition_id: String,
        field_path: String,
    },
    #[error(
        "condition '{condition_id}': field '{field_path}' is registered as {registered}, not {declared}"
    )]
    FieldTypeMismatch {
        condition_id: String,
        field_path: String,
        declared: FieldType,
        registered: FieldType,
    },
    #[error("condition '{condition_id}': operator {operator} is not defined for {field_type} fields")]
    IllegalOperator {
        condition_id: String,
        operator: Operator,
        field_type: FieldType,
    },
    #[error("condition '{condition_id}': operator {operator} requires an expected value")]
    MissingExpectedValue {
        condition_id: String,
        operator: Operator,
    },
    #[error("condition '{condition_id}': expected value {value} is not a valid {field_type}")]
    InvalidExpectedValue {
        condition_id: String,
        field_type: FieldType,
        value: String,
    },
}

/// Every problem with `condition`, in check order.
pub fn condition_errors(condition: &Condition, registry: &FieldRegistry) -> Vec<ConfigError> {
    let mut errors = Vec::new();
    let id = &condition.id;

    match registry.describe(&condition.field_path) {
        None => errors.push(ConfigError::UnknownField {
            condition_id: id.clone(),
            field_path: condition.field_path.clone(),
        }),
        Some(field) if field.field_type != condition.field_type => {
            errors.push(ConfigError::FieldTypeMismatch {
                condition_id: id.clone(),
                field_path: condition.field_path.clone(),
                declared: condition.field_type,
                registered: field.field_type,
            })
        }
        Some(_) => {}
    }

    if !operators::is_legal(condition.field_type, condition.operator) {
        errors.push(ConfigError::IllegalOperator {
            condition_id: id.clone(),
            operator: condition.operator,
            field_type: condition.field_type,
        });
    }

    if !condition.operator.is_unary() {
        match &condition.expected {
            None => errors.push(ConfigError::MissingExpectedValue {
                condition_id: id.clone(),
                operator: condition.operator,
            }),
            Some(value) => {
                if coerce::coerce(Some(value), condition.field_type).is_none() {
                    errors.push(ConfigError::InvalidExpectedValue {
                        condition_id: id.clone(),
                        field_type: condition.field_type,
                        value: value.to_string(),
                    });
                }
            }
        }
    }

    errors
}

/// First problem with `condition`, if any.
pub fn check_condition(condition: &Condition, registry: &FieldRegistry) -> Result<(), ConfigError> {
    match condition_errors(condition, registry).into_iter().next() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Check a single rule, collecting every problem.
pub fn validate_rule(rule: &Rule, registry: &FieldRegistry) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if rule.id.trim().is_empty() {
        errors.push(ConfigError::BlankRuleId);
    }
    if rule.to_stage.as_str().trim().is_empty() || rule.from_stage.as_str().trim().is_empty() {
        errors.push(ConfigError::BlankStage {
            rule_id: rule.id.clone(),
        });
    }
    if rule.to_stage.is_wildcard() {
        errors.push(ConfigError::WildcardTarget {
            rule_id: rule.id.clone(),
        });
    }
    if rule.error_message.trim().is_empty() {
        errors.push(ConfigError::BlankErrorMessage {
            rule_id: rule.id.clone(),
        });
    }
    if rule.conditions.is_empty() {
        errors.push(ConfigError::NoConditions {
            rule_id: rule.id.clone(),
        });
    }

    let mut seen = BTreeSet::new();
    for condition in &rule.conditions {
        if !seen.insert(condition.id.as_str()) {
            errors.push(ConfigError::DuplicateCondition {
                rule_id: rule.id.clone(),
                condition_id: condition.id.clone(),
            });
        }
        errors.extend(condition_errors(condition, registry));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check a whole rule set: each rule, plus rule id uniqueness.
pub fn validate_rule_set(rules: &[Rule], registry: &FieldRegistry) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut seen = BTreeSet::new();
    for rule in rules {
        if !seen.insert(rule.id.as_str()) {
            errors.push(ConfigError::DuplicateRule {
                rule_id: rule.id.clone(),
            });
        }
        if let Err(rule_errors) = validate_rule(rule, registry) {
            errors.extend(rule_errors);
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
