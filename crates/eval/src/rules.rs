//! Rule evaluator: combines a rule's condition results per `require_all`.

use tracing::{debug, warn};

use crate::condition::evaluate_condition;
use crate::registry::FieldRegistry;
use crate::snapshot::Snapshot;
use crate::types::{Condition, Rule};
use crate::validate;

/// Result of evaluating one rule.
#[derive(Debug, Clone)]
pub struct RuleOutcome<'r> {
    pub rule: &'r Rule,
    pub passed: bool,
    /// Conditions that evaluated false, in declaration order.
    pub failed: Vec<&'r Condition>,
}

/// Evaluate every condition of `rule` and combine the results: AND when
/// `require_all`, OR otherwise.
///
/// All conditions are evaluated, so `failed` is complete even when the
/// verdict is already known. Conditions that do not agree with `registry`
/// fail closed, and a rule without conditions never passes.
pub fn evaluate_rule<'r>(
    rule: &'r Rule,
    snapshot: &Snapshot,
    registry: &FieldRegistry,
) -> RuleOutcome<'r> {
    let failed: Vec<&Condition> = rule
        .conditions
        .iter()
        .filter(|c| !condition_holds(rule, c, snapshot, registry))
        .collect();

    let passed = if rule.conditions.is_empty() {
        warn!(rule_id = %rule.id, "rule has no conditions; treating as failed");
        false
    } else if rule.require_all {
        failed.is_empty()
    } else {
        failed.len() < rule.conditions.len()
    };

    debug!(
        rule_id = %rule.id,
        require_all = rule.require_all,
        conditions = rule.conditions.len(),
        failed = failed.len(),
        passed,
        "rule evaluated"
    );

    RuleOutcome {
        rule,
        passed,
        failed,
    }
}

fn condition_holds(
    rule: &Rule,
    condition: &Condition,
    snapshot: &Snapshot,
    registry: &FieldRegistry,
) -> bool {
    if let Err(e) = validate::check_condition(condition, registry) {
        warn!(rule_id = %rule.id, error = %e, "malformed condition; failing closed");
        return false;
    }
    evaluate_condition(condition, snapshot)
}
