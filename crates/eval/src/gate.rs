//! Transition gate: the public entry point of the engine.
//!
//! The gate is stateless per call. It matches the rules gating the
//! requested transition, evaluates them in declaration order, and the
//! first failing rule decides the denial. No matching rule means the
//! move is unrestricted.

use tracing::{debug, info};

use crate::matcher::match_rules;
use crate::registry::FieldRegistry;
use crate::rules::{evaluate_rule, RuleOutcome};
use crate::snapshot::Snapshot;
use crate::types::{Condition, Rule, Stage};

/// Message used when a blocking AND rule carries a blank one.
pub const DEFAULT_DENIAL_MESSAGE: &str = "Requirements not met to advance to this stage";

/// Message used when a blocking OR rule carries a blank one.
pub const DEFAULT_ANY_DENIAL_MESSAGE: &str = "None of the requirements were met to advance to this stage";

/// The gate's verdict on one transition request.
///
/// A denial is a routine outcome, not an error: callers branch on
/// `allowed` and show `message` to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub allowed: bool,
    /// The first matched rule (declaration order) that failed.
    pub blocking_rule: Option<Rule>,
    pub message: Option<String>,
    /// Conditions of the blocking rule that evaluated false.
    pub failed_conditions: Vec<Condition>,
}

impl Decision {
    pub fn allow() -> Self {
        Decision {
            allowed: true,
            blocking_rule: None,
            message: None,
            failed_conditions: Vec::new(),
        }
    }

    fn deny(outcome: RuleOutcome<'_>, default_message: Option<&str>) -> Self {
        let rule = outcome.rule;
        let message = if !rule.error_message.trim().is_empty() {
            rule.error_message.clone()
        } else if let Some(message) = default_message {
            message.to_string()
        } else if rule.require_all {
            DEFAULT_DENIAL_MESSAGE.to_string()
        } else {
            DEFAULT_ANY_DENIAL_MESSAGE.to_string()
        };
        Decision {
            allowed: false,
            blocking_rule: Some(outcome.rule.clone()),
            message: Some(message),
            failed_conditions: outcome.failed.into_iter().cloned().collect(),
        }
    }

    /// Serialize to JSON output format. Rules and conditions use their
    /// stored key names.
    pub fn to_json(&self) -> serde_json::Value {
        let blocking_rule = self
            .blocking_rule
            .as_ref()
            .map(|r| serde_json::to_value(r.to_record()).unwrap_or(serde_json::Value::Null))
            .unwrap_or(serde_json::Value::Null);
        let failed: Vec<serde_json::Value> = self
            .failed_conditions
            .iter()
            .map(|c| serde_json::to_value(c.to_record()).unwrap_or(serde_json::Value::Null))
            .collect();
        serde_json::json!({
            "allowed": self.allowed,
            "message": self.message,
            "blockingRule": blocking_rule,
            "failedConditions": failed,
        })
    }
}

/// Evaluates transition requests against a field registry.
#[derive(Debug, Clone)]
pub struct TransitionGate {
    registry: FieldRegistry,
    /// Overrides both built-in fallbacks when set.
    default_message: Option<String>,
}

impl Default for TransitionGate {
    fn default() -> Self {
        Self::new(FieldRegistry::builtin())
    }
}

impl TransitionGate {
    pub fn new(registry: FieldRegistry) -> Self {
        TransitionGate {
            registry,
            default_message: None,
        }
    }

    /// Override the message shown when a blocking rule has none, for AND
    /// and OR rules alike.
    pub fn with_default_message(mut self, message: impl Into<String>) -> Self {
        self.default_message = Some(message.into());
        self
    }

    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    /// Decide whether an entity in `from` may move to `to`.
    ///
    /// `rules` is read as an immutable value for the duration of the call;
    /// its order is the precedence order.
    pub fn can_transition(
        &self,
        from: &Stage,
        to: &Stage,
        snapshot: &Snapshot,
        rules: &[Rule],
    ) -> Decision {
        let matched = match_rules(from, to, rules);
        debug!(
            from = %from,
            to = %to,
            rules = rules.len(),
            matched = matched.len(),
            "evaluating transition"
        );

        for rule in matched {
            let outcome = evaluate_rule(rule, snapshot, &self.registry);
            if !outcome.passed {
                info!(
                    from = %from,
                    to = %to,
                    rule_id = %rule.id,
                    failed = outcome.failed.len(),
                    "transition blocked"
                );
                return Decision::deny(outcome, self.default_message.as_deref());
            }
        }

        Decision::allow()
    }
}
