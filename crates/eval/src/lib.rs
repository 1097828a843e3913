//! phasegate phase transition validation engine -- accepts a rule set and
//! a snapshot of the entity being moved, produces an allow/deny decision.
//!
//! Rules gate transitions into a target stage. Each rule carries field
//! conditions combined with AND or OR; the first failing rule (in
//! declaration order) blocks the move and supplies the message. No
//! matching rule means the move is unrestricted.
//!
//! The engine is pure: no I/O, no shared mutable state. Every call reads
//! only its arguments, so it can be invoked concurrently without
//! coordination.

pub mod coerce;
pub mod condition;
pub mod describe;
pub mod gate;
pub mod matcher;
pub mod operators;
pub mod registry;
pub mod rules;
pub mod snapshot;
pub mod types;
pub mod validate;

use std::sync::OnceLock;

pub use condition::evaluate_condition;
pub use describe::{describe_condition, describe_rule};
pub use gate::{Decision, TransitionGate, DEFAULT_ANY_DENIAL_MESSAGE, DEFAULT_DENIAL_MESSAGE};
pub use matcher::match_rules;
pub use operators::{operator_label, operators_for};
pub use registry::{FieldDescriptor, FieldRegistry};
pub use rules::{evaluate_rule, RuleOutcome};
pub use snapshot::Snapshot;
pub use types::{
    rules_from_json, Condition, EvalError, FieldType, Operator, Rule, Stage, StageSelector,
    ANY_STAGE,
};
pub use validate::{validate_rule, validate_rule_set, ConfigError};

/// Decide whether an entity may move from `from` to `to`, using the
/// built-in field registry.
///
/// This is the top-level public API. For a custom registry, build a
/// [`TransitionGate`].
pub fn can_transition(from: &Stage, to: &Stage, snapshot: &Snapshot, rules: &[Rule]) -> Decision {
    static GATE: OnceLock<TransitionGate> = OnceLock::new();
    GATE.get_or_init(TransitionGate::default)
        .can_transition(from, to, snapshot, rules)
}

/// Evaluate a stored rules document and a snapshot document.
///
/// # Arguments
/// * `rules` - Rules JSON (array, or object with a `rules` array)
/// * `snapshot` - Snapshot JSON keyed by dotted field paths
///
/// # Returns
/// * the `Decision`, or an `EvalError` if the rules document is malformed
pub fn evaluate(
    from: &str,
    to: &str,
    rules: &serde_json::Value,
    snapshot: &serde_json::Value,
) -> Result<Decision, EvalError> {
    let rules = rules_from_json(rules)?;
    Ok(can_transition(
        &Stage::from(from),
        &Stage::from(to),
        &Snapshot::new(snapshot.clone()),
        &rules,
    ))
}

// ──────────────────────────────────────────────
// Integration tests
// ──────────────────────────────────────────────
