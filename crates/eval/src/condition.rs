//! Condition evaluator.
//!
//! Evaluates one condition (field path, operator, expected value) against
//! a snapshot. Never panics and never errors: absence and unparseable
//! values follow the emptiness rules, and a malformed condition evaluates
//! to `false`.

use std::cmp::Ordering;

use tracing::warn;

use crate::coerce::{self, Typed};
use crate::operators;
use crate::snapshot::Snapshot;
use crate::types::{Condition, Operator};

/// Evaluate `condition` against `snapshot`.
///
/// A value that is missing (or `null`, blank, empty, unparseable for the
/// field type) makes `is_empty`, `not_equals` and `not_contains` true and
/// every other operator false.
pub fn evaluate_condition(condition: &Condition, snapshot: &Snapshot) -> bool {
    if !operators::is_legal(condition.field_type, condition.operator) {
        warn!(
            condition_id = %condition.id,
            operator = %condition.operator,
            field_type = %condition.field_type,
            "operator not defined for field type; condition fails"
        );
        return false;
    }

    let actual = coerce::coerce(snapshot.resolve(&condition.field_path), condition.field_type);

    match condition.operator {
        Operator::IsEmpty => actual.is_none(),
        Operator::IsFilled => actual.is_some(),
        op => {
            let expected = condition
                .expected
                .as_ref()
                .and_then(|v| coerce::coerce(Some(v), condition.field_type));
            match expected {
                Some(expected) => apply_binary(op, actual.as_ref(), &expected),
                None => {
                    warn!(
                        condition_id = %condition.id,
                        operator = %op,
                        "expected value missing or not coercible; condition fails"
                    );
                    false
                }
            }
        }
    }
}

fn apply_binary(op: Operator, actual: Option<&Typed>, expected: &Typed) -> bool {
    match op {
        Operator::Equals => actual
            .and_then(|a| coerce::typed_eq(a, expected))
            .unwrap_or(false),
        Operator::NotEquals => match actual {
            None => true,
            Some(a) => coerce::typed_eq(a, expected).is_some_and(|eq| !eq),
        },
        Operator::GreaterThan => ordering(actual, expected, |o| o == Ordering::Greater),
        Operator::GreaterOrEqual => ordering(actual, expected, |o| o != Ordering::Less),
        Operator::LessThan => ordering(actual, expected, |o| o == Ordering::Less),
        Operator::LessOrEqual => ordering(actual, expected, |o| o != Ordering::Greater),
        Operator::Contains => match (actual, expected) {
            (Some(Typed::Text(a)), Typed::Text(e)) => contains_ignore_case(a, e),
            _ => false,
        },
        Operator::NotContains => match (actual, expected) {
            (None, _) => true,
            (Some(Typed::Text(a)), Typed::Text(e)) => !contains_ignore_case(a, e),
            _ => false,
        },
        Operator::IsEmpty => actual.is_none(),
        Operator::IsFilled => actual.is_some(),
    }
}

/// Substring match ignoring case. `equals` stays exact.
fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn ordering(actual: Option<&Typed>, expected: &Typed, accept: impl Fn(Ordering) -> bool) -> bool {
    actual
        .and_then(|a| coerce::typed_cmp(a, expected))
        .is_some_and(accept)
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
