//! Rule matcher: which rules apply to a requested transition.

use crate::types::{Rule, Stage};

/// Select the enabled rules gating `from → to`.
///
/// A rule applies when its target equals `to` and its source is either
/// the wildcard or equal to `from`. The result keeps the declaration
/// order of `rules`, which decides precedence in the gate.
pub fn match_rules<'r>(from: &Stage, to: &Stage, rules: &'r [Rule]) -> Vec<&'r Rule> {
    rules
        .iter()
        .filter(|rule| rule.enabled && &rule.to_stage == to && rule.from_stage.matches(from))
        .collect()
}
