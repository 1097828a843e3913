//! Typed rule model for the phasegate evaluator.
//!
//! These types are DISTINCT from the stored records in
//! phasegate-interchange: record fields are plain strings, while here
//! stages, field types and operators are closed enums. Conversion in
//! both directions lives on the types themselves.

use std::fmt;
use std::str::FromStr;

use phasegate_interchange::{ConditionRecord, RuleRecord};

/// The reserved source-stage wildcard.
pub const ANY_STAGE: &str = "any";

// ──────────────────────────────────────────────
// Errors
// ──────────────────────────────────────────────

/// Errors that can occur while loading rules and registries.
///
/// Evaluation itself never errors; see [`crate::gate`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    /// A stored record could not be parsed.
    #[error("deserialization error: {message}")]
    Deserialize { message: String },
    /// A field type name outside the known set.
    #[error("unknown field type '{name}'")]
    UnknownFieldType { name: String },
    /// An operator name outside the known set.
    #[error("unknown operator '{name}'")]
    UnknownOperator { name: String },
    /// A field path declared twice in one registry.
    #[error("duplicate field path '{path}' in registry")]
    DuplicateField { path: String },
}

impl From<phasegate_interchange::InterchangeError> for EvalError {
    fn from(e: phasegate_interchange::InterchangeError) -> Self {
        EvalError::Deserialize {
            message: e.to_string(),
        }
    }
}

// ──────────────────────────────────────────────
// Stages
// ──────────────────────────────────────────────

/// An opaque pipeline stage identifier (`"nda"`, `"proposal"`, ...).
///
/// Stages are compared by equality only; their order and meaning belong
/// to the caller's stage catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Stage(String);

impl Stage {
    pub fn new(id: impl Into<String>) -> Self {
        Stage(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the reserved `"any"` identifier, which is only legal as a
    /// rule's source stage.
    pub fn is_wildcard(&self) -> bool {
        self.0 == ANY_STAGE
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Stage {
    fn from(s: &str) -> Self {
        Stage::new(s)
    }
}

impl From<String> for Stage {
    fn from(s: String) -> Self {
        Stage(s)
    }
}

/// Source side of a rule: a concrete stage or the wildcard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageSelector {
    Any,
    Exact(Stage),
}

impl StageSelector {
    /// Parse a stored source stage; `"any"` becomes the wildcard.
    pub fn parse(s: &str) -> Self {
        if s == ANY_STAGE {
            StageSelector::Any
        } else {
            StageSelector::Exact(Stage::new(s))
        }
    }

    pub fn matches(&self, stage: &Stage) -> bool {
        match self {
            StageSelector::Any => true,
            StageSelector::Exact(s) => s == stage,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            StageSelector::Any => ANY_STAGE,
            StageSelector::Exact(s) => s.as_str(),
        }
    }
}

impl fmt::Display for StageSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ──────────────────────────────────────────────
// Field types and operators
// ──────────────────────────────────────────────

/// Declared type of a registry field. Drives operator legality and
/// coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldType {
    Text,
    Number,
    Boolean,
    Date,
    /// Single- or multi-choice value: a string or a list of strings.
    Select,
}

impl FieldType {
    pub const ALL: [FieldType; 5] = [
        FieldType::Text,
        FieldType::Number,
        FieldType::Boolean,
        FieldType::Date,
        FieldType::Select,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::Select => "select",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| EvalError::UnknownFieldType {
                name: s.to_string(),
            })
    }
}

/// Comparison operator of a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operator {
    Equals,
    NotEquals,
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
    Contains,
    NotContains,
    IsEmpty,
    IsFilled,
}

impl Operator {
    pub const ALL: [Operator; 10] = [
        Operator::Equals,
        Operator::NotEquals,
        Operator::GreaterThan,
        Operator::GreaterOrEqual,
        Operator::LessThan,
        Operator::LessOrEqual,
        Operator::Contains,
        Operator::NotContains,
        Operator::IsEmpty,
        Operator::IsFilled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Equals => "equals",
            Operator::NotEquals => "not_equals",
            Operator::GreaterThan => "greater_than",
            Operator::GreaterOrEqual => "greater_or_equal",
            Operator::LessThan => "less_than",
            Operator::LessOrEqual => "less_or_equal",
            Operator::Contains => "contains",
            Operator::NotContains => "not_contains",
            Operator::IsEmpty => "is_empty",
            Operator::IsFilled => "is_filled",
        }
    }

    /// Unary operators ignore the condition's expected value.
    pub fn is_unary(&self) -> bool {
        matches!(self, Operator::IsEmpty | Operator::IsFilled)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::ALL
            .iter()
            .copied()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| EvalError::UnknownOperator {
                name: s.to_string(),
            })
    }
}

// ──────────────────────────────────────────────
// Conditions and rules
// ──────────────────────────────────────────────

/// A single comparison test against one field of the snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub id: String,
    pub field_path: String,
    pub field_type: FieldType,
    pub operator: Operator,
    /// Expected value in its stored JSON form; coerced per `field_type`
    /// at evaluation time. Ignored for unary operators.
    pub expected: Option<serde_json::Value>,
    pub label: Option<String>,
}

impl Condition {
    pub fn new(
        id: impl Into<String>,
        field_path: impl Into<String>,
        field_type: FieldType,
        operator: Operator,
        expected: Option<serde_json::Value>,
    ) -> Self {
        Condition {
            id: id.into(),
            field_path: field_path.into(),
            field_type,
            operator,
            expected,
            label: None,
        }
    }

    pub fn from_record(record: &ConditionRecord) -> Result<Condition, EvalError> {
        Ok(Condition {
            id: record.id.clone(),
            field_path: record.field_path.clone(),
            field_type: record.field_type.parse()?,
            operator: record.operator.parse()?,
            expected: record.value.clone(),
            label: record.label.clone(),
        })
    }

    pub fn to_record(&self) -> ConditionRecord {
        ConditionRecord {
            id: self.id.clone(),
            field_path: self.field_path.clone(),
            field_type: self.field_type.as_str().to_string(),
            operator: self.operator.as_str().to_string(),
            value: if self.operator.is_unary() {
                None
            } else {
                self.expected.clone()
            },
            label: self.label.clone(),
        }
    }
}

/// A configured gate on transitions into `to_stage`.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub id: String,
    pub from_stage: StageSelector,
    pub to_stage: Stage,
    /// AND (`true`) vs OR (`false`) across `conditions`.
    pub require_all: bool,
    pub enabled: bool,
    /// Shown verbatim to the end user when this rule blocks.
    pub error_message: String,
    pub conditions: Vec<Condition>,
}

impl Rule {
    pub fn from_record(record: &RuleRecord) -> Result<Rule, EvalError> {
        let conditions = record
            .conditions
            .iter()
            .map(Condition::from_record)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| EvalError::Deserialize {
                message: format!("rule '{}': {}", record.id, e),
            })?;
        Ok(Rule {
            id: record.id.clone(),
            from_stage: StageSelector::parse(&record.from_stage),
            to_stage: Stage::new(record.to_stage.as_str()),
            require_all: record.require_all,
            enabled: record.enabled,
            error_message: record.error_message.clone(),
            conditions,
        })
    }

    pub fn to_record(&self) -> RuleRecord {
        RuleRecord {
            id: self.id.clone(),
            from_stage: self.from_stage.as_str().to_string(),
            to_stage: self.to_stage.as_str().to_string(),
            require_all: self.require_all,
            enabled: self.enabled,
            error_message: self.error_message.clone(),
            conditions: self.conditions.iter().map(Condition::to_record).collect(),
        }
    }
}

/// Parse a stored rules document (array or `{"rules": [...]}`) into typed
/// rules, preserving declaration order.
pub fn rules_from_json(doc: &serde_json::Value) -> Result<Vec<Rule>, EvalError> {
    phasegate_interchange::parse_rules(doc)?
        .iter()
        .map(Rule::from_record)
        .collect()
}
