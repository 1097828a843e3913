//! Deserialization of stored rule documents and field registry documents.
//!
//! The main entry points are [`parse_rules`] and [`parse_fields`]. Both
//! accept either a bare JSON array or an object wrapping the array under
//! `rules` / `fields`.

use crate::types::*;
use std::fmt;

/// Errors during record deserialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterchangeError {
    /// The document is missing a required top-level field.
    MissingField { field: String },
    /// A record is missing a required field or has a wrongly typed one.
    RecordError {
        kind: String,
        id: String,
        message: String,
    },
    /// The document structure is invalid.
    InvalidDocument(String),
}

impl fmt::Display for InterchangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterchangeError::MissingField { field } => {
                write!(f, "document missing required field: '{}'", field)
            }
            InterchangeError::RecordError { kind, id, message } => {
                write!(f, "{} '{}': {}", kind, id, message)
            }
            InterchangeError::InvalidDocument(msg) => {
                write!(f, "invalid document: {}", msg)
            }
        }
    }
}

impl std::error::Error for InterchangeError {}

/// Deserialize a rules document into rule records, preserving order.
///
/// Order matters: the gate reports the first failing rule in declaration
/// order.
pub fn parse_rules(doc: &serde_json::Value) -> Result<Vec<RuleRecord>, InterchangeError> {
    let arr = collection(doc, "rules")?;
    arr.iter().map(parse_rule).collect()
}

/// Deserialize a field registry document into field records.
pub fn parse_fields(doc: &serde_json::Value) -> Result<Vec<FieldRecord>, InterchangeError> {
    let arr = collection(doc, "fields")?;
    arr.iter()
        .map(|obj| {
            let path = required_str(obj, "path")?;
            let field_type = obj
                .get("type")
                .and_then(|v| v.as_str())
                .ok_or_else(|| record_error("Field", &path, "missing 'type' field"))?
                .to_string();
            let label = obj
                .get("label")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
                .unwrap_or_else(|| path.clone());
            Ok(FieldRecord {
                path,
                field_type,
                label,
            })
        })
        .collect()
}

/// Deserialize a single stored rule record.
pub fn parse_rule(obj: &serde_json::Value) -> Result<RuleRecord, InterchangeError> {
    if !obj.is_object() {
        return Err(InterchangeError::InvalidDocument(
            "rule record must be a JSON object".to_string(),
        ));
    }
    let id = required_str(obj, "id")?;

    let from_stage = obj
        .get("fromStage")
        .and_then(|v| v.as_str())
        .ok_or_else(|| record_error("Rule", &id, "missing 'fromStage' field"))?
        .to_string();
    let to_stage = obj
        .get("toStage")
        .and_then(|v| v.as_str())
        .ok_or_else(|| record_error("Rule", &id, "missing 'toStage' field"))?
        .to_string();

    let require_all = optional_bool(obj, "requireAll", &id)?.unwrap_or(true);
    let enabled = optional_bool(obj, "enabled", &id)?.unwrap_or(true);

    let error_message = match obj.get("errorMessage") {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(v) => v
            .as_str()
            .ok_or_else(|| record_error("Rule", &id, "'errorMessage' must be a string"))?
            .to_string(),
    };

    let conditions = obj
        .get("conditions")
        .and_then(|c| c.as_array())
        .ok_or_else(|| record_error("Rule", &id, "missing 'conditions' array"))?
        .iter()
        .map(|c| parse_condition(&id, c))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RuleRecord {
        id,
        from_stage,
        to_stage,
        require_all,
        enabled,
        error_message,
        conditions,
    })
}

/// Deserialize a condition record belonging to rule `rule_id`.
pub fn parse_condition(
    rule_id: &str,
    obj: &serde_json::Value,
) -> Result<ConditionRecord, InterchangeError> {
    let id = obj
        .get("id")
        .and_then(|v| v.as_str())
        .ok_or_else(|| record_error("Rule", rule_id, "condition missing 'id' field"))?
        .to_string();

    let field_path = obj
        .get("fieldPath")
        .or_else(|| obj.get("fieldName"))
        .and_then(|v| v.as_str())
        .ok_or_else(|| record_error("Condition", &id, "missing 'fieldPath' field"))?
        .to_string();

    let field_type = obj
        .get("fieldType")
        .and_then(|v| v.as_str())
        .ok_or_else(|| record_error("Condition", &id, "missing 'fieldType' field"))?
        .to_string();

    let operator = obj
        .get("operator")
        .and_then(|v| v.as_str())
        .ok_or_else(|| record_error("Condition", &id, "missing 'operator' field"))?
        .to_string();

    let value = obj
        .get("value")
        .or_else(|| obj.get("expectedValue"))
        .filter(|v| !v.is_null())
        .cloned();

    let label = obj
        .get("label")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string());

    Ok(ConditionRecord {
        id,
        field_path,
        field_type,
        operator,
        value,
        label,
    })
}

// ── Parsing helpers ─────────────────────────────────────────────────

fn collection<'a>(
    doc: &'a serde_json::Value,
    key: &str,
) -> Result<&'a Vec<serde_json::Value>, InterchangeError> {
    match doc {
        serde_json::Value::Array(arr) => Ok(arr),
        serde_json::Value::Object(obj) => obj
            .get(key)
            .and_then(|v| v.as_array())
            .ok_or_else(|| InterchangeError::MissingField {
                field: key.to_string(),
            }),
        _ => Err(InterchangeError::InvalidDocument(format!(
            "expected an array or an object with a '{}' array",
            key
        ))),
    }
}

fn required_str(obj: &serde_json::Value, field: &str) -> Result<String, InterchangeError> {
    obj.get(field)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| InterchangeError::InvalidDocument(format!("missing '{}' field", field)))
}

fn optional_bool(
    obj: &serde_json::Value,
    field: &str,
    id: &str,
) -> Result<Option<bool>, InterchangeError> {
    match obj.get(field) {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(record_error(
            "Rule",
            id,
            &format!("'{}' must be a boolean", field),
        )),
    }
}

fn record_error(kind: &str, id: &str, message: &str) -> InterchangeError {
    InterchangeError::RecordError {
        kind: kind.to_string(),
        id: id.to_string(),
        message: message.to_string(),
    }
}
