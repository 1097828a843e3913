//! Record structs mirroring the stored JSON shape of rules and fields.
//!
//! Deserialization is hand-written in [`crate::deserialize`] so that
//! errors can name the offending record. Serialization goes through
//! serde and reproduces the stored key names.

use serde::Serialize;

/// A phase transition rule as stored by the rule repository.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RuleRecord {
    pub id: String,
    /// Source stage, or the wildcard `"any"`.
    pub from_stage: String,
    pub to_stage: String,
    /// AND (`true`) vs OR (`false`) across conditions. Defaults to `true`.
    pub require_all: bool,
    /// Defaults to `true` when absent.
    pub enabled: bool,
    pub error_message: String,
    pub conditions: Vec<ConditionRecord>,
}

/// A single field condition inside a stored rule.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConditionRecord {
    pub id: String,
    /// Dotted field path. Older records store this under `fieldName`.
    pub field_path: String,
    pub field_type: String,
    pub operator: String,
    /// Expected value; absent for `is_empty` / `is_filled`.
    #[serde(rename = "value", skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// A field registry entry: dotted path, declared type, human label.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldRecord {
    pub path: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub label: String,
}
