//! Field registry: the catalog of fields a condition may test.
//!
//! Each entry maps a dotted snapshot path to a declared [`FieldType`] and
//! a human label. Registries are plain values; the engine only reads them.

use std::collections::BTreeMap;

use phasegate_interchange::FieldRecord;

use crate::types::{EvalError, FieldType};

/// A registry entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub path: String,
    pub field_type: FieldType,
    pub label: String,
}

impl FieldDescriptor {
    pub fn new(path: impl Into<String>, field_type: FieldType, label: impl Into<String>) -> Self {
        FieldDescriptor {
            path: path.into(),
            field_type,
            label: label.into(),
        }
    }
}

/// Ordered catalog of field descriptors, indexed by path.
///
/// Iteration follows declaration order, which rule editors use for their
/// field pickers.
#[derive(Debug, Clone, Default)]
pub struct FieldRegistry {
    fields: Vec<FieldDescriptor>,
    index: BTreeMap<String, usize>,
}

impl FieldRegistry {
    /// An empty registry. Every condition is unknown to it.
    pub fn new() -> Self {
        Self::default()
    }

    /// The catalog shipped with the deal-flow application: track and
    /// master-deal fields.
    pub fn builtin() -> Self {
        let entries = [
            ("track.playerName", FieldType::Text, "Player name"),
            ("track.trackVolume", FieldType::Number, "Track volume"),
            ("track.probability", FieldType::Number, "Probability (%)"),
            ("track.responsibles", FieldType::Select, "Responsibles"),
            ("track.notes", FieldType::Text, "Track notes"),
            ("deal.volume", FieldType::Number, "Master deal volume"),
            ("deal.operationType", FieldType::Select, "Operation type"),
            ("deal.deadline", FieldType::Date, "Deal deadline"),
            ("deal.observations", FieldType::Text, "Deal observations"),
        ];
        let mut registry = FieldRegistry::new();
        for (path, field_type, label) in entries {
            registry.push(FieldDescriptor::new(path, field_type, label));
        }
        registry
    }

    /// Add a field. Fails if the path is already registered.
    pub fn register(&mut self, descriptor: FieldDescriptor) -> Result<(), EvalError> {
        if self.index.contains_key(&descriptor.path) {
            return Err(EvalError::DuplicateField {
                path: descriptor.path,
            });
        }
        self.push(descriptor);
        Ok(())
    }

    /// Builder form of [`FieldRegistry::register`].
    pub fn with_field(
        mut self,
        path: impl Into<String>,
        field_type: FieldType,
        label: impl Into<String>,
    ) -> Result<Self, EvalError> {
        self.register(FieldDescriptor::new(path, field_type, label))?;
        Ok(self)
    }

    fn push(&mut self, descriptor: FieldDescriptor) {
        self.index
            .insert(descriptor.path.clone(), self.fields.len());
        self.fields.push(descriptor);
    }

    /// Look up a field by its dotted path.
    pub fn describe(&self, path: &str) -> Option<&FieldDescriptor> {
        self.index.get(path).map(|&i| &self.fields[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Build a registry from stored field records.
    pub fn from_records(records: &[FieldRecord]) -> Result<Self, EvalError> {
        let mut registry = FieldRegistry::new();
        for record in records {
            let field_type = record.field_type.parse()?;
            registry.register(FieldDescriptor::new(
                record.path.as_str(),
                field_type,
                record.label.as_str(),
            ))?;
        }
        Ok(registry)
    }

    /// Build a registry from a JSON field document (array or
    /// `{"fields": [...]}`).
    pub fn from_json(doc: &serde_json::Value) -> Result<Self, EvalError> {
        let records = phasegate_interchange::parse_fields(doc)?;
        Self::from_records(&records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builtin_describes_track_and_deal_fields() {
        let registry = FieldRegistry::builtin();
        let notes = registry.describe("track.notes").unwrap();
        assert_eq!(notes.field_type, FieldType::Text);
        assert_eq!(notes.label, "Track notes");
        assert_eq!(
            registry.describe("deal.volume").unwrap().field_type,
            FieldType::Number
        );
        assert!(registry.describe("track.unknown").is_none());
    }

    #[test]
    fn builtin_preserves_declaration_order() {
        let registry = FieldRegistry::builtin();
        let first = registry.iter().next().unwrap();
        assert_eq!(first.path, "track.playerName");
        assert_eq!(registry.len(), 9);
    }

    #[test]
    fn duplicate_path_rejected() {
        let err = FieldRegistry::new()
            .with_field("track.notes", FieldType::Text, "Notes")
            .and_then(|r| r.with_field("track.notes", FieldType::Number, "Again"))
            .unwrap_err();
        assert_eq!(
            err,
            EvalError::DuplicateField {
                path: "track.notes".to_string()
            }
        );
    }

    #[test]
    fn from_json_document() {
        let doc = json!([
            { "path": "track.signed", "type": "boolean", "label": "NDA signed" },
            { "path": "deal.deadline", "type": "date", "label": "Deadline" }
        ]);
        let registry = FieldRegistry::from_json(&doc).unwrap();
        assert_eq!(
            registry.describe("track.signed").unwrap().field_type,
            FieldType::Boolean
        );
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn from_json_rejects_unknown_type() {
        let doc = json!([{ "path": "deal.fee", "type": "currency" }]);
        assert_eq!(
            FieldRegistry::from_json(&doc).unwrap_err(),
            EvalError::UnknownFieldType {
                name: "currency".to_string()
            }
        );
    }
}
