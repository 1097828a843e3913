//! Read-only snapshot of the entity under transition.
//!
//! A snapshot is a JSON document addressed by dotted paths. Nested
//! documents (`{"track": {"notes": ".."}}`) and flat ones
//! (`{"track.notes": ".."}`) resolve the same path.

use serde_json::{Map, Value};

/// Field values available to rule evaluation. Supplied fresh by the
/// caller for each evaluation; never mutated by the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot(Value);

impl Default for Snapshot {
    fn default() -> Self {
        Self::empty()
    }
}

impl Snapshot {
    pub fn new(value: Value) -> Self {
        Snapshot(value)
    }

    pub fn empty() -> Self {
        Snapshot(Value::Object(Map::new()))
    }

    /// Compose a snapshot from named entity documents, e.g. the track
    /// being moved and its parent deal:
    ///
    /// ```
    /// use phasegate_eval::Snapshot;
    /// use serde_json::json;
    ///
    /// let snap = Snapshot::compose([
    ///     ("track", json!({ "notes": "Budget confirmed" })),
    ///     ("deal", json!({ "volume": 1200000 })),
    /// ]);
    /// assert_eq!(snap.resolve("deal.volume"), Some(&json!(1200000)));
    /// ```
    pub fn compose<I, K>(entities: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let root: Map<String, Value> = entities
            .into_iter()
            .map(|(name, doc)| (name.into(), doc))
            .collect();
        Snapshot(Value::Object(root))
    }

    /// Resolve a dotted path. Returns `None` when any segment is missing.
    ///
    /// A top-level key equal to the whole path wins over nested lookup.
    /// Numeric segments index into arrays.
    pub fn resolve(&self, path: &str) -> Option<&Value> {
        if let Some(v) = self.0.as_object().and_then(|root| root.get(path)) {
            return Some(v);
        }
        path.split('.').try_fold(&self.0, |current, segment| match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
    }

    pub fn as_json(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for Snapshot {
    fn from(value: Value) -> Self {
        Snapshot(value)
    }
}
