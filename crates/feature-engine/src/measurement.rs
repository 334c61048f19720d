//! Measurement Store
//!
//! The analysis engine returns an arbitrarily nested document whose leaves may
//! be numbers, strings, arrays or further objects. It is kept as a recursive
//! value tree and queried by dotted path.

use crate::error::FeatureError;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// A single measurement of unknown shape
#[derive(Debug, Clone, PartialEq)]
pub enum MeasurementValue {
    /// Numeric scalar
    Number(f64),
    /// String scalar (e.g. a key name)
    Text(String),
    /// Boolean flag
    Bool(bool),
    /// Ordered sequence, typically per-frame or per-band statistics
    Sequence(Vec<MeasurementValue>),
    /// Nested group of measurements
    Map(BTreeMap<String, MeasurementValue>),
    /// Explicit null in the source document
    Null,
}

impl MeasurementValue {
    /// Numeric value, if this is a number
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MeasurementValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Convert back into a JSON value
    pub fn to_json(&self) -> Value {
        match self {
            MeasurementValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            MeasurementValue::Text(s) => Value::String(s.clone()),
            MeasurementValue::Bool(b) => Value::Bool(*b),
            MeasurementValue::Sequence(items) => {
                Value::Array(items.iter().map(MeasurementValue::to_json).collect())
            }
            MeasurementValue::Map(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            MeasurementValue::Null => Value::Null,
        }
    }
}

impl fmt::Display for MeasurementValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeasurementValue::Number(n) => write!(f, "{:?}", n),
            MeasurementValue::Text(s) => f.write_str(s),
            MeasurementValue::Bool(b) => write!(f, "{}", b),
            MeasurementValue::Null => f.write_str("null"),
            other => write!(f, "{}", other.to_json()),
        }
    }
}

impl From<Value> for MeasurementValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => MeasurementValue::Null,
            Value::Bool(b) => MeasurementValue::Bool(b),
            Value::Number(n) => n
                .as_f64()
                .map(MeasurementValue::Number)
                .unwrap_or_else(|| MeasurementValue::Text(n.to_string())),
            Value::String(s) => MeasurementValue::Text(s),
            Value::Array(items) => {
                MeasurementValue::Sequence(items.into_iter().map(Self::from).collect())
            }
            Value::Object(map) => {
                MeasurementValue::Map(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<f64> for MeasurementValue {
    fn from(value: f64) -> Self {
        MeasurementValue::Number(value)
    }
}

impl From<i64> for MeasurementValue {
    fn from(value: i64) -> Self {
        MeasurementValue::Number(value as f64)
    }
}

impl From<bool> for MeasurementValue {
    fn from(value: bool) -> Self {
        MeasurementValue::Bool(value)
    }
}

impl From<&str> for MeasurementValue {
    fn from(value: &str) -> Self {
        MeasurementValue::Text(value.to_string())
    }
}

impl From<String> for MeasurementValue {
    fn from(value: String) -> Self {
        MeasurementValue::Text(value)
    }
}

impl From<Vec<f64>> for MeasurementValue {
    fn from(values: Vec<f64>) -> Self {
        MeasurementValue::Sequence(values.into_iter().map(MeasurementValue::Number).collect())
    }
}

impl From<Vec<&str>> for MeasurementValue {
    fn from(values: Vec<&str>) -> Self {
        MeasurementValue::Sequence(values.into_iter().map(MeasurementValue::from).collect())
    }
}

impl From<Vec<MeasurementValue>> for MeasurementValue {
    fn from(values: Vec<MeasurementValue>) -> Self {
        MeasurementValue::Sequence(values)
    }
}

/// Read-only measurement store for one analysed file
///
/// Keys may be full dotted paths (`"rhythm.bpm"`, as in a flattened pool) or
/// single segments holding nested maps (`{"rhythm": {"bpm": ..}}`, as in the
/// extractor's JSON output). Lookups handle both layouts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasurementStore {
    root: BTreeMap<String, MeasurementValue>,
}

impl MeasurementStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value under a literal key
    pub fn insert(&mut self, path: impl Into<String>, value: impl Into<MeasurementValue>) {
        self.root.insert(path.into(), value.into());
    }

    /// Builder-style insert
    pub fn with(mut self, path: impl Into<String>, value: impl Into<MeasurementValue>) -> Self {
        self.insert(path, value);
        self
    }

    /// Build a store from a parsed JSON document (must be an object)
    pub fn from_json(value: Value) -> Result<Self, FeatureError> {
        match MeasurementValue::from(value) {
            MeasurementValue::Map(root) => Ok(Self { root }),
            other => Err(FeatureError::InvalidStore(format!(
                "expected a JSON object at the top level, got {}",
                kind_name(&other)
            ))),
        }
    }

    /// Parse a store from JSON text
    pub fn from_json_str(text: &str) -> Result<Self, FeatureError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_json(value)
    }

    /// Look up a dotted path
    pub fn get(&self, path: &str) -> Option<&MeasurementValue> {
        lookup(&self.root, path)
    }

    /// Whether a dotted path resolves
    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Number of top-level entries
    pub fn len(&self) -> usize {
        self.root.len()
    }

    /// Whether the store has no entries
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
}

fn lookup<'a>(map: &'a BTreeMap<String, MeasurementValue>, path: &str) -> Option<&'a MeasurementValue> {
    if let Some(value) = map.get(path) {
        return Some(value);
    }

    // Try every split point so keys that themselves contain dots still resolve.
    for (idx, _) in path.match_indices('.') {
        let (head, rest) = (&path[..idx], &path[idx + 1..]);
        if let Some(MeasurementValue::Map(child)) = map.get(head) {
            if let Some(found) = lookup(child, rest) {
                return Some(found);
            }
        }
    }
    None
}

fn kind_name(value: &MeasurementValue) -> &'static str {
    match value {
        MeasurementValue::Number(_) => "number",
        MeasurementValue::Text(_) => "string",
        MeasurementValue::Bool(_) => "bool",
        MeasurementValue::Sequence(_) => "array",
        MeasurementValue::Map(_) => "object",
        MeasurementValue::Null => "null",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flat_key_lookup() {
        let store = MeasurementStore::new().with("rhythm.bpm", 120.0);
        assert_eq!(store.get("rhythm.bpm"), Some(&MeasurementValue::Number(120.0)));
        assert!(store.get("rhythm.danceability").is_none());
    }

    #[test]
    fn test_nested_lookup() {
        let store = MeasurementStore::from_json(json!({
            "tonal": { "key_edma": { "key": "C", "scale": "major" } },
            "lowlevel": { "mfcc": { "mean": [1.0, 2.0] } }
        }))
        .unwrap();

        assert_eq!(store.get("tonal.key_edma.key"), Some(&MeasurementValue::Text("C".into())));
        assert_eq!(
            store.get("lowlevel.mfcc.mean"),
            Some(&MeasurementValue::from(vec![1.0, 2.0]))
        );
        assert!(store.get("tonal.key_edma.strength").is_none());
        assert!(store.get("tonal.key_edma.key.extra").is_none());
    }

    #[test]
    fn test_mixed_dotted_and_nested_keys() {
        let store = MeasurementStore::from_json(json!({
            "metadata": { "audio_properties.length": 200.5 }
        }))
        .unwrap();
        assert_eq!(
            store.get("metadata.audio_properties.length").and_then(|v| v.as_f64()),
            Some(200.5)
        );
    }

    #[test]
    fn test_rejects_non_object_document() {
        let err = MeasurementStore::from_json(json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, FeatureError::InvalidStore(_)));
    }

    #[test]
    fn test_display_forms() {
        assert_eq!(MeasurementValue::Text("a".into()).to_string(), "a");
        assert_eq!(MeasurementValue::Bool(true).to_string(), "true");
        assert_eq!(MeasurementValue::Number(4.0).to_string(), "4.0");
        assert_eq!(MeasurementValue::Number(-0.25).to_string(), "-0.25");
        assert_eq!(MeasurementValue::from(vec![1.5, 2.0]).to_string(), "[1.5,2.0]");
        let map = MeasurementValue::from(json!({"a": 1}));
        assert_eq!(map.to_string(), r#"{"a":1.0}"#);
    }
}
