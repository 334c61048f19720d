//! Flat Feature Records

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt;

/// Normalized scalar stored in one output column
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FeatureValue {
    /// Numeric value
    Number(f64),
    /// Categorical or fallback string value
    Text(String),
    /// No data for this field (distinct from zero or empty string)
    Missing,
}

impl FeatureValue {
    /// Numeric value, if present and numeric
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FeatureValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// String value, if present and textual
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FeatureValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Whether this is the missing marker
    pub fn is_missing(&self) -> bool {
        matches!(self, FeatureValue::Missing)
    }

    /// Render as a tabular cell; the missing marker becomes an empty cell
    pub fn to_cell(&self) -> String {
        match self {
            FeatureValue::Missing => String::new(),
            other => other.to_string(),
        }
    }

    /// Parse a tabular cell back into a value
    ///
    /// Empty and `NaN` cells are missing. Text that looks numeric parses as a
    /// number.
    pub fn from_cell(cell: &str) -> Self {
        if cell.is_empty() {
            return FeatureValue::Missing;
        }
        match cell.parse::<f64>() {
            Ok(n) if n.is_nan() => FeatureValue::Missing,
            Ok(n) => FeatureValue::Number(n),
            Err(_) => FeatureValue::Text(cell.to_string()),
        }
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Number(n) => write!(f, "{}", n),
            FeatureValue::Text(s) => f.write_str(s),
            FeatureValue::Missing => f.write_str("<missing>"),
        }
    }
}

impl From<f64> for FeatureValue {
    fn from(value: f64) -> Self {
        FeatureValue::Number(value)
    }
}

impl From<&str> for FeatureValue {
    fn from(value: &str) -> Self {
        FeatureValue::Text(value.to_string())
    }
}

impl From<String> for FeatureValue {
    fn from(value: String) -> Self {
        FeatureValue::Text(value)
    }
}

/// One flattened row: output field name to scalar value, in schema order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureRecord {
    fields: Vec<(String, FeatureValue)>,
}

impl FeatureRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty record with room for `capacity` fields
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Append a field
    pub fn push(&mut self, name: impl Into<String>, value: FeatureValue) {
        self.fields.push((name.into(), value));
    }

    /// Value for a field name
    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Field names in order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    /// Field values in order
    pub fn values(&self) -> impl Iterator<Item = &FeatureValue> {
        self.fields.iter().map(|(_, v)| v)
    }

    /// (name, value) pairs in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeatureValue)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for FeatureRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nan_cell_reads_as_missing() {
        assert_eq!(FeatureValue::from_cell("NaN"), FeatureValue::Missing);
        assert_eq!(FeatureValue::from_cell("nan"), FeatureValue::Missing);
        assert_eq!(FeatureValue::from_cell("inf"), FeatureValue::Number(f64::INFINITY));
        assert_eq!(FeatureValue::from_cell("1"), FeatureValue::Number(1.0));
    }

    #[test]
    fn test_cell_conversion() {
        assert_eq!(FeatureValue::Missing.to_cell(), "");
        assert_eq!(FeatureValue::Number(120.5).to_cell(), "120.5");
        assert_eq!(FeatureValue::Text("C".into()).to_cell(), "C");

        assert_eq!(FeatureValue::from_cell(""), FeatureValue::Missing);
        assert_eq!(FeatureValue::from_cell("3"), FeatureValue::Number(3.0));
        assert_eq!(FeatureValue::from_cell("minor"), FeatureValue::Text("minor".into()));
    }

    #[test]
    fn test_record_keeps_insertion_order() {
        let mut record = FeatureRecord::new();
        record.push("song_name", "a.wav".into());
        record.push("tempo", 128.0.into());
        record.push("key", FeatureValue::Missing);

        assert_eq!(record.names().collect::<Vec<_>>(), vec!["song_name", "tempo", "key"]);
        assert_eq!(record.get("tempo"), Some(&FeatureValue::Number(128.0)));
        assert!(record.get("mode").is_none());
    }

    #[test]
    fn test_record_serializes_as_ordered_object() {
        let mut record = FeatureRecord::new();
        record.push("tempo", 90.0.into());
        record.push("key", FeatureValue::Missing);
        record.push("mode", "minor".into());

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"tempo":90.0,"key":null,"mode":"minor"}"#);
    }
}
