//! Dataset Assembly

use crate::error::FeatureError;
use crate::record::{FeatureRecord, FeatureValue};
use crate::schema::FieldSpec;
use serde::Serialize;

/// Ordered rows sharing one column layout
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dataset {
    columns: Vec<String>,
    records: Vec<FeatureRecord>,
}

impl Dataset {
    /// Create an empty dataset with the given columns
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            records: Vec::new(),
        }
    }

    /// Create an empty dataset laid out like a field spec
    pub fn for_spec(spec: &FieldSpec) -> Self {
        Self::new(spec.output_names())
    }

    /// Append a record whose columns must match the dataset's
    pub fn push(&mut self, record: FeatureRecord) -> Result<(), FeatureError> {
        if !record.names().eq(self.columns.iter().map(String::as_str)) {
            return Err(FeatureError::SchemaMismatch {
                expected: self.columns.clone(),
                actual: record.names().map(str::to_string).collect(),
            });
        }
        self.records.push(record);
        Ok(())
    }

    /// Column names in order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in insertion order
    pub fn records(&self) -> &[FeatureRecord] {
        &self.records
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether there are no rows
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether a column exists
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// All values of one column, or None if the column is unknown
    pub fn column(&self, name: &str) -> Option<Vec<&FeatureValue>> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(
            self.records
                .iter()
                .filter_map(|r| r.values().nth(idx))
                .collect(),
        )
    }

    /// New dataset with the same columns and only the rows accepted by `keep`
    pub fn filter<F>(&self, mut keep: F) -> Dataset
    where
        F: FnMut(&FeatureRecord) -> bool,
    {
        Dataset {
            columns: self.columns.clone(),
            records: self.records.iter().filter(|r| keep(*r)).cloned().collect(),
        }
    }
}
