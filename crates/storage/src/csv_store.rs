//! CSV Dataset Store

use crate::StorageError;
use feature_engine::{Dataset, FeatureRecord, FeatureValue};
use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use tracing::{debug, info};

/// Write a dataset as CSV; missing values become empty cells
pub fn write_dataset<W: Write>(dataset: &Dataset, writer: W) -> Result<(), StorageError> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(dataset.columns())?;
    for record in dataset.records() {
        out.write_record(record.values().map(FeatureValue::to_cell))?;
    }
    out.flush()?;
    Ok(())
}

/// Read a dataset from CSV written by [`write_dataset`]
///
/// Empty cells read back as missing, numeric cells as numbers and everything
/// else as text. The round trip is lossy for text: an empty string comes back
/// missing and numeric-looking text (e.g. a `"1"` fallback) comes back as a
/// number. `NaN` cells read as missing.
pub fn read_dataset<R: Read>(reader: R) -> Result<Dataset, StorageError> {
    let mut input = csv::Reader::from_reader(reader);
    let columns: Vec<String> = input.headers()?.iter().map(str::to_string).collect();
    if columns.is_empty() {
        return Err(StorageError::MissingHeader);
    }

    let mut dataset = Dataset::new(columns.clone());
    for row in input.records() {
        let row = row?;
        let mut record = FeatureRecord::with_capacity(columns.len());
        for (name, cell) in columns.iter().zip(row.iter()) {
            record.push(name.clone(), FeatureValue::from_cell(cell));
        }
        dataset.push(record)?;
    }
    Ok(dataset)
}

/// Save a dataset to `path`, replacing any previous file
///
/// The table is written to a sibling temporary file first and renamed into
/// place, so readers never observe a half-written table.
pub fn save_dataset(dataset: &Dataset, path: &Path) -> Result<(), StorageError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".partial");
    let tmp_path = Path::new(&tmp_name);

    debug!("Writing {} rows to {}", dataset.len(), tmp_path.display());
    write_dataset(dataset, BufWriter::new(File::create(tmp_path)?))?;
    fs::rename(tmp_path, path)?;

    info!(
        "Saved {} rows x {} columns to {}",
        dataset.len(),
        dataset.columns().len(),
        path.display()
    );
    Ok(())
}

/// Load a dataset from a CSV file
pub fn load_dataset(path: &Path) -> Result<Dataset, StorageError> {
    let dataset = read_dataset(File::open(path)?)?;
    info!("Loaded {} rows from {}", dataset.len(), path.display());
    Ok(dataset)
}
