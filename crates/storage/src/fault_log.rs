//! Fault Log
//!
//! One JSON object per line, so partial logs stay readable.

use crate::StorageError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Write entries as JSON lines, replacing any previous log
pub fn write_fault_log<T: Serialize>(entries: &[T], path: &Path) -> Result<(), StorageError> {
    let mut out = BufWriter::new(File::create(path)?);
    for entry in entries {
        let line = serde_json::to_string(entry)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        writeln!(out, "{}", line)?;
    }
    out.flush()?;
    info!("Wrote {} faults to {}", entries.len(), path.display());
    Ok(())
}

/// Read a JSON lines log, skipping blank lines
pub fn read_fault_log<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StorageError> {
    let reader = BufReader::new(File::open(path)?);
    let mut entries = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let entry = serde_json::from_str(&line)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        entries.push(entry);
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Fault {
        path: String,
        message: String,
    }

    #[test]
    fn test_fault_log_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("faults.jsonl");
        let faults = vec![
            Fault { path: "a.mp3".into(), message: "decode error".into() },
            Fault { path: "b.wav".into(), message: "unsupported codec".into() },
        ];

        write_fault_log(&faults, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 2);

        let back: Vec<Fault> = read_fault_log(&path).unwrap();
        assert_eq!(back, faults);
    }
}
