//! Feature Flattening
//!
//! Reduces every measurement named by a [`FieldSpec`] to a single scalar.
//! Absent paths become [`FeatureValue::Missing`] and unusual shapes degrade to
//! strings, so flattening never fails.

use crate::measurement::{MeasurementStore, MeasurementValue};
use crate::record::{FeatureRecord, FeatureValue};
use crate::schema::{FieldSource, FieldSpec};
use std::path::Path;
use tracing::{debug, trace};

/// Flattener bound to one output schema
#[derive(Debug, Clone)]
pub struct FeatureFlattener {
    spec: FieldSpec,
}

impl FeatureFlattener {
    /// Create a flattener for the given schema
    pub fn new(spec: FieldSpec) -> Self {
        Self { spec }
    }

    /// Flatten one store into a record
    pub fn flatten(&self, store: &MeasurementStore, file_identifier: &str) -> FeatureRecord {
        flatten(store, file_identifier, &self.spec)
    }
}

impl Default for FeatureFlattener {
    fn default() -> Self {
        Self::new(FieldSpec::music_default())
    }
}

/// Produce exactly one record with the spec's columns, in spec order
pub fn flatten(store: &MeasurementStore, file_identifier: &str, spec: &FieldSpec) -> FeatureRecord {
    flatten_named(store, &base_name(file_identifier), file_identifier, spec)
}

/// Like [`flatten`], taking the file name from a filesystem path
///
/// Only the platform's own separators split the path, so a Unix file named
/// `a\b.mp3` keeps its full name.
pub fn flatten_path(store: &MeasurementStore, path: &Path, spec: &FieldSpec) -> FeatureRecord {
    let identifier = path.to_string_lossy();
    let name = match path.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => base_name(&identifier),
    };
    flatten_named(store, &name, &identifier, spec)
}

fn flatten_named(store: &MeasurementStore, file_name: &str, file_identifier: &str, spec: &FieldSpec) -> FeatureRecord {
    let mut record = FeatureRecord::with_capacity(spec.len());
    let mut missing = 0usize;

    for entry in spec.entries() {
        let value = match &entry.source {
            FieldSource::FileName => FeatureValue::Text(file_name.to_string()),
            FieldSource::Path(path) => match store.get(path) {
                Some(raw) => reduce(raw),
                None => {
                    trace!("{}: no measurement at {}", file_identifier, path);
                    FeatureValue::Missing
                }
            },
        };
        if value.is_missing() {
            missing += 1;
        }
        record.push(entry.name.clone(), value);
    }

    debug!(
        "Flattened {} into {} fields ({} missing)",
        file_identifier,
        record.len(),
        missing
    );
    record
}

/// Collapse a measurement of any shape into a scalar
///
/// Sequences: empty is missing, a single element is unwrapped, longer numeric
/// sequences (nested ones included) average over all their numbers, and
/// anything non-numeric falls back to the string form of the first element.
pub fn reduce(value: &MeasurementValue) -> FeatureValue {
    match value {
        MeasurementValue::Sequence(items) => match items.as_slice() {
            [] => FeatureValue::Missing,
            [only] => reduce_scalar(only),
            [first, ..] => match mean(items) {
                Some(avg) => FeatureValue::Number(avg),
                None => FeatureValue::Text(first.to_string()),
            },
        },
        other => reduce_scalar(other),
    }
}

fn reduce_scalar(value: &MeasurementValue) -> FeatureValue {
    match value {
        MeasurementValue::Number(n) => FeatureValue::Number(*n),
        MeasurementValue::Text(s) => FeatureValue::Text(s.clone()),
        MeasurementValue::Null => FeatureValue::Missing,
        other => FeatureValue::Text(other.to_string()),
    }
}

fn mean(items: &[MeasurementValue]) -> Option<f64> {
    let (mut sum, mut count) = (0.0, 0usize);
    accumulate(items, &mut sum, &mut count)?;
    if count == 0 {
        return None;
    }
    Some(sum / count as f64)
}

/// Sum the numeric leaves of a possibly nested sequence; None on any other leaf
fn accumulate(items: &[MeasurementValue], sum: &mut f64, count: &mut usize) -> Option<()> {
    for item in items {
        match item {
            MeasurementValue::Sequence(inner) => accumulate(inner, sum, count)?,
            leaf => {
                *sum += leaf.as_f64()?;
                *count += 1;
            }
        }
    }
    Some(())
}

/// File name with any directory prefix removed
pub fn base_name(file_identifier: &str) -> String {
    file_identifier
        .rsplit(&['/', '\\'][..])
        .next()
        .unwrap_or(file_identifier)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldEntry;
    use proptest::prelude::*;
    use serde_json::json;

    fn scenario_spec() -> FieldSpec {
        FieldSpec::new(vec![
            FieldEntry::new(FieldSource::FileName, "song_name"),
            FieldEntry::new("rhythm.bpm", "tempo"),
            FieldEntry::new("tonal.key_edma.key", "key"),
            FieldEntry::new("lowlevel.mfcc.mean", "mfcc_mean"),
        ])
        .unwrap()
    }

    #[test]
    fn test_track_scenario() {
        let store = MeasurementStore::new()
            .with("rhythm.bpm", vec![120.0])
            .with("tonal.key_edma.key", "C")
            .with("lowlevel.mfcc.mean", vec![1.0, 3.0, 5.0]);

        let record = flatten(&store, "track1.mp3", &scenario_spec());

        assert_eq!(
            record.iter().collect::<Vec<_>>(),
            vec![
                ("song_name", &FeatureValue::Text("track1.mp3".into())),
                ("tempo", &FeatureValue::Number(120.0)),
                ("key", &FeatureValue::Text("C".into())),
                ("mfcc_mean", &FeatureValue::Number(3.0)),
            ]
        );
    }

    #[test]
    fn test_absent_path_is_missing() {
        let record = flatten(&MeasurementStore::new(), "x.wav", &scenario_spec());
        assert_eq!(record.len(), 4);
        assert!(record.get("tempo").unwrap().is_missing());
        assert!(record.get("key").unwrap().is_missing());
        assert_eq!(record.get("song_name"), Some(&FeatureValue::Text("x.wav".into())));
    }

    #[test]
    fn test_sequence_reduction() {
        assert_eq!(reduce(&MeasurementValue::Sequence(vec![])), FeatureValue::Missing);
        assert_eq!(reduce(&vec![7.5].into()), FeatureValue::Number(7.5));
        assert_eq!(reduce(&vec![1.0, 2.0, 3.0].into()), FeatureValue::Number(2.0));
        assert_eq!(reduce(&vec!["a", "b"].into()), FeatureValue::Text("a".into()));
        assert_eq!(reduce(&vec!["only"].into()), FeatureValue::Text("only".into()));
    }

    #[test]
    fn test_mixed_sequence_uses_first_element_string() {
        let mixed = MeasurementValue::Sequence(vec![
            MeasurementValue::Number(4.0),
            MeasurementValue::Text("x".into()),
        ]);
        assert_eq!(reduce(&mixed), FeatureValue::Text("4.0".into()));
    }

    #[test]
    fn test_matrix_averages_all_entries() {
        let matrix = MeasurementValue::Sequence(vec![vec![1.0, 2.0].into(), vec![3.0, 4.0].into()]);
        assert_eq!(reduce(&matrix), FeatureValue::Number(2.5));

        let ragged = MeasurementValue::Sequence(vec![vec![1.0].into(), vec![2.0, 3.0, 6.0].into()]);
        assert_eq!(reduce(&ragged), FeatureValue::Number(3.0));

        let with_text = MeasurementValue::Sequence(vec![vec![1.0, 2.0].into(), vec!["x"].into()]);
        assert_eq!(reduce(&with_text), FeatureValue::Text("[1.0,2.0]".into()));

        let empty_rows = MeasurementValue::Sequence(vec![
            MeasurementValue::Sequence(vec![]),
            MeasurementValue::Sequence(vec![]),
        ]);
        assert_eq!(reduce(&empty_rows), FeatureValue::Text("[]".into()));
    }

    #[cfg(unix)]
    #[test]
    fn test_path_keeps_backslash_in_unix_file_name() {
        let spec = scenario_spec();
        let record = flatten_path(&MeasurementStore::new(), Path::new("/music/a\\b.mp3"), &spec);
        assert_eq!(record.get("song_name"), Some(&FeatureValue::Text("a\\b.mp3".into())));

        let record = flatten_path(&MeasurementStore::new(), Path::new("/music/track1.mp3"), &spec);
        assert_eq!(record.get("song_name"), Some(&FeatureValue::Text("track1.mp3".into())));
    }

    #[test]
    fn test_scalars_pass_through() {
        assert_eq!(reduce(&MeasurementValue::Number(-3.25)), FeatureValue::Number(-3.25));
        assert_eq!(reduce(&"minor".into()), FeatureValue::Text("minor".into()));
        assert_eq!(reduce(&MeasurementValue::Null), FeatureValue::Missing);
    }

    #[test]
    fn test_other_shapes_are_stringified() {
        assert_eq!(reduce(&MeasurementValue::Bool(false)), FeatureValue::Text("false".into()));

        let nested = MeasurementValue::from(json!({"mean": 1.5}));
        assert_eq!(reduce(&nested), FeatureValue::Text(r#"{"mean":1.5}"#.into()));

        let boxed = MeasurementValue::Sequence(vec![vec![1.0, 2.0].into()]);
        assert_eq!(reduce(&boxed), FeatureValue::Text("[1.0,2.0]".into()));
    }

    #[test]
    fn test_base_name_strips_directories() {
        assert_eq!(base_name("/a/b/song.wav"), "song.wav");
        assert_eq!(base_name("song.wav"), "song.wav");
        assert_eq!(base_name("music/deep/er/track.MP3"), "track.MP3");
        assert_eq!(base_name(r"C:\music\track.mp3"), "track.mp3");
    }

    #[test]
    fn test_default_flattener_against_essentia_document() {
        let store = MeasurementStore::from_json(json!({
            "metadata": { "audio_properties": { "length": 183.2 } },
            "rhythm": { "bpm": 128.0, "danceability": 1.21 },
            "lowlevel": {
                "average_loudness": 0.93,
                "mfcc": { "mean": [-700.0, 100.0, 0.0] },
                "melbands": { "mean": [] }
            },
            "tonal": { "key_edma": { "key": "F#", "scale": "minor", "strength": 0.8 } }
        }))
        .unwrap();

        let record = FeatureFlattener::default().flatten(&store, "/music/hit.wav");

        assert_eq!(record.len(), 11);
        assert_eq!(record.get("song_name"), Some(&FeatureValue::Text("hit.wav".into())));
        assert_eq!(record.get("duration"), Some(&FeatureValue::Number(183.2)));
        assert_eq!(record.get("mode"), Some(&FeatureValue::Text("minor".into())));
        assert_eq!(record.get("mfcc_mean"), Some(&FeatureValue::Number(-200.0)));
        assert!(record.get("melbands_mean").unwrap().is_missing());
        assert!(record.get("dynamic_complexity").unwrap().is_missing());
    }

    fn arb_value() -> impl Strategy<Value = MeasurementValue> {
        let leaf = prop_oneof![
            any::<f64>().prop_map(MeasurementValue::Number),
            "[a-z]{0,6}".prop_map(MeasurementValue::Text),
            any::<bool>().prop_map(MeasurementValue::Bool),
            Just(MeasurementValue::Null),
        ];
        leaf.prop_recursive(3, 16, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(MeasurementValue::Sequence),
                prop::collection::btree_map("[a-z]{1,3}", inner, 0..3).prop_map(MeasurementValue::Map),
            ]
        })
    }

    fn arb_store() -> impl Strategy<Value = MeasurementStore> {
        prop::collection::vec(("[a-c]{1,2}(\\.[a-c]{1,2}){0,2}", arb_value()), 0..8).prop_map(|pairs| {
            let mut store = MeasurementStore::new();
            for (path, value) in pairs {
                store.insert(path, value);
            }
            store
        })
    }

    fn arb_spec() -> impl Strategy<Value = FieldSpec> {
        prop::collection::btree_set("[a-z]{1,8}", 1..8).prop_flat_map(|names| {
            let names: Vec<String> = names.into_iter().collect();
            let n = names.len();
            prop::collection::vec(
                prop_oneof![
                    Just(FieldSource::FileName),
                    "[a-c]{1,2}(\\.[a-c]{1,2}){0,2}".prop_map(FieldSource::Path),
                ],
                n,
            )
            .prop_map(move |sources| {
                let entries = sources
                    .into_iter()
                    .zip(names.iter().cloned())
                    .map(|(source, name)| FieldEntry { source, name })
                    .collect();
                FieldSpec::new(entries).unwrap()
            })
        })
    }

    proptest! {
        #[test]
        fn prop_record_columns_match_spec(
            store in arb_store(),
            spec in arb_spec(),
            file in "(/[a-z]{1,4}){0,3}/[a-z]{1,6}\\.wav",
        ) {
            let record = flatten(&store, &file, &spec);
            let names: Vec<String> = record.names().map(str::to_string).collect();
            prop_assert_eq!(names, spec.output_names());
        }

        #[test]
        fn prop_values_are_scalar(store in arb_store(), spec in arb_spec()) {
            let record = flatten(&store, "a/b/c.mp3", &spec);
            for value in record.values() {
                prop_assert!(matches!(
                    value,
                    FeatureValue::Number(_) | FeatureValue::Text(_) | FeatureValue::Missing
                ));
            }
        }

        #[test]
        fn prop_flatten_is_idempotent(store in arb_store(), spec in arb_spec()) {
            let first = flatten(&store, "dir/song.wav", &spec);
            let second = flatten(&store, "dir/song.wav", &spec);
            // NaN != NaN, so compare the debug form
            prop_assert_eq!(format!("{:?}", first), format!("{:?}", second));
        }

        #[test]
        fn prop_numeric_sequences_average(values in prop::collection::vec(-1e6f64..1e6, 2..10)) {
            let expected = values.iter().sum::<f64>() / values.len() as f64;
            let reduced = reduce(&values.clone().into());
            prop_assert!((reduced.as_f64().unwrap() - expected).abs() < 1e-6);
        }
    }
}
