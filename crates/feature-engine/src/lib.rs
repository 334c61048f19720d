//! Feature Engine
//!
//! Flattens the nested, loosely-shaped measurement store produced by an audio
//! analysis engine into fixed-schema scalar records ready for tabular storage.

mod dataset;
mod error;
mod flatten;
mod measurement;
mod record;
mod schema;

pub use dataset::Dataset;
pub use error::FeatureError;
pub use flatten::{base_name, flatten, flatten_path, reduce, FeatureFlattener};
pub use measurement::{MeasurementStore, MeasurementValue};
pub use record::{FeatureRecord, FeatureValue};
pub use schema::{FieldEntry, FieldSource, FieldSpec, FILE_NAME_SOURCE};
