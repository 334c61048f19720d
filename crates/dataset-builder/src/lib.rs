//! Dataset Builder
//!
//! Drives the extraction collaborator over a set of audio files, flattens each
//! measurement store and accumulates the rows into a [`Dataset`].
//!
//! [`Dataset`]: feature_engine::Dataset

mod builder;
mod error;
mod progress;
mod scanner;

pub use builder::{BuildReport, BuilderConfig, DatasetBuilder, FailurePolicy, FileFault};
pub use error::{BuildError, ScanError};
pub use progress::{NullObserver, ProgressObserver, TracingObserver};
pub use scanner::{scan_audio_dir, DEFAULT_EXTENSIONS};
