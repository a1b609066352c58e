//! Data sources for an analysis cycle.
//!
//! A source hands the analyzers already-fetched, already-deserialized
//! records. Fetching, pagination and auth against upstream trackers live
//! outside this crate; a source either returns a (possibly partial)
//! [`Dataset`] or a [`SourceError`].

mod sample;

pub use sample::SampleSource;

use crate::models::Dataset;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

/// Errors raised while loading a dataset.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Dataset file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read dataset {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse dataset {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Data source unavailable: {0}")]
    Unavailable(String),
}

/// Anything that can supply one cycle's records.
pub trait DataSource {
    /// Human-readable description, used in logs and report metadata.
    fn describe(&self) -> String;

    /// Load the dataset. Implementations return records as-is; callers
    /// normalize before analysis.
    fn load(&self) -> Result<Dataset, SourceError>;
}

/// Reads a JSON dataset from disk.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DataSource for JsonFileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Dataset, SourceError> {
        if !self.path.exists() {
            return Err(SourceError::NotFound(self.path.clone()));
        }
        if self.path.is_dir() {
            return Err(SourceError::Unavailable(format!(
                "{} is a directory, expected a JSON file",
                self.path.display()
            )));
        }

        debug!("Reading dataset from {}", self.path.display());
        let content = std::fs::read_to_string(&self.path).map_err(|source| SourceError::Read {
            path: self.path.clone(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| SourceError::Parse {
            path: self.path.clone(),
            source,
        })
    }
}

/// Load, normalize and trim a dataset so it is ready for analysis.
///
/// `history_limit` keeps only the most recent sprints; zero keeps them all.
pub fn load_dataset(source: &dyn DataSource, history_limit: usize) -> Result<Dataset, SourceError> {
    let dataset = source.load()?.normalized().with_recent_sprints(history_limit);

    info!(
        "Loaded {} sprints, {} daily updates, {} workload and {} goal records from {}",
        dataset.sprints.len(),
        dataset.daily_updates.len(),
        dataset.workload.len(),
        dataset.goals.len(),
        source.describe()
    );

    Ok(dataset)
}
