use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::dataset::DatasetName;

/// Error type for fetching, indexing, and index persistence failures.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("failed to fetch dataset '{dataset}': {reason}")]
    Fetch { dataset: DatasetName, reason: String },
    #[error("malformed corpus at {}: {details}", path.display())]
    MalformedCorpus { path: PathBuf, details: String },
    #[error("malformed transcript {} (line {line}): {details}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        details: String,
    },
    #[error("no persisted index at {}", path.display())]
    NotFound { path: PathBuf },
    #[error("persisted index {} is corrupt: {reason}", path.display())]
    CorruptIndex { path: PathBuf, reason: String },
    #[error("{} does not exist; make sure the dataset is downloaded first", path.display())]
    DatasetMissing { path: PathBuf },
    #[error("unknown dataset name '{0}'")]
    UnknownDataset(String),
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error(transparent)]
    Walk(#[from] walkdir::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("dataset '{dataset}': {source}")]
    Dataset {
        dataset: DatasetName,
        #[source]
        source: Box<CorpusError>,
    },
}

impl CorpusError {
    /// Attach the dataset being processed to an error.
    pub fn in_dataset(self, dataset: DatasetName) -> Self {
        match self {
            already @ CorpusError::Dataset { .. } => already,
            other => CorpusError::Dataset {
                dataset,
                source: Box::new(other),
            },
        }
    }

    /// The innermost error, skipping any dataset context wrappers.
    pub fn root_cause(&self) -> &CorpusError {
        match self {
            CorpusError::Dataset { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
