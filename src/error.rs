use std::path::PathBuf;
use thiserror::Error;

/// The main error type for labelpush operations.
#[derive(Debug, Error)]
pub enum LabelpushError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("'{path}' is not a directory")]
    NotADirectory { path: PathBuf },

    #[error("cannot derive a dataset name from '{path}'")]
    EmptyDatasetName { path: PathBuf },

    #[error("Failed to open manifest {path}: {source}")]
    ManifestOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse manifest {path}: {source}")]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The service refused an individual image during upload. This is the
    /// only error a batch loop catches; everything else aborts the run.
    #[error("service rejected image {path}: {reason}")]
    ImageRejected { path: PathBuf, reason: String },

    #[error("{operation} failed with status {status}: {message}")]
    Api {
        operation: &'static str,
        status: u16,
        message: String,
    },

    #[error("{operation} request failed: {message}")]
    Transport {
        operation: &'static str,
        message: String,
    },

    #[error("invalid base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}
