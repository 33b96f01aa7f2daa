use std::io;
use std::path::PathBuf;

use snapmap_core::ContentError;

use crate::config::ConfigFileError;

/// A convenience [`Result`] for the snapmap crate.
pub type SnapmapResult<T> = Result<T, SnapmapError>;

#[derive(thiserror::Error, Debug)]
pub enum SnapmapError {
    #[error(transparent)]
    ConfigFileError(#[from] ConfigFileError),

    #[error(transparent)]
    ContentError(#[from] ContentError),

    #[error("Unable to read replay steps from {1}: {0}")]
    ReplayReadError(#[source] io::Error, PathBuf),

    #[error("Unable to parse replay steps from {1}: {0}")]
    ReplayParseError(#[source] serde_yaml::Error, PathBuf),

    #[error("Unable to write output: {0}")]
    OutputError(#[from] io::Error),

    #[error("Unable to serialize output: {0}")]
    SerializationError(#[from] serde_json::Error),
}
