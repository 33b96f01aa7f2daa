use std::path::PathBuf;

use snapmap_geo_utils::ViewportError;

pub type ConfigFileResult<T> = Result<T, ConfigFileError>;

#[derive(thiserror::Error, Debug)]
pub enum ConfigFileError {
    #[error("Unable to load config file {1}: {0}")]
    ConfigLoadError(#[source] std::io::Error, PathBuf),

    #[error("Unable to parse config file {1}: {0}")]
    ConfigParseError(#[source] subst::yaml::Error, PathBuf),

    #[error("Unable to write config file {1}: {0}")]
    ConfigWriteError(#[source] std::io::Error, PathBuf),

    #[error("Unable to serialize the configuration: {0}")]
    ConfigSerializeError(#[source] serde_yaml::Error),

    #[error("Overlay {0} uses a file that does not exist: {1}")]
    InvalidOverlayFile(String, PathBuf),

    #[error("Overlay {0} is listed more than once in {1}")]
    DuplicateOverlay(String, &'static str),

    #[error("Zoom level {0} is outside of the configurable range 1..=22")]
    InvalidZoom(f64),

    #[error("Invalid viewport: {0}")]
    InvalidViewport(#[from] ViewportError),

    #[error("Expected NAME=PATH, but got '{0}'")]
    InvalidNamedPath(String),

    #[error("Expected LAT,LON, but got '{0}'")]
    InvalidCenter(String),
}
