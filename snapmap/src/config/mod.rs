mod env;
pub use env::{Env, FauxEnv, OsEnv};

mod error;
pub use error::{ConfigFileError, ConfigFileResult};

mod main;
pub use main::{
    Config, UnrecognizedKeys, UnrecognizedValues, ViewportConfig, ZOOM_RANGE, parse_config,
    read_config,
};
