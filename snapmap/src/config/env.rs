//! Environment access for configuration substitution.
//!
//! - [`OsEnv`] reads the process environment
//! - [`FauxEnv`] is a fixed map for tests

use std::collections::HashMap;
use std::ffi::OsString;

use subst::VariableMap;
use tracing::warn;

/// Environment variable lookup used by `${VAR}` substitution in config files.
pub trait Env<'a>: VariableMap<'a> {
    fn var_os(&self, key: &str) -> Option<OsString>;

    /// The variable as UTF-8. Variables with invalid unicode are reported and treated as unset.
    #[must_use]
    fn get_env_str(&self, key: &str) -> Option<String> {
        let value = self.var_os(key)?;
        match value.into_string() {
            Ok(v) => Some(v),
            Err(v) => {
                let v = v.to_string_lossy();
                warn!("Environment variable {key} has invalid unicode. Lossy representation: {v}");
                None
            }
        }
    }
}

/// The process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsEnv;

impl Env<'_> for OsEnv {
    fn var_os(&self, key: &str) -> Option<OsString> {
        std::env::var_os(key)
    }
}

impl<'a> VariableMap<'a> for OsEnv {
    type Value = String;

    fn get(&'a self, key: &str) -> Option<Self::Value> {
        std::env::var(key).ok()
    }
}

/// A fixed set of variables.
#[derive(Debug, Default)]
pub struct FauxEnv(pub HashMap<&'static str, OsString>);

impl<'a> VariableMap<'a> for FauxEnv {
    type Value = String;

    fn get(&'a self, key: &str) -> Option<Self::Value> {
        self.0.get(key).map(|s| s.to_string_lossy().to_string())
    }
}

impl Env<'_> for FauxEnv {
    fn var_os(&self, key: &str) -> Option<OsString> {
        self.0.get(key).cloned()
    }
}
