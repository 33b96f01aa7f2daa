use std::collections::{BTreeMap, HashMap, HashSet};
use std::ffi::OsStr;
use std::fs::File;
use std::io::prelude::*;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use snapmap_core::hover::HoverOptions;
use snapmap_core::overlays::{DEFAULT_CMAP, DesiredOverlays, OverlayContent};
use snapmap_geo_utils::{GeoPoint, Viewport};
use subst::VariableMap;
use tracing::{info, warn};

use crate::SnapmapResult;
use crate::config::{ConfigFileError, ConfigFileResult};

pub type UnrecognizedValues = HashMap<String, serde_yaml::Value>;
pub type UnrecognizedKeys = HashSet<String>;

/// Zoom levels a configured map may start at.
pub const ZOOM_RANGE: RangeInclusive<f64> = 1.0..=22.0;

/// The initial camera of the map.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// `[lat, lon]` in degrees
    pub center: [f64; 2],
    pub zoom: f64,
    /// Container width in pixels
    pub width: f64,
    /// Container height in pixels
    pub height: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            center: [37.0, -122.0],
            zoom: 9.0,
            width: 800.0,
            height: 600.0,
        }
    }
}

impl ViewportConfig {
    pub fn to_viewport(&self) -> ConfigFileResult<Viewport> {
        if !ZOOM_RANGE.contains(&self.zoom) {
            return Err(ConfigFileError::InvalidZoom(self.zoom));
        }
        let [lat, lon] = self.center;
        Ok(Viewport::new(
            GeoPoint::new(lat, lon),
            self.zoom,
            self.width,
            self.height,
        )?)
    }
}

#[serde_with::skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub viewport: ViewportConfig,

    /// Whether hovering snaps to the nearest point
    #[serde(default)]
    pub show_hover: bool,

    #[serde(default)]
    pub hover: HoverOptions,

    /// Default colormap for generated scatter overlays
    pub cmap: Option<String>,

    /// Passed to the drawing surface as is
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub map_options: serde_json::Map<String, serde_json::Value>,

    /// Overlays drawn without hover snapping, `name: path/to/file.geojson`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub overlays: BTreeMap<String, PathBuf>,

    /// Overlays whose points can be hovered
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub hover_overlays: BTreeMap<String, PathBuf>,

    #[serde(flatten, skip_serializing)]
    pub unrecognized: UnrecognizedValues,
}

impl Config {
    /// Validates the config and reports unrecognized keys.
    pub fn finalize(&mut self) -> ConfigFileResult<UnrecognizedKeys> {
        let res: UnrecognizedKeys = self.unrecognized.keys().cloned().collect();
        for key in &res {
            warn!(
                "Ignoring unrecognized configuration key '{key}'. Please check your configuration file for typos."
            );
        }

        self.viewport.to_viewport()?;

        for (name, path) in self.overlays.iter().chain(&self.hover_overlays) {
            if !path.is_file() {
                return Err(ConfigFileError::InvalidOverlayFile(
                    name.clone(),
                    path.clone(),
                ));
            }
        }
        for name in self.overlays.keys() {
            if self.hover_overlays.contains_key(name) {
                info!("Overlay {name} is listed as static and as hoverable, it will be hoverable");
            }
        }

        Ok(res)
    }

    /// The colormap for generated scatter overlays.
    #[must_use]
    pub fn cmap(&self) -> &str {
        self.cmap.as_deref().unwrap_or(DEFAULT_CMAP)
    }

    /// Reads every configured overlay file.
    pub fn load_overlays(&self) -> SnapmapResult<DesiredOverlays> {
        let mut desired = DesiredOverlays::new();
        desired.set_static(load_group(&self.overlays)?);
        desired.set_hover(load_group(&self.hover_overlays)?);
        info!(
            "Loaded {} static and {} hoverable overlays",
            self.overlays.len(),
            self.hover_overlays.len()
        );
        Ok(desired)
    }

    pub fn save_to_file(&self, file_name: &Path) -> ConfigFileResult<()> {
        let yaml = serde_yaml::to_string(&self).map_err(ConfigFileError::ConfigSerializeError)?;
        if file_name.as_os_str() == OsStr::new("-") {
            info!("Current configuration:");
            println!("\n\n{yaml}\n");
            Ok(())
        } else {
            info!(
                "Saving config to {}, use --config to load it",
                file_name.display()
            );
            File::create(file_name)
                .map_err(|e| ConfigFileError::ConfigWriteError(e, file_name.to_path_buf()))?
                .write_all(yaml.as_bytes())
                .map_err(|e| ConfigFileError::ConfigWriteError(e, file_name.to_path_buf()))?;
            Ok(())
        }
    }
}

fn load_group(group: &BTreeMap<String, PathBuf>) -> SnapmapResult<BTreeMap<String, OverlayContent>> {
    group
        .iter()
        .map(|(name, path)| {
            let content = OverlayContent::from_path(path)?;
            info!(
                "Overlay {name}: {} features from {}",
                content.len(),
                path.display()
            );
            Ok((name.clone(), content))
        })
        .collect()
}

/// Read config from a file
pub fn read_config<'a, M>(file_name: &Path, env: &'a M) -> ConfigFileResult<Config>
where
    M: VariableMap<'a>,
    M::Value: AsRef<str>,
{
    let mut file =
        File::open(file_name).map_err(|e| ConfigFileError::ConfigLoadError(e, file_name.into()))?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| ConfigFileError::ConfigLoadError(e, file_name.into()))?;
    parse_config(&contents, env, file_name)
}

pub fn parse_config<'a, M>(contents: &str, env: &'a M, file_name: &Path) -> ConfigFileResult<Config>
where
    M: VariableMap<'a>,
    M::Value: AsRef<str>,
{
    subst::yaml::from_str(contents, env)
        .map_err(|e| ConfigFileError::ConfigParseError(e, file_name.into()))
}
