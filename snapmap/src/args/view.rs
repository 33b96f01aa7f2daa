use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::info;

use crate::config::{Config, ConfigFileError, ConfigFileResult};

#[derive(clap::Args, PartialEq, Debug, Default)]
pub struct ViewArgs {
    /// Snap the pointer to the nearest hoverable point. [DEFAULT: off]
    #[arg(long)]
    pub show_hover: bool,
    /// Snapping distance in screen pixels. [DEFAULT: 25]
    #[arg(long)]
    pub threshold: Option<f64>,
    /// Initial zoom level, 1 to 22. [DEFAULT: 9]
    #[arg(long)]
    pub zoom: Option<f64>,
    /// Initial map center as `LAT,LON`. [DEFAULT: 37,-122]
    #[arg(long, allow_hyphen_values = true)]
    pub center: Option<String>,
    /// Add a static overlay as `NAME=PATH`. Can be specified multiple times.
    #[arg(long)]
    pub overlay: Vec<String>,
    /// Add a hoverable overlay as `NAME=PATH`. Can be specified multiple times.
    #[arg(long)]
    pub hover_overlay: Vec<String>,
}

impl ViewArgs {
    pub(crate) fn merge_into_config(self, config: &mut Config) -> ConfigFileResult<()> {
        if self.show_hover {
            config.show_hover = true;
        }
        if let Some(threshold) = self.threshold {
            config.hover.threshold_px = threshold;
        }
        if let Some(zoom) = self.zoom {
            config.viewport.zoom = zoom;
        }
        if let Some(center) = self.center {
            config.viewport.center = parse_center(&center)?;
        }
        merge_overlays(&mut config.overlays, self.overlay, "--overlay")?;
        merge_overlays(&mut config.hover_overlays, self.hover_overlay, "--hover-overlay")?;
        Ok(())
    }
}

fn merge_overlays(
    group: &mut BTreeMap<String, PathBuf>,
    args: Vec<String>,
    flag: &'static str,
) -> ConfigFileResult<()> {
    let mut seen = Vec::with_capacity(args.len());
    for arg in args {
        let (name, path) = parse_named_path(&arg)?;
        if seen.contains(&name) {
            return Err(ConfigFileError::DuplicateOverlay(name, flag));
        }
        if group.insert(name.clone(), path).is_some() {
            info!("Overlay {name} from the config file is replaced by {flag}");
        }
        seen.push(name);
    }
    Ok(())
}

fn parse_named_path(arg: &str) -> ConfigFileResult<(String, PathBuf)> {
    match arg.split_once('=') {
        Some((name, path)) if !name.trim().is_empty() && !path.is_empty() => {
            Ok((name.trim().to_string(), PathBuf::from(path)))
        }
        _ => Err(ConfigFileError::InvalidNamedPath(arg.to_string())),
    }
}

fn parse_center(arg: &str) -> ConfigFileResult<[f64; 2]> {
    let invalid = || ConfigFileError::InvalidCenter(arg.to_string());
    let (lat, lon) = arg.split_once(',').ok_or_else(invalid)?;
    let lat = lat.trim().parse::<f64>().map_err(|_| invalid())?;
    let lon = lon.trim().parse::<f64>().map_err(|_| invalid())?;
    Ok([lat, lon])
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::args::Args;

    fn merged(args: &[&str]) -> ConfigFileResult<Config> {
        let args = Args::parse_from(args);
        let mut config = Config::default();
        args.view.merge_into_config(&mut config)?;
        Ok(config)
    }

    #[test]
    fn overrides_view_settings() {
        let config = merged(&[
            "snapmap",
            "--show-hover",
            "--threshold",
            "12.5",
            "--zoom",
            "14",
            "--center",
            "-33.9,151.2",
        ])
        .unwrap();
        assert!(config.show_hover);
        assert_eq!(config.hover.threshold_px, 12.5);
        assert_eq!(config.viewport.zoom, 14.0);
        assert_eq!(config.viewport.center, [-33.9, 151.2]);
    }

    #[test]
    fn adds_overlays() {
        let config = merged(&[
            "snapmap",
            "--overlay",
            "roads=data/roads.geojson",
            "--hover-overlay",
            "wells=data/wells.geojson",
            "--hover-overlay",
            "springs=springs.json",
        ])
        .unwrap();
        assert_eq!(
            config.overlays,
            BTreeMap::from([("roads".to_string(), PathBuf::from("data/roads.geojson"))])
        );
        assert_eq!(
            config.hover_overlays.keys().collect::<Vec<_>>(),
            ["springs", "wells"]
        );
    }

    #[test]
    fn cli_overlay_replaces_file_entry() {
        let args = Args::parse_from(["snapmap", "--overlay", "roads=new.geojson"]);
        let mut config = Config::default();
        config
            .overlays
            .insert("roads".to_string(), PathBuf::from("old.geojson"));
        args.view.merge_into_config(&mut config).unwrap();
        assert_eq!(config.overlays["roads"], PathBuf::from("new.geojson"));
    }

    #[test]
    fn rejects_repeated_name() {
        let err = merged(&[
            "snapmap",
            "--overlay",
            "roads=a.geojson",
            "--overlay",
            "roads=b.geojson",
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigFileError::DuplicateOverlay(name, "--overlay") if name == "roads"
        ));
    }

    #[rstest]
    #[case("roads")]
    #[case("=roads.geojson")]
    #[case("roads=")]
    fn rejects_bad_named_path(#[case] arg: &str) {
        assert!(matches!(
            parse_named_path(arg),
            Err(ConfigFileError::InvalidNamedPath(_))
        ));
    }

    #[rstest]
    #[case("37.5")]
    #[case("north,west")]
    #[case("1,2,3")]
    fn rejects_bad_center(#[case] arg: &str) {
        assert!(matches!(
            parse_center(arg),
            Err(ConfigFileError::InvalidCenter(_))
        ));
    }
}
