use std::ffi::OsString;
use std::path::{Path, PathBuf};

use clap::Parser;
use indoc::indoc;
use insta::assert_yaml_snapshot;
use pretty_assertions::assert_eq;
use snapmap::SnapmapError;
use snapmap::args::Args;
use snapmap::config::{Config, ConfigFileError, FauxEnv, parse_config, read_config};

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn fixture_env() -> FauxEnv {
    FauxEnv(
        [("FIXTURES", OsString::from(fixtures()))]
            .into_iter()
            .collect(),
    )
}

#[test]
fn loads_fixture_overlays() {
    let mut config = read_config(&fixtures().join("config.yaml"), &fixture_env()).unwrap();
    assert!(config.finalize().unwrap().is_empty());

    let desired = config.load_overlays().unwrap();
    assert_eq!(desired.len(), 2);
    assert_eq!(desired.static_group()["roads"].len(), 1);
    assert_eq!(desired.hover_group()["wells"].len(), 2);
    assert_eq!(
        desired.hover_group()["wells"].properties()["color"],
        "#8c510a"
    );
}

#[test]
fn cli_overrides_file() {
    let mut config = read_config(&fixtures().join("config.yaml"), &fixture_env()).unwrap();
    let wells = fixtures().join("wells.geojson");
    let args = Args::parse_from([
        "snapmap".to_string(),
        "--zoom".to_string(),
        "4".to_string(),
        "--threshold".to_string(),
        "8".to_string(),
        "--overlay".to_string(),
        format!("extra={}", wells.display()),
    ]);
    args.merge_into_config(&mut config).unwrap();
    config.finalize().unwrap();

    assert_eq!(config.viewport.zoom, 4.0);
    assert_eq!(config.hover.threshold_px, 8.0);
    assert_eq!(config.hover.marker_color, "#ff3300");
    assert_eq!(
        config.overlays.keys().collect::<Vec<_>>(),
        ["extra", "roads"]
    );
}

#[test]
fn unreadable_overlay_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let broken = dir.path().join("broken.geojson");
    std::fs::write(&broken, "{\"type\": \"Nope\"}").unwrap();

    let yaml = format!("hover_overlays:\n  broken: {}\n", broken.display());
    let mut config = parse_config(&yaml, &FauxEnv::default(), Path::new("inline.yaml")).unwrap();
    config.finalize().unwrap();

    let err = config.load_overlays().unwrap_err();
    assert!(
        matches!(&err, SnapmapError::ContentError(_)),
        "unexpected error {err:?}"
    );
    assert!(err.to_string().contains("broken.geojson"), "{err}");
}

#[test]
fn missing_config_file() {
    let err = read_config(Path::new("/definitely/not/here.yaml"), &FauxEnv::default()).unwrap_err();
    assert!(matches!(err, ConfigFileError::ConfigLoadError(..)));
}

#[test]
fn invalid_yaml() {
    let err = parse_config("viewport: [1, 2", &FauxEnv::default(), Path::new("bad.yaml"))
        .unwrap_err();
    assert!(matches!(err, ConfigFileError::ConfigParseError(_, p) if p == Path::new("bad.yaml")));
}

#[test]
fn saved_config_is_stable() {
    let yaml = indoc! {"
        viewport:
          center: [51.5, -0.12]
          zoom: 13
          width: 1024
          height: 768
        show_hover: true
        hover:
          threshold_px: 30
        cmap: Spectral
        map_options:
          preferCanvas: true
        hover_overlays:
          stations: stations.geojson
    "};
    let config = parse_config(yaml, &FauxEnv::default(), Path::new("inline.yaml")).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let saved = dir.path().join("saved.yaml");
    config.save_to_file(&saved).unwrap();
    let reloaded = read_config(&saved, &FauxEnv::default()).unwrap();
    assert_eq!(reloaded, config);

    assert_eq!(reloaded.viewport.center, [51.5, -0.12]);
    assert_yaml_snapshot!(reloaded.hover_overlays, @"stations: stations.geojson");
}

#[test]
fn default_config_round_trips() {
    let config = Config::default();
    let yaml = serde_yaml::to_string(&config).unwrap();
    let reloaded = parse_config(&yaml, &FauxEnv::default(), Path::new("default.yaml")).unwrap();
    assert_eq!(reloaded, config);
}
