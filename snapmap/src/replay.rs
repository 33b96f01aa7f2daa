//! Headless session replay: a [`MapView`] on a [`MemorySurface`] driven by a list of steps.

use std::fs;
use std::io::{Read, Write, stdin};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use snapmap_core::MapView;
use snapmap_core::surface::{MemoryLayerControl, MemorySurface};
use snapmap_geo_utils::{GeoPoint, PixelPoint};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::{SnapmapError, SnapmapResult};

/// The map view used for replays.
pub type HeadlessView = MapView<MemorySurface, MemoryLayerControl>;

/// One user or controller action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Pointer moved to `[lat, lon]`
    Pointer([f64; 2]),
    /// Pointer moved to `[x, y]` container pixels
    PointerPx([f64; 2]),
    /// Run the scheduled frame tasks
    Frame,
    /// Pointer left the map
    Leave,
    /// Drag the map by `[dx, dy]` pixels
    Pan([f64; 2]),
    Zoom(f64),
    /// Resize the map container to `[width, height]` pixels
    Resize([f64; 2]),
    ShowHover(bool),
    Visible { name: String, visible: bool },
    RemoveOverlay(String),
    /// Re-read the overlay files and reconcile
    Reload,
}

/// Reads steps from a YAML file, or from stdin for `-`.
pub fn load_steps(path: &Path) -> SnapmapResult<Vec<Step>> {
    let text = if path.as_os_str() == "-" {
        let mut text = String::new();
        stdin()
            .read_to_string(&mut text)
            .map_err(|e| SnapmapError::ReplayReadError(e, path.to_path_buf()))?;
        text
    } else {
        fs::read_to_string(path).map_err(|e| SnapmapError::ReplayReadError(e, path.to_path_buf()))?
    };
    parse_steps(&text, path)
}

pub fn parse_steps(text: &str, path: &Path) -> SnapmapResult<Vec<Step>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_yaml::from_str(text).map_err(|e| SnapmapError::ReplayParseError(e, PathBuf::from(path)))
}

/// Creates the view described by the config and draws its overlays.
pub fn new_view(config: &Config) -> SnapmapResult<HeadlessView> {
    let viewport = config.viewport.to_viewport()?;
    let surface = MemorySurface::new(viewport).with_map_options(config.map_options.clone());
    let mut view = MapView::new(
        surface,
        MemoryLayerControl::new(),
        config.hover.clone(),
        config.show_hover,
    );
    view.set_desired(config.load_overlays()?);
    Ok(view)
}

/// Runs the steps and writes every map event as one JSON line.
///
/// Events from drawing the initial overlays are written first.
pub fn run<W: Write>(config: &Config, steps: &[Step], out: &mut W) -> SnapmapResult<HeadlessView> {
    let mut view = new_view(config)?;
    let mut written = write_events(&mut view, out)?;
    for step in steps {
        apply(&mut view, config, step)?;
        written += write_events(&mut view, out)?;
    }
    out.flush()?;
    info!(
        "Replayed {} steps, {written} events, {} hover index rebuilds",
        steps.len(),
        view.rebuild_count()
    );
    Ok(view)
}

fn apply(view: &mut HeadlessView, config: &Config, step: &Step) -> SnapmapResult<()> {
    debug!("Replay step {step:?}");
    match step {
        Step::Pointer([lat, lon]) => {
            view.pointer_moved(GeoPoint::new(*lat, *lon));
        }
        Step::PointerPx([x, y]) => {
            let position = view
                .surface()
                .viewport()
                .from_container(PixelPoint::new(*x, *y));
            view.pointer_moved(position);
        }
        Step::Frame => {
            view.run_frame();
        }
        Step::Leave => view.pointer_left(),
        Step::Pan([dx, dy]) => view.pan_by(*dx, *dy),
        Step::Zoom(zoom) => view.zoom_to(*zoom),
        Step::Resize([width, height]) => view.resize(*width, *height),
        Step::ShowHover(show) => view.set_show_hover(*show),
        Step::Visible { name, visible } => {
            if view.reconciler().contains(name) {
                view.set_overlay_visible(name, *visible);
            } else {
                warn!("Ignoring visibility change of unknown overlay {name}");
            }
        }
        Step::RemoveOverlay(name) => {
            if view.remove_layer(name).is_noop() {
                warn!("Overlay {name} was not drawn, nothing to remove");
            }
        }
        Step::Reload => {
            view.set_desired(config.load_overlays()?);
        }
    }
    Ok(())
}

fn write_events<W: Write>(view: &mut HeadlessView, out: &mut W) -> SnapmapResult<usize> {
    let events = view.take_events();
    for event in &events {
        serde_json::to_writer(&mut *out, event)?;
        writeln!(out)?;
    }
    Ok(events.len())
}
