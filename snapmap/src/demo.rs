//! The spiral demo scatter.

use std::f64::consts::PI;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::Path;

use snapmap_core::overlays::{OverlayContent, ScatterBuilder};
use tracing::info;

use crate::SnapmapResult;

/// Spiral center latitude
pub const CENTER_LAT: f64 = 37.3;
/// Spiral center longitude
pub const CENTER_LON: f64 = -122.0;
pub const RADIUS_DEG: f64 = 0.1;
pub const TURNS: f64 = 25.0;

/// Fractional part of the golden ratio. Multiples of it spread evenly over `[0, 1)`.
const GOLDEN_FRACTION: f64 = 0.618_033_988_749_894_9;

/// Evenly spaced parameter values over `[0, 2π·TURNS]`, both ends included.
#[allow(clippy::cast_precision_loss)]
fn linspace(n: usize) -> impl Iterator<Item = f64> {
    let end = 2.0 * PI * TURNS;
    let step = if n > 1 { end / (n - 1) as f64 } else { 0.0 };
    (0..n).map(move |i| i as f64 * step)
}

/// Deterministic values in `[0, 100)`.
#[allow(clippy::cast_precision_loss)]
fn demo_values(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| ((i as f64 + 1.0) * GOLDEN_FRACTION).fract() * 100.0)
        .collect()
}

/// The demo scatter with `n` points, shifted by `offset` degrees in latitude and longitude.
#[must_use]
pub fn spiral(n: usize, offset: f64) -> ScatterBuilder {
    let (lats, lons): (Vec<f64>, Vec<f64>) = linspace(n)
        .map(|t| {
            (
                CENTER_LAT + RADIUS_DEG * t.sin() + offset,
                CENTER_LON + RADIUS_DEG * t.cos() + offset,
            )
        })
        .unzip();
    ScatterBuilder::new(lats, lons).values(demo_values(n))
}

/// Builds the demo scatter and writes it as a GeoJSON feature collection.
///
/// `None` writes to stdout.
pub fn write_demo(
    n: usize,
    offset: f64,
    cmap: &str,
    output: Option<&Path>,
) -> SnapmapResult<OverlayContent> {
    let content = spiral(n, offset).cmap(cmap).build()?;
    let collection = content.to_feature_collection();
    match output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer(&mut writer, &collection)?;
            writer.flush()?;
            info!(
                "Wrote {} demo points to {} (fingerprint {})",
                content.len(),
                path.display(),
                content.fingerprint()
            );
        }
        None => {
            let mut stdout = stdout().lock();
            serde_json::to_writer(&mut stdout, &collection)?;
            writeln!(stdout)?;
        }
    }
    Ok(content)
}
