//! Geographic and pixel-space primitives shared by the snapmap crates.
//!
//! - [`GeoPoint`] and [`PixelPoint`] are the two coordinate spaces the hover logic moves between.
//! - [`Viewport`] is a spherical Web-Mercator camera that converts between them.
//! - [`CellCoord`] and [`PixelBounds`] describe regions of pixel space.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

mod bounds;
pub use bounds::PixelBounds;

mod grid;
pub use grid::{CellCoord, cell_radius};

mod viewport;
pub use viewport::{MAX_LATITUDE, MAX_ZOOM, MIN_ZOOM, TILE_SIZE, Viewport, ViewportError};

/// A WGS84 coordinate in degrees.
///
/// Note that `GeoJSON` positions are ordered `[lon, lat]`, while this struct
/// (and the map APIs it mirrors) reads as `lat, lon`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
}

impl GeoPoint {
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Reads a `GeoJSON` position (`[lon, lat, ...]`).
    ///
    /// Returns `None` if the position has fewer than two elements.
    ///
    /// ```
    /// # use snapmap_geo_utils::GeoPoint;
    /// let p = GeoPoint::from_position(&[-122.0, 37.0]).unwrap();
    /// assert_eq!(p, GeoPoint::new(37.0, -122.0));
    /// assert!(GeoPoint::from_position(&[1.0]).is_none());
    /// ```
    #[must_use]
    pub fn from_position(position: &[f64]) -> Option<Self> {
        match position {
            [lon, lat, ..] => Some(Self::new(*lat, *lon)),
            _ => None,
        }
    }

    /// The `GeoJSON` position for this point.
    #[must_use]
    pub fn to_position(self) -> Vec<f64> {
        vec![self.lon, self.lat]
    }
}

impl Display for GeoPoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

/// A pixel position relative to the top-left corner of the map container.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Straight-line distance in pixels.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Both coordinates are finite (extreme projections may produce `NaN` or infinities).
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl Display for PixelPoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:.1}, {:.1}]", self.x, self.y)
    }
}
