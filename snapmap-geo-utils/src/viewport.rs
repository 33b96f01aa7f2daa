//! Spherical Web-Mercator viewport.
//!
//! World pixel space at zoom `z` is a square of `TILE_SIZE * 2^z` pixels with `(0, 0)` at
//! the north-west corner. Container pixels are world pixels shifted so that the viewport
//! center lands in the middle of the container.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::{GeoPoint, PixelBounds, PixelPoint};

/// Size of a single map tile in pixels.
pub const TILE_SIZE: f64 = 256.0;

/// Latitudes are clamped to this value before projecting, which keeps the projection finite.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_6;

pub const MIN_ZOOM: f64 = 0.0;
pub const MAX_ZOOM: f64 = 22.0;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ViewportError {
    #[error("Zoom level {0} is outside of the supported range {MIN_ZOOM}..={MAX_ZOOM}")]
    InvalidZoom(f64),

    #[error("Viewport size must be positive, but is {0}x{1}")]
    InvalidSize(f64, f64),

    #[error("Viewport center {0} is not a valid coordinate")]
    InvalidCenter(GeoPoint),
}

/// The visible part of the map: a geographic center, a zoom level and a container size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    center: GeoPoint,
    zoom: f64,
    width: f64,
    height: f64,
}

impl Viewport {
    /// Creates a viewport, validating zoom, size and center.
    ///
    /// ```
    /// # use snapmap_geo_utils::{GeoPoint, Viewport};
    /// let vp = Viewport::new(GeoPoint::new(37.0, -122.0), 9.0, 800.0, 600.0).unwrap();
    /// let center = vp.to_container(GeoPoint::new(37.0, -122.0));
    /// assert!((center.x - 400.0).abs() < 1e-6);
    /// assert!((center.y - 300.0).abs() < 1e-6);
    /// ```
    pub fn new(center: GeoPoint, zoom: f64, width: f64, height: f64) -> Result<Self, ViewportError> {
        if !(MIN_ZOOM..=MAX_ZOOM).contains(&zoom) {
            return Err(ViewportError::InvalidZoom(zoom));
        }
        if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
            return Err(ViewportError::InvalidSize(width, height));
        }
        if !(center.lat.is_finite() && center.lon.is_finite()) || center.lat.abs() > 90.0 {
            return Err(ViewportError::InvalidCenter(center));
        }
        Ok(Self {
            center,
            zoom,
            width,
            height,
        })
    }

    #[must_use]
    pub fn center(&self) -> GeoPoint {
        self.center
    }

    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Size of the whole world in pixels at the current zoom.
    #[must_use]
    pub fn world_size(&self) -> f64 {
        TILE_SIZE * self.zoom.exp2()
    }

    /// Projects a coordinate into world pixel space.
    ///
    /// `NaN` inputs stay `NaN`, everything else is finite.
    #[must_use]
    pub fn project_world(&self, point: GeoPoint) -> PixelPoint {
        let size = self.world_size();
        let x = (point.lon + 180.0) / 360.0 * size;
        let sin_lat = point.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians().sin();
        let y = (0.5 - ((1.0 + sin_lat) / (1.0 - sin_lat)).ln() / (4.0 * PI)) * size;
        PixelPoint::new(x, y)
    }

    /// Inverse of [`Self::project_world`].
    #[must_use]
    pub fn unproject_world(&self, point: PixelPoint) -> GeoPoint {
        let size = self.world_size();
        let lon = point.x / size * 360.0 - 180.0;
        let n = PI - 2.0 * PI * point.y / size;
        let lat = n.sinh().atan().to_degrees();
        GeoPoint::new(lat, lon)
    }

    /// World pixel position of the container's top-left corner.
    fn origin(&self) -> PixelPoint {
        self.project_world(self.center)
            .offset(-self.width / 2.0, -self.height / 2.0)
    }

    /// Geographic coordinate to container pixel coordinate.
    #[must_use]
    pub fn to_container(&self, point: GeoPoint) -> PixelPoint {
        let world = self.project_world(point);
        let origin = self.origin();
        PixelPoint::new(world.x - origin.x, world.y - origin.y)
    }

    /// Container pixel coordinate to geographic coordinate.
    #[must_use]
    pub fn from_container(&self, point: PixelPoint) -> GeoPoint {
        let origin = self.origin();
        self.unproject_world(point.offset(origin.x, origin.y))
    }

    /// The container area in pixels.
    #[must_use]
    pub fn container_bounds(&self) -> PixelBounds {
        PixelBounds::new(0.0, 0.0, self.width, self.height)
    }

    /// Moves the map content by `(dx, dy)` pixels, like dragging it with the pointer.
    ///
    /// Dragging right (`dx > 0`) moves the center west.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        let center = self.project_world(self.center).offset(-dx, -dy);
        self.center = self.unproject_world(center);
    }

    /// Changes the zoom level around the current center, clamped to the supported range.
    /// Non-finite zoom levels are ignored.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        }
    }

    /// Resizes the container, ignoring non-positive sizes.
    pub fn resize(&mut self, width: f64, height: f64) {
        if width > 0.0 && height > 0.0 {
            self.width = width;
            self.height = height;
        }
    }
}
