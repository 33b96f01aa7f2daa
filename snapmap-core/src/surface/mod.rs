//! Seams to the map engine.
//!
//! The core never draws anything itself. It attaches and detaches [`Drawable`]s on a
//! [`MapSurface`], lists them in a [`LayerSelector`], and asks the surface to project
//! geographic coordinates into container pixels.

use serde::Serialize;
use snapmap_geo_utils::{GeoPoint, PixelPoint};

use crate::SurfaceError;
use crate::overlays::{Drawable, LayerId};

mod memory;
pub use memory::{MemoryLayerControl, MemorySurface};

/// The drawing surface of one map view.
pub trait MapSurface {
    /// Adds a drawable to the map. Attaching an already attached drawable is a no-op.
    fn attach(&mut self, drawable: &Drawable);

    /// Removes a drawable from the map.
    fn detach(&mut self, id: LayerId) -> Result<(), SurfaceError>;

    /// Whether the drawable is currently on the map, i.e. visible to the user.
    fn is_attached(&self, id: LayerId) -> bool;

    /// Geographic coordinate to container pixel coordinate for the current viewport.
    ///
    /// May return non-finite coordinates for points the projection cannot represent.
    fn project(&self, point: GeoPoint) -> PixelPoint;

    /// Shows the hover marker, moving it if it is already shown.
    fn show_marker(&mut self, marker: &HoverMarker);

    fn hide_marker(&mut self);
}

/// The layer-selection control that lets users toggle overlays.
pub trait LayerSelector {
    fn add_overlay(&mut self, id: LayerId, name: &str);

    fn remove_overlay(&mut self, id: LayerId) -> Result<(), SurfaceError>;
}

/// The reusable hover marker, as handed to [`MapSurface::show_marker`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoverMarker {
    pub position: GeoPoint,
    pub label: String,
    pub radius: f64,
    pub color: String,
    pub opacity: f64,
}
