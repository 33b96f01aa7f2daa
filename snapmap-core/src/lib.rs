#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_debug_implementations)]

/// Overlay definitions, drawables and the reconciler that keeps them in sync with the map.
pub mod overlays;

/// Nearest-point hover: the grid index and the pointer-driven controller.
pub mod hover;

/// Per-feature styling: colour ramps and the property precedence rules.
pub mod style;

/// The drawing surface and layer-selection seams, plus an in-memory implementation.
pub mod surface;

mod error;
pub use error::{ContentError, SurfaceError};

mod view;
pub use view::{MapEvent, MapView};

pub use snapmap_geo_utils::{GeoPoint, PixelPoint, Viewport};
