//! Square grid cells over container pixel space.

use serde::Serialize;

use crate::PixelPoint;

/// A cell of a square grid laid over pixel space.
///
/// Cell `(cx, cy)` covers `[cx * size, (cx + 1) * size) x [cy * size, (cy + 1) * size)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CellCoord {
    pub cx: i64,
    pub cy: i64,
}

impl CellCoord {
    #[must_use]
    pub const fn new(cx: i64, cy: i64) -> Self {
        Self { cx, cy }
    }

    /// The cell containing `point` on a grid of `cell_size` pixels.
    ///
    /// The point must be finite; callers filter non-finite points before bucketing them.
    ///
    /// ```
    /// # use snapmap_geo_utils::{CellCoord, PixelPoint};
    /// assert_eq!(CellCoord::of(PixelPoint::new(24.9, 25.0), 25.0), CellCoord::new(0, 1));
    /// assert_eq!(CellCoord::of(PixelPoint::new(-0.1, 0.0), 25.0), CellCoord::new(-1, 0));
    /// ```
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn of(point: PixelPoint, cell_size: f64) -> Self {
        Self {
            cx: (point.x / cell_size).floor() as i64,
            cy: (point.y / cell_size).floor() as i64,
        }
    }

    /// All cells within `radius` cells of this one (Chebyshev distance), row by row.
    ///
    /// A radius of 1 yields the 3x3 neighborhood. Coordinates saturate at the edges of the
    /// `i64` range, so cells there may repeat.
    pub fn neighborhood(self, radius: i64) -> impl Iterator<Item = Self> {
        (-radius..=radius).flat_map(move |dy| {
            (-radius..=radius)
                .map(move |dx| Self::new(self.cx.saturating_add(dx), self.cy.saturating_add(dy)))
        })
    }

    /// Chebyshev distance between two cells.
    #[must_use]
    pub fn chebyshev(self, other: Self) -> i64 {
        let dx = self.cx.abs_diff(other.cx);
        let dy = self.cy.abs_diff(other.cy);
        i64::try_from(dx.max(dy)).unwrap_or(i64::MAX)
    }
}

/// Number of cells around the query cell that must be searched to find every point
/// within `threshold` pixels on a grid of `cell_size` pixels.
///
/// When the cell size equals the threshold this is 1, i.e. the 3x3 neighborhood.
///
/// ```
/// # use snapmap_geo_utils::cell_radius;
/// assert_eq!(cell_radius(25.0, 25.0), 1);
/// assert_eq!(cell_radius(10.0, 25.0), 1);
/// assert_eq!(cell_radius(60.0, 25.0), 3);
/// assert_eq!(cell_radius(f64::INFINITY, 25.0), i64::MAX);
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn cell_radius(threshold: f64, cell_size: f64) -> i64 {
    ((threshold / cell_size).ceil() as i64).max(1)
}
