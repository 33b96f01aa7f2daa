//! Axis-aligned rectangles in pixel space.

use serde::Serialize;

use crate::PixelPoint;

/// An axis-aligned pixel rectangle, inclusive of its edges.
///
/// The empty rectangle has inverted infinite edges, so that extending it by
/// any finite point yields a zero-sized rectangle at that point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PixelBounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Default for PixelBounds {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl PixelBounds {
    pub const EMPTY: Self = Self {
        min_x: f64::INFINITY,
        min_y: f64::INFINITY,
        max_x: f64::NEG_INFINITY,
        max_y: f64::NEG_INFINITY,
    };

    #[must_use]
    pub const fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    /// Grows the rectangle to include `point`.
    ///
    /// ```
    /// # use snapmap_geo_utils::{PixelBounds, PixelPoint};
    /// let mut b = PixelBounds::EMPTY;
    /// b.extend(PixelPoint::new(3.0, -1.0));
    /// b.extend(PixelPoint::new(-2.0, 4.0));
    /// assert_eq!(b, PixelBounds::new(-2.0, -1.0, 3.0, 4.0));
    /// ```
    pub fn extend(&mut self, point: PixelPoint) {
        self.min_x = self.min_x.min(point.x);
        self.min_y = self.min_y.min(point.y);
        self.max_x = self.max_x.max(point.x);
        self.max_y = self.max_y.max(point.y);
    }

    /// The rectangle grown by `margin` on every side. The empty rectangle stays empty.
    ///
    /// ```
    /// # use snapmap_geo_utils::PixelBounds;
    /// let b = PixelBounds::new(0.0, 0.0, 10.0, 5.0).buffered(2.0);
    /// assert_eq!(b, PixelBounds::new(-2.0, -2.0, 12.0, 7.0));
    /// assert!(PixelBounds::EMPTY.buffered(2.0).is_empty());
    /// ```
    #[must_use]
    pub fn buffered(&self, margin: f64) -> Self {
        Self::new(
            self.min_x - margin,
            self.min_y - margin,
            self.max_x + margin,
            self.max_y + margin,
        )
    }

    #[must_use]
    pub fn contains(&self, point: PixelPoint) -> bool {
        (self.min_x..=self.max_x).contains(&point.x) && (self.min_y..=self.max_y).contains(&point.y)
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max_x - self.min_x
        }
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max_y - self.min_y
        }
    }
}
