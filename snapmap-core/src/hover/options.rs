use serde::{Deserialize, Serialize};

pub const DEFAULT_THRESHOLD_PX: f64 = 25.0;
pub const DEFAULT_MARKER_RADIUS: f64 = 8.0;
pub const DEFAULT_MARKER_COLOR: &str = "red";
pub const DEFAULT_MARKER_OPACITY: f64 = 0.9;

/// Hover behaviour of one map view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoverOptions {
    /// Maximum pointer distance in pixels for a point to be hovered. Also the grid cell size.
    pub threshold_px: f64,
    pub marker_radius: f64,
    pub marker_color: String,
    pub marker_opacity: f64,
}

impl Default for HoverOptions {
    fn default() -> Self {
        Self {
            threshold_px: DEFAULT_THRESHOLD_PX,
            marker_radius: DEFAULT_MARKER_RADIUS,
            marker_color: DEFAULT_MARKER_COLOR.to_string(),
            marker_opacity: DEFAULT_MARKER_OPACITY,
        }
    }
}

impl HoverOptions {
    /// The threshold, or the default one when it is not a positive finite number.
    #[must_use]
    pub fn effective_threshold(&self) -> f64 {
        if self.threshold_px.is_finite() && self.threshold_px > 0.0 {
            self.threshold_px
        } else {
            DEFAULT_THRESHOLD_PX
        }
    }
}
