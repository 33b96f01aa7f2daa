use geojson::{Feature, Geometry, JsonObject, Value as GeometryValue};
use serde_json::{Value, json};

use crate::ContentError;
use crate::overlays::OverlayContent;

pub const DEFAULT_CMAP: &str = "Viridis";
pub const DEFAULT_RADIUS: f64 = 3.0;
pub const DEFAULT_FILL_OPACITY: f64 = 0.8;

/// Builds a point overlay from parallel latitude/longitude sequences.
///
/// With values, the collection carries `vmin`, `vmax` and `cmap` so every point is
/// coloured by its value. Without values, `cmap` is used as a plain colour for all points.
///
/// ```
/// # use snapmap_core::overlays::ScatterBuilder;
/// let content = ScatterBuilder::new(vec![37.0, 37.1], vec![-122.0, -122.1])
///     .values(vec![1.0, 5.0])
///     .cmap("Inferno")
///     .build()
///     .unwrap();
/// assert_eq!(content.len(), 2);
/// assert_eq!(content.properties()["vmax"], 5.0);
/// ```
#[derive(Debug, Clone)]
pub struct ScatterBuilder {
    lats: Vec<f64>,
    lons: Vec<f64>,
    values: Option<Vec<f64>>,
    cmap: String,
    radius: f64,
    fill_opacity: f64,
}

impl ScatterBuilder {
    #[must_use]
    pub fn new(lats: Vec<f64>, lons: Vec<f64>) -> Self {
        Self {
            lats,
            lons,
            values: None,
            cmap: DEFAULT_CMAP.to_string(),
            radius: DEFAULT_RADIUS,
            fill_opacity: DEFAULT_FILL_OPACITY,
        }
    }

    #[must_use]
    pub fn values(mut self, values: Vec<f64>) -> Self {
        self.values = Some(values);
        self
    }

    /// A colormap name for valued points, a plain colour otherwise.
    #[must_use]
    pub fn cmap(mut self, cmap: impl Into<String>) -> Self {
        self.cmap = cmap.into();
        self
    }

    #[must_use]
    pub fn radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    #[must_use]
    pub fn fill_opacity(mut self, fill_opacity: f64) -> Self {
        self.fill_opacity = fill_opacity;
        self
    }

    /// Number of points the overlay will contain: the length of the shortest input.
    #[must_use]
    pub fn len(&self) -> usize {
        let n = self.lats.len().min(self.lons.len());
        self.values.as_ref().map_or(n, |values| n.min(values.len()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn build(&self) -> Result<OverlayContent, ContentError> {
        let n = self.len();
        let values = self.values.as_deref().map(|values| &values[..n]);

        let features = (0..n)
            .map(|i| {
                let position = vec![round6(self.lons[i]), round6(self.lats[i])];
                let mut properties = JsonObject::new();
                if let Some(values) = values {
                    properties.insert("value".to_string(), json!(values[i]));
                }
                Feature {
                    bbox: None,
                    geometry: Some(Geometry::new(GeometryValue::Point(position))),
                    id: None,
                    properties: Some(properties),
                    foreign_members: None,
                }
            })
            .collect();

        let mut properties = JsonObject::new();
        properties.insert("radius".to_string(), json!(self.radius));
        properties.insert("fillOpacity".to_string(), json!(self.fill_opacity));
        if let Some(values) = values {
            let (vmin, vmax) = domain(values);
            properties.insert("vmin".to_string(), json!(vmin));
            properties.insert("vmax".to_string(), json!(vmax));
            properties.insert("cmap".to_string(), Value::String(self.cmap.clone()));
        } else {
            properties.insert("color".to_string(), Value::String(self.cmap.clone()));
        }

        OverlayContent::new(features, properties)
    }
}

fn round6(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

/// Minimum and maximum of the finite values, `(0, 1)` when there are none.
fn domain(values: &[f64]) -> (f64, f64) {
    let finite = values.iter().copied().filter(|v| v.is_finite());
    let (min, max) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if min > max { (0.0, 1.0) } else { (min, max) }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn plain_points_use_cmap_as_color() {
        let content = ScatterBuilder::new(vec![37.123_456_789, 37.5], vec![-122.0, -122.5, -123.0])
            .cmap("blue")
            .build()
            .unwrap();
        assert_eq!(content.len(), 2);
        let props = content.properties();
        assert_eq!(props["color"], "blue");
        assert_eq!(props["radius"], 3.0);
        assert_eq!(props["fillOpacity"], 0.8);
        let coords: Vec<_> = content
            .features()
            .iter()
            .map(|f| match &f.geometry.as_ref().unwrap().value {
                GeometryValue::Point(p) => p.clone(),
                other => panic!("unexpected geometry {other:?}"),
            })
            .collect();
        assert_eq!(coords, [vec![-122.0, 37.123_457], vec![-122.5, 37.5]]);
        assert!(content.features()[0].properties.as_ref().unwrap().is_empty());
    }

    #[test]
    fn valued_points_carry_domain() {
        let content = ScatterBuilder::new(vec![0.0; 4], vec![0.0; 4])
            .values(vec![5.0, -2.0, 9.5])
            .radius(6.0)
            .build()
            .unwrap();
        assert_eq!(content.len(), 3);
        let props = content.properties();
        assert_relative_eq!(props["vmin"].as_f64().unwrap(), -2.0);
        assert_relative_eq!(props["vmax"].as_f64().unwrap(), 9.5);
        assert_eq!(props["cmap"], "Viridis");
        assert_eq!(props["radius"], 6.0);
        assert!(props.get("color").is_none());
        let first = content.features()[0].properties.as_ref().unwrap();
        assert_eq!(first["value"], 5.0);
    }

    #[test]
    fn empty_values_use_unit_domain() {
        let content = ScatterBuilder::new(vec![], vec![])
            .values(vec![])
            .build()
            .unwrap();
        assert!(content.is_empty());
        assert_eq!(content.properties()["vmin"], 0.0);
        assert_eq!(content.properties()["vmax"], 1.0);
    }
}
