use std::fmt::{Display, Formatter};
use std::sync::Arc;

use geojson::{Feature, Value as Geometry};
use serde::Serialize;
use snapmap_geo_utils::GeoPoint;
use tracing::trace;

use crate::overlays::OverlayContent;
use crate::style::{MarkerStyle, PathStyle};

/// Identity of a drawable on the map surface.
///
/// Every constructed drawable gets a fresh id, so an unchanged id across two
/// reconciliation passes means the drawable was reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct LayerId(pub u64);

impl Display for LayerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single point marker.
#[derive(Debug, Clone)]
pub struct PointMarker {
    pub position: GeoPoint,
    pub style: MarkerStyle,
    pub feature: Arc<Feature>,
}

/// A line or polygon feature.
#[derive(Debug, Clone)]
pub struct ShapeLayer {
    pub style: PathStyle,
    pub feature: Arc<Feature>,
}

/// One drawn piece of an overlay, one per feature with a geometry.
#[derive(Debug, Clone)]
pub enum Sublayer {
    Marker(PointMarker),
    /// A `MultiPoint` feature: several markers sharing one feature.
    MarkerGroup(Vec<PointMarker>),
    Shape(ShapeLayer),
}

impl Sublayer {
    /// The single geographic position of this sublayer, if it has one.
    ///
    /// Only plain markers have a position. Groups and shapes are never hover candidates.
    #[must_use]
    pub fn position(&self) -> Option<GeoPoint> {
        match self {
            Self::Marker(marker) => Some(marker.position),
            Self::MarkerGroup(_) | Self::Shape(_) => None,
        }
    }

    #[must_use]
    pub fn feature(&self) -> Option<&Arc<Feature>> {
        match self {
            Self::Marker(marker) => Some(&marker.feature),
            Self::MarkerGroup(markers) => markers.first().map(|m| &m.feature),
            Self::Shape(shape) => Some(&shape.feature),
        }
    }
}

/// The materialized representation of one overlay.
#[derive(Debug, Clone)]
pub struct Drawable {
    id: LayerId,
    name: Arc<str>,
    sublayers: Vec<Sublayer>,
}

impl Drawable {
    /// Builds the sublayers for every feature of `content`.
    ///
    /// Features without a geometry and points with fewer than two coordinates draw nothing.
    #[must_use]
    pub fn build(id: LayerId, name: Arc<str>, content: &OverlayContent) -> Self {
        let collection = content.properties();
        let mut sublayers = Vec::with_capacity(content.len());
        for feature in content.features() {
            let Some(geometry) = &feature.geometry else {
                continue;
            };
            let props = feature.properties.as_ref();
            match &geometry.value {
                Geometry::Point(position) => {
                    if let Some(position) = GeoPoint::from_position(position) {
                        sublayers.push(Sublayer::Marker(PointMarker {
                            position,
                            style: MarkerStyle::resolve(props, collection),
                            feature: Arc::clone(feature),
                        }));
                    } else {
                        trace!("Skipping point with incomplete position {position:?} in overlay {name}");
                    }
                }
                Geometry::MultiPoint(positions) => {
                    let style = MarkerStyle::resolve(props, collection);
                    let markers: Vec<_> = positions
                        .iter()
                        .filter_map(|p| GeoPoint::from_position(p))
                        .map(|position| PointMarker {
                            position,
                            style: style.clone(),
                            feature: Arc::clone(feature),
                        })
                        .collect();
                    if !markers.is_empty() {
                        sublayers.push(Sublayer::MarkerGroup(markers));
                    }
                }
                _ => sublayers.push(Sublayer::Shape(ShapeLayer {
                    style: PathStyle::resolve(props, collection),
                    feature: Arc::clone(feature),
                })),
            }
        }
        Self {
            id,
            name,
            sublayers,
        }
    }

    #[must_use]
    pub fn id(&self) -> LayerId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn shared_name(&self) -> &Arc<str> {
        &self.name
    }

    #[must_use]
    pub fn sublayers(&self) -> &[Sublayer] {
        &self.sublayers
    }

    /// Markers with a single position, in feature order.
    pub fn markers(&self) -> impl Iterator<Item = &PointMarker> {
        self.sublayers.iter().filter_map(|sublayer| match sublayer {
            Sublayer::Marker(marker) => Some(marker),
            Sublayer::MarkerGroup(_) | Sublayer::Shape(_) => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;

    #[test]
    fn maps_geometries_to_sublayers() {
        let content: OverlayContent = indoc! {r##"
            {
              "type": "FeatureCollection",
              "properties": {"color": "#ff0000"},
              "features": [
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [10, 20]}, "properties": {"name": "p"}},
                {"type": "Feature", "geometry": {"type": "MultiPoint", "coordinates": [[0, 0], [1, 1]]}, "properties": null},
                {"type": "Feature", "geometry": {"type": "LineString", "coordinates": [[0, 0], [1, 1]]}, "properties": {"weight": 5}},
                {"type": "Feature", "geometry": null, "properties": {"name": "nothing"}}
              ]
            }
        "##}
        .parse()
        .unwrap();

        let drawable = Drawable::build(LayerId(7), Arc::from("mixed"), &content);
        assert_eq!(drawable.id(), LayerId(7));
        assert_eq!(drawable.name(), "mixed");
        assert_eq!(drawable.sublayers().len(), 3);

        let positions: Vec<_> = drawable.sublayers().iter().map(Sublayer::position).collect();
        assert_eq!(positions, [Some(GeoPoint::new(20.0, 10.0)), None, None]);

        let Sublayer::Marker(marker) = &drawable.sublayers()[0] else {
            panic!("expected a marker");
        };
        assert_eq!(marker.style.color, "#ff0000");
        assert!(matches!(&drawable.sublayers()[1], Sublayer::MarkerGroup(m) if m.len() == 2));
        let Sublayer::Shape(shape) = &drawable.sublayers()[2] else {
            panic!("expected a shape");
        };
        assert_eq!(shape.style.weight, Some(5.0));
        assert_eq!(shape.style.color.as_deref(), Some("#ff0000"));
        assert_eq!(drawable.markers().count(), 1);
    }

    #[test]
    fn skips_short_positions() {
        let feature = Feature {
            bbox: None,
            geometry: Some(geojson::Geometry::new(Geometry::Point(vec![1.0]))),
            id: None,
            properties: None,
            foreign_members: None,
        };
        let content = OverlayContent::new(vec![feature], geojson::JsonObject::new()).unwrap();
        let drawable = Drawable::build(LayerId(1), Arc::from("short"), &content);
        assert!(drawable.sublayers().is_empty());
    }

    #[test]
    fn displays_layer_id() {
        assert_eq!(LayerId(42).to_string(), "#42");
    }
}
