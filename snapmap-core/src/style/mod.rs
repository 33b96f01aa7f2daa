//! Per-feature styling.
//!
//! Every style attribute is looked up in the feature's properties first and in the
//! collection-level properties second. Nothing here ever fails: missing or malformed
//! attributes fall back to fixed defaults.

use geojson::JsonObject;
use serde::Serialize;
use serde_json::Value;

mod color;
pub use color::Rgb;

mod ramp;
pub use ramp::{ColorRamp, RAMP_NAMES};

/// Point colour when neither an explicit colour nor a value mapping is available.
pub const DEFAULT_POINT_COLOR: &str = "#1f77b4";
pub const DEFAULT_POINT_RADIUS: f64 = 3.0;

pub const DEFAULT_SHAPE_COLOR: &str = "#3388ff";
pub const DEFAULT_SHAPE_WEIGHT: f64 = 2.0;
pub const DEFAULT_SHAPE_FILL_OPACITY: f64 = 0.2;

/// Resolved options of a point marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerStyle {
    pub radius: f64,
    pub weight: f64,
    pub color: String,
    pub fill_color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_opacity: Option<f64>,
    /// Markers never capture pointer events, hover goes through the spatial index.
    pub interactive: bool,
}

impl MarkerStyle {
    /// Resolves marker options for a point feature.
    ///
    /// Properties are merged as defaults, then collection, then feature. The colour is the
    /// merged `color`, else the merged `fillColor`, else the feature's `value` mapped through
    /// `cmap` over `[vmin, vmax]`, else [`DEFAULT_POINT_COLOR`].
    #[must_use]
    pub fn resolve(feature: Option<&JsonObject>, collection: &JsonObject) -> Self {
        let lookup = |key: &str| {
            feature
                .and_then(|props| props.get(key))
                .or_else(|| collection.get(key))
        };
        let number = |key: &str| lookup(key).and_then(Value::as_f64);
        let color = lookup("color").and_then(non_empty_str);
        let fill_color = lookup("fillColor").and_then(non_empty_str);

        let chosen = color
            .or(fill_color)
            .map(str::to_string)
            .or_else(|| value_color(feature, collection))
            .unwrap_or_else(|| DEFAULT_POINT_COLOR.to_string());

        Self {
            radius: number("radius").unwrap_or(DEFAULT_POINT_RADIUS),
            weight: number("weight").unwrap_or(0.0),
            color: color.map_or_else(|| chosen.clone(), str::to_string),
            fill_color: fill_color.map_or_else(|| chosen.clone(), str::to_string),
            opacity: number("opacity"),
            fill_opacity: number("fillOpacity"),
            interactive: false,
        }
    }
}

/// The feature's `value` mapped through the colormap.
///
/// `vmin`, `vmax` and `cmap` are read from the collection first, then from the feature.
fn value_color(feature: Option<&JsonObject>, collection: &JsonObject) -> Option<String> {
    let value = feature?.get("value")?.as_f64()?;
    let domain = |key: &str| {
        collection
            .get(key)
            .filter(|v| !v.is_null())
            .or_else(|| feature.and_then(|props| props.get(key)))
            .filter(|v| !v.is_null())
    };
    let vmin = domain("vmin")?.as_f64()?;
    let vmax = domain("vmax")?.as_f64()?;
    let cmap = domain("cmap")?;
    if !value.is_finite() {
        return None;
    }
    Some(ColorRamp::from_cmap(cmap).map(value, vmin, vmax).to_hex())
}

fn non_empty_str(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.is_empty())
}

/// Resolved style of a non-point feature (lines and polygons).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash_array: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_cap: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_join: Option<String>,
}

impl PathStyle {
    /// Resolves a path style from the allow-listed attributes.
    ///
    /// When none of them is set anywhere, the result is a thin blue outline with a light fill.
    #[must_use]
    pub fn resolve(feature: Option<&JsonObject>, collection: &JsonObject) -> Self {
        let lookup = |key: &str| {
            feature
                .and_then(|props| props.get(key))
                .filter(|v| !v.is_null())
                .or_else(|| collection.get(key).filter(|v| !v.is_null()))
        };
        let text = |key: &str| lookup(key).and_then(Value::as_str).map(str::to_string);
        let number = |key: &str| lookup(key).and_then(Value::as_f64);

        let style = Self {
            color: text("color"),
            weight: number("weight"),
            opacity: number("opacity"),
            fill_color: text("fillColor"),
            fill_opacity: number("fillOpacity"),
            dash_array: lookup("dashArray").and_then(|v| match v {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            }),
            line_cap: text("lineCap"),
            line_join: text("lineJoin"),
        };
        if style == Self::default() {
            Self::fallback()
        } else {
            style
        }
    }

    #[must_use]
    pub fn fallback() -> Self {
        Self {
            color: Some(DEFAULT_SHAPE_COLOR.to_string()),
            weight: Some(DEFAULT_SHAPE_WEIGHT),
            fill_opacity: Some(DEFAULT_SHAPE_FILL_OPACITY),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn props(value: Value) -> JsonObject {
        match value {
            Value::Object(map) => map,
            _ => unreachable!("test fixture must be an object"),
        }
    }

    #[test]
    fn point_defaults() {
        let style = MarkerStyle::resolve(None, &JsonObject::new());
        assert_eq!(style.radius, 3.0);
        assert_eq!(style.weight, 0.0);
        assert_eq!(style.color, DEFAULT_POINT_COLOR);
        assert_eq!(style.fill_color, DEFAULT_POINT_COLOR);
        assert!(!style.interactive);
    }

    #[test]
    fn feature_color_beats_collection_color() {
        let collection = props(json!({"color": "blue", "radius": 5}));
        let feature = props(json!({"color": "green"}));
        let style = MarkerStyle::resolve(Some(&feature), &collection);
        assert_eq!(style.color, "green");
        assert_eq!(style.fill_color, "green");
        assert_eq!(style.radius, 5.0);

        let style = MarkerStyle::resolve(None, &collection);
        assert_eq!(style.color, "blue");
    }

    #[test]
    fn fill_color_is_used_when_color_missing() {
        let collection = props(json!({"fillColor": "#00ff00", "color": ""}));
        let style = MarkerStyle::resolve(None, &collection);
        assert_eq!(style.color, "#00ff00");
        assert_eq!(style.fill_color, "#00ff00");
    }

    #[test]
    fn explicit_color_wins_over_value() {
        let collection = props(json!({"vmin": 0, "vmax": 10, "cmap": "Greys", "color": "red"}));
        let feature = props(json!({"value": 10}));
        let style = MarkerStyle::resolve(Some(&feature), &collection);
        assert_eq!(style.color, "red");
    }

    #[test]
    fn value_is_mapped_through_ramp() {
        let collection = props(json!({"vmin": 0.0, "vmax": 10.0, "cmap": ["#000000", "#ffffff"]}));
        let low = MarkerStyle::resolve(Some(&props(json!({"value": 0}))), &collection);
        let high = MarkerStyle::resolve(Some(&props(json!({"value": 20}))), &collection);
        let mid = MarkerStyle::resolve(Some(&props(json!({"value": 5}))), &collection);
        assert_eq!(low.color, "#000000");
        assert_eq!(high.color, "#ffffff");
        assert_eq!(mid.fill_color, "#808080");
    }

    #[test]
    fn domain_may_come_from_feature() {
        let feature = props(json!({"value": 1, "vmin": 0, "vmax": 1, "cmap": "Viridis"}));
        let style = MarkerStyle::resolve(Some(&feature), &JsonObject::new());
        assert_eq!(style.color, "#fde725");
    }

    #[test]
    fn incomplete_domain_uses_default() {
        let collection = props(json!({"vmin": 0, "cmap": "Viridis"}));
        let feature = props(json!({"value": 1}));
        let style = MarkerStyle::resolve(Some(&feature), &collection);
        assert_eq!(style.color, DEFAULT_POINT_COLOR);
    }

    #[test]
    fn shape_fallback() {
        let style = PathStyle::resolve(None, &props(json!({"unrelated": 1})));
        assert_eq!(style, PathStyle::fallback());
    }

    #[test]
    fn shape_precedence() {
        let collection = props(json!({"color": "red", "weight": 4, "dashArray": "4 2"}));
        let feature = props(json!({"color": "black", "fillOpacity": 0.5, "radius": 9}));
        let style = PathStyle::resolve(Some(&feature), &collection);
        insta::assert_json_snapshot!(style, @r#"
        {
          "color": "black",
          "weight": 4.0,
          "fillOpacity": 0.5,
          "dashArray": "4 2"
        }
        "#);
    }
}
