use std::fmt::{Debug, Display, Formatter};
use std::io;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use geojson::{Feature, FeatureCollection, GeoJson, JsonObject, JsonValue};
use xxhash_rust::xxh3::Xxh3;

use crate::ContentError;

/// Key of the collection-level property map inside a `FeatureCollection`'s foreign members.
const PROPERTIES_KEY: &str = "properties";

/// A cheap equality witness for [`OverlayContent`].
///
/// Two contents with the same features, the same collection-level properties and the same
/// foreign members have the same fingerprint, regardless of the key order of their JSON maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint(u128);

impl Display for Fingerprint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

/// Feeds serialized JSON straight into the hasher instead of building a string first.
struct HashWriter(Xxh3);

impl io::Write for HashWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// The geographic content of one overlay: a feature collection with collection-level properties.
///
/// Content is immutable. Cloning is cheap, features are shared with the drawables and
/// hover candidates built from them.
#[derive(Clone)]
pub struct OverlayContent {
    features: Arc<[Arc<Feature>]>,
    properties: Arc<JsonObject>,
    members: Arc<JsonObject>,
    fingerprint: Fingerprint,
}

impl Debug for OverlayContent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayContent")
            .field("features", &self.features.len())
            .field("properties", &self.properties)
            .field("fingerprint", &self.fingerprint)
            .finish()
    }
}

impl PartialEq for OverlayContent {
    fn eq(&self, other: &Self) -> bool {
        self.fingerprint == other.fingerprint
    }
}

impl OverlayContent {
    /// Creates content from features and collection-level properties.
    pub fn new(features: Vec<Feature>, properties: JsonObject) -> Result<Self, ContentError> {
        Self::with_members(features, properties, JsonObject::new())
    }

    fn with_members(
        features: Vec<Feature>,
        properties: JsonObject,
        members: JsonObject,
    ) -> Result<Self, ContentError> {
        let features: Arc<[Arc<Feature>]> = features.into_iter().map(Arc::new).collect();
        let fingerprint = fingerprint(&features, &properties, &members)?;
        Ok(Self {
            features,
            properties: Arc::new(properties),
            members: Arc::new(members),
            fingerprint,
        })
    }

    /// Normalizes any `GeoJSON` document into a feature collection.
    ///
    /// A single feature becomes a one-element collection, a bare geometry becomes a
    /// property-less feature. Collection-level properties are read from the collection's
    /// `properties` member.
    pub fn from_geojson(geojson: GeoJson) -> Result<Self, ContentError> {
        match geojson {
            GeoJson::FeatureCollection(fc) => {
                let mut members = fc.foreign_members.unwrap_or_default();
                let properties = match members.remove(PROPERTIES_KEY) {
                    None | Some(JsonValue::Null) => JsonObject::new(),
                    Some(JsonValue::Object(properties)) => properties,
                    Some(other) => return Err(ContentError::InvalidProperties(other)),
                };
                Self::with_members(fc.features, properties, members)
            }
            GeoJson::Feature(feature) => Self::new(vec![feature], JsonObject::new()),
            GeoJson::Geometry(geometry) => {
                let feature = Feature {
                    bbox: None,
                    geometry: Some(geometry),
                    id: None,
                    properties: None,
                    foreign_members: None,
                };
                Self::new(vec![feature], JsonObject::new())
            }
        }
    }

    pub fn from_json_value(value: JsonValue) -> Result<Self, ContentError> {
        Self::from_geojson(GeoJson::from_json_value(value)?)
    }

    /// Reads a `GeoJSON` file.
    pub fn from_path(path: &Path) -> Result<Self, ContentError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ContentError::IoError(e, path.to_path_buf()))?;
        let geojson = text
            .parse::<GeoJson>()
            .map_err(|e| ContentError::InvalidGeoJsonFile(e, path.to_path_buf()))?;
        Self::from_geojson(geojson)
    }

    #[must_use]
    pub fn features(&self) -> &[Arc<Feature>] {
        &self.features
    }

    /// Collection-level properties, shared defaults for every feature.
    #[must_use]
    pub fn properties(&self) -> &JsonObject {
        &self.properties
    }

    #[must_use]
    pub fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Converts back into a `GeoJSON` feature collection, collection properties included.
    #[must_use]
    pub fn to_feature_collection(&self) -> FeatureCollection {
        let mut members = self.members.as_ref().clone();
        if !self.properties.is_empty() {
            members.insert(
                PROPERTIES_KEY.to_string(),
                JsonValue::Object(self.properties.as_ref().clone()),
            );
        }
        FeatureCollection {
            bbox: None,
            features: self.features.iter().map(|f| f.as_ref().clone()).collect(),
            foreign_members: (!members.is_empty()).then_some(members),
        }
    }
}

impl FromStr for OverlayContent {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_geojson(s.parse::<GeoJson>()?)
    }
}

fn fingerprint(
    features: &[Arc<Feature>],
    properties: &JsonObject,
    members: &JsonObject,
) -> Result<Fingerprint, ContentError> {
    let mut writer = HashWriter(Xxh3::new());
    for feature in features {
        serde_json::to_writer(&mut writer, feature.as_ref()).map_err(ContentError::Fingerprint)?;
        writer.0.update(b"\n");
    }
    // record separators keep "features" and "properties" from bleeding into each other
    writer.0.update(b"\x1e");
    serde_json::to_writer(&mut writer, properties).map_err(ContentError::Fingerprint)?;
    writer.0.update(b"\x1e");
    serde_json::to_writer(&mut writer, members).map_err(ContentError::Fingerprint)?;
    Ok(Fingerprint(writer.0.digest128()))
}
