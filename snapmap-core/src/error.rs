use std::path::PathBuf;

use crate::overlays::LayerId;

/// Failures reported by a drawing surface or a layer-selection control.
///
/// These are expected during reconciliation (for example when the user already
/// hid an overlay) and are never propagated out of it.
#[non_exhaustive]
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("Layer {0} is not attached to the map")]
    LayerNotAttached(LayerId),

    #[error("Layer {0} is not listed in the layer control")]
    OverlayNotListed(LayerId),
}

/// Errors turning an external overlay definition into [`OverlayContent`](crate::overlays::OverlayContent).
#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum ContentError {
    #[error("Overlay content is not valid GeoJSON: {0}")]
    InvalidGeoJson(#[from] geojson::Error),

    #[error("Collection-level properties must be a JSON object, but got {0}")]
    InvalidProperties(serde_json::Value),

    #[error("Unable to fingerprint overlay content: {0}")]
    Fingerprint(#[source] serde_json::Error),

    #[error("IO error {0}: {1}")]
    IoError(#[source] std::io::Error, PathBuf),

    #[error("Unable to parse GeoJSON file {1}: {0}")]
    InvalidGeoJsonFile(#[source] geojson::Error, PathBuf),
}
