use geojson::Feature;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use snapmap_geo_utils::GeoPoint;
use tracing::trace;

use crate::hover::{FrameQueue, FrameTask, HoverCandidate, HoverIndex, HoverOptions};
use crate::surface::{HoverMarker, MapSurface};

/// A raw pointer move over the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub position: GeoPoint,
}

impl From<GeoPoint> for PointerEvent {
    fn from(position: GeoPoint) -> Self {
        Self { position }
    }
}

/// Turns pointer moves into at most one hover query per frame and drives the hover marker.
///
/// The controller only reads the index. Keeping it fresh is up to the owner of the map view.
#[derive(Debug, Clone)]
pub struct HoverController {
    options: HoverOptions,
    enabled: bool,
    last_event: Option<PointerEvent>,
    frame_pending: bool,
    marker_visible: bool,
}

impl HoverController {
    #[must_use]
    pub fn new(options: HoverOptions, enabled: bool) -> Self {
        Self {
            options,
            enabled,
            last_event: None,
            frame_pending: false,
            marker_visible: false,
        }
    }

    #[must_use]
    pub fn options(&self) -> &HoverOptions {
        &self.options
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub fn is_frame_pending(&self) -> bool {
        self.frame_pending
    }

    #[must_use]
    pub fn is_marker_visible(&self) -> bool {
        self.marker_visible
    }

    #[must_use]
    pub fn last_event(&self) -> Option<PointerEvent> {
        self.last_event
    }

    /// Records the latest pointer position and schedules a query for the next frame.
    ///
    /// Moves arriving while a query is already scheduled only replace the stored position.
    /// Returns `true` if a new frame task was scheduled.
    pub fn pointer_moved(&mut self, event: PointerEvent, frames: &mut FrameQueue) -> bool {
        if !self.enabled {
            return false;
        }
        self.last_event = Some(event);
        if self.frame_pending {
            return false;
        }
        self.frame_pending = true;
        frames.schedule(FrameTask::HoverQuery);
        true
    }

    /// Runs the scheduled query against the latest pointer position.
    ///
    /// On a hit the marker moves to the candidate and the candidate is returned, on a miss
    /// the marker is hidden.
    pub fn on_frame<S>(&mut self, index: &HoverIndex, surface: &mut S) -> Option<HoverCandidate>
    where
        S: MapSurface + ?Sized,
    {
        if !self.frame_pending {
            return None;
        }
        self.frame_pending = false;
        if !self.enabled {
            return None;
        }
        let event = self.last_event?;
        let pixel = surface.project(event.position);
        let threshold = self.options.effective_threshold();
        match index.query_nearest(pixel, threshold) {
            Some(candidate) => {
                let marker = HoverMarker {
                    position: candidate.position,
                    label: label(&candidate.feature),
                    radius: self.options.marker_radius,
                    color: self.options.marker_color.clone(),
                    opacity: self.options.marker_opacity,
                };
                surface.show_marker(&marker);
                self.marker_visible = true;
                Some(candidate.clone())
            }
            None => {
                trace!("No hover candidate within {threshold}px of {pixel}");
                self.hide(surface);
                None
            }
        }
    }

    /// The pointer left the map: hide the marker whatever the last query found.
    pub fn pointer_left<S>(&mut self, surface: &mut S)
    where
        S: MapSurface + ?Sized,
    {
        self.last_event = None;
        self.hide(surface);
    }

    /// Turns hover handling on or off. Disabling hides the marker and drops any pending query.
    pub fn set_enabled<S>(&mut self, enabled: bool, surface: &mut S, frames: &mut FrameQueue)
    where
        S: MapSurface + ?Sized,
    {
        self.enabled = enabled;
        if !enabled {
            self.last_event = None;
            if self.frame_pending {
                frames.cancel(FrameTask::HoverQuery);
                self.frame_pending = false;
            }
            self.hide(surface);
        }
    }

    fn hide<S>(&mut self, surface: &mut S)
    where
        S: MapSurface + ?Sized,
    {
        surface.hide_marker();
        self.marker_visible = false;
    }
}

/// The marker label for a feature.
///
/// Uses the `name` property when there is one, otherwise all properties as `key: value`
/// pairs sorted by key and joined by commas. Features without properties get an empty label.
#[must_use]
pub fn label(feature: &Feature) -> String {
    let Some(properties) = feature.properties.as_ref() else {
        return String::new();
    };
    match properties.get("name") {
        Some(Value::String(name)) if !name.is_empty() => return name.clone(),
        Some(Value::Number(name)) => return name.to_string(),
        _ => {}
    }
    let mut pairs: Vec<_> = properties.iter().collect();
    pairs.sort_unstable_by_key(|(key, _)| *key);
    pairs
        .into_iter()
        .map(|(key, value)| match value {
            Value::String(text) => format!("{key}: {text}"),
            other => format!("{key}: {other}"),
        })
        .collect::<Vec<_>>()
        .join(", ")
}
