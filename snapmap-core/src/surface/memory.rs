use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{Map, Value};
use snapmap_geo_utils::{GeoPoint, PixelPoint, Viewport};

use crate::SurfaceError;
use crate::overlays::{Drawable, LayerId};
use crate::surface::{HoverMarker, LayerSelector, MapSurface};

/// A headless [`MapSurface`] that keeps track of what would be drawn.
///
/// Used by the session replay and by tests.
#[derive(Debug, Clone)]
pub struct MemorySurface {
    viewport: Viewport,
    attached: BTreeMap<LayerId, Arc<str>>,
    marker: Option<HoverMarker>,
    attach_count: usize,
    detach_count: usize,
    map_options: Map<String, Value>,
}

impl MemorySurface {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            attached: BTreeMap::new(),
            marker: None,
            attach_count: 0,
            detach_count: 0,
            map_options: Map::new(),
        }
    }

    /// Stores engine-specific options. They are never interpreted.
    #[must_use]
    pub fn with_map_options(mut self, map_options: Map<String, Value>) -> Self {
        self.map_options = map_options;
        self
    }

    #[must_use]
    pub fn map_options(&self) -> &Map<String, Value> {
        &self.map_options
    }

    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Direct access to the camera. Callers must notify the map view after changing it.
    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    /// The currently shown hover marker.
    #[must_use]
    pub fn marker(&self) -> Option<&HoverMarker> {
        self.marker.as_ref()
    }

    /// Names of the attached drawables, ordered by layer id.
    pub fn attached_names(&self) -> impl Iterator<Item = &str> {
        self.attached.values().map(AsRef::as_ref)
    }

    #[must_use]
    pub fn attached_count(&self) -> usize {
        self.attached.len()
    }

    /// Total number of successful attach operations.
    #[must_use]
    pub fn attach_count(&self) -> usize {
        self.attach_count
    }

    /// Total number of successful detach operations.
    #[must_use]
    pub fn detach_count(&self) -> usize {
        self.detach_count
    }
}

impl MapSurface for MemorySurface {
    fn attach(&mut self, drawable: &Drawable) {
        if self
            .attached
            .insert(drawable.id(), Arc::from(drawable.name()))
            .is_none()
        {
            self.attach_count += 1;
        }
    }

    fn detach(&mut self, id: LayerId) -> Result<(), SurfaceError> {
        self.attached
            .remove(&id)
            .ok_or(SurfaceError::LayerNotAttached(id))?;
        self.detach_count += 1;
        Ok(())
    }

    fn is_attached(&self, id: LayerId) -> bool {
        self.attached.contains_key(&id)
    }

    fn project(&self, point: GeoPoint) -> PixelPoint {
        self.viewport.to_container(point)
    }

    fn show_marker(&mut self, marker: &HoverMarker) {
        self.marker = Some(marker.clone());
    }

    fn hide_marker(&mut self) {
        self.marker = None;
    }
}

/// A headless [`LayerSelector`] listing overlay names by layer id.
#[derive(Debug, Clone, Default)]
pub struct MemoryLayerControl {
    entries: BTreeMap<LayerId, String>,
}

impl MemoryLayerControl {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Listed names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.values().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn contains(&self, id: LayerId) -> bool {
        self.entries.contains_key(&id)
    }
}

impl LayerSelector for MemoryLayerControl {
    fn add_overlay(&mut self, id: LayerId, name: &str) {
        self.entries.insert(id, name.to_string());
    }

    fn remove_overlay(&mut self, id: LayerId) -> Result<(), SurfaceError> {
        self.entries
            .remove(&id)
            .map(|_| ())
            .ok_or(SurfaceError::OverlayNotListed(id))
    }
}
