use std::sync::Arc;

use geojson::Feature;
use serde::Serialize;
use snapmap_geo_utils::GeoPoint;

use crate::ContentError;
use crate::hover::{
    FrameQueue, FrameTask, HoverCandidate, HoverController, HoverIndex, HoverOptions, PointerEvent,
};
use crate::overlays::{
    DesiredOverlays, OverlayContent, OverlayReconciler, ReconcileReport, ScatterBuilder,
};
use crate::surface::{LayerSelector, MapSurface, MemorySurface};

/// Outbound notifications of a [`MapView`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MapEvent {
    /// Drawables were added, replaced or removed. The hover index has already been rebuilt.
    OverlayTopologyChanged(ReconcileReport),
    /// The pointer snapped to a feature.
    FeatureHovered {
        overlay: Arc<str>,
        position: GeoPoint,
        feature: Arc<Feature>,
    },
}

/// All state of one interactive map: overlays, hover index, hover controller and pending frames.
///
/// Every operation runs to completion before returning. Overlay changes are reconciled and the
/// index rebuilt synchronously, pointer moves are deferred to [`Self::run_frame`].
#[derive(Debug)]
pub struct MapView<S, L> {
    surface: S,
    selector: L,
    desired: DesiredOverlays,
    reconciler: OverlayReconciler,
    index: HoverIndex,
    controller: HoverController,
    frames: FrameQueue,
    events: Vec<MapEvent>,
}

impl<S: MapSurface, L: LayerSelector> MapView<S, L> {
    #[must_use]
    pub fn new(surface: S, selector: L, options: HoverOptions, show_hover: bool) -> Self {
        let index = HoverIndex::new(options.effective_threshold());
        Self {
            surface,
            selector,
            desired: DesiredOverlays::new(),
            reconciler: OverlayReconciler::new(),
            index,
            controller: HoverController::new(options, show_hover),
            frames: FrameQueue::new(),
            events: Vec::new(),
        }
    }

    /// Replaces the desired overlays and reconciles.
    pub fn set_desired(&mut self, desired: DesiredOverlays) -> ReconcileReport {
        self.desired = desired;
        self.reconcile()
    }

    /// Edits the desired overlays in place and reconciles once.
    pub fn update_desired(&mut self, edit: impl FnOnce(&mut DesiredOverlays)) -> ReconcileReport {
        edit(&mut self.desired);
        self.reconcile()
    }

    pub fn add_layer(
        &mut self,
        name: impl Into<String>,
        content: OverlayContent,
        hoverable: bool,
    ) -> ReconcileReport {
        self.desired.insert(name, content, hoverable);
        self.reconcile()
    }

    pub fn add_scatter(
        &mut self,
        name: impl Into<String>,
        builder: &ScatterBuilder,
        hoverable: bool,
    ) -> Result<ReconcileReport, ContentError> {
        self.desired.insert_scatter(name, builder, hoverable)?;
        Ok(self.reconcile())
    }

    pub fn remove_layer(&mut self, name: &str) -> ReconcileReport {
        self.desired.remove(name);
        self.reconcile()
    }

    pub fn clear_layers(&mut self) -> ReconcileReport {
        self.desired.clear();
        self.reconcile()
    }

    fn reconcile(&mut self) -> ReconcileReport {
        let report = self
            .reconciler
            .reconcile(&self.desired, &mut self.surface, &mut self.selector);
        if report.topology_changed() {
            self.rebuild_index();
            self.events
                .push(MapEvent::OverlayTopologyChanged(report.clone()));
        }
        report
    }

    fn rebuild_index(&mut self) {
        let cell_size = self.controller.options().effective_threshold();
        self.index
            .rebuild(cell_size, self.reconciler.records(), &self.surface);
    }

    /// The viewport was panned, zoomed or resized: pixel positions are stale.
    pub fn viewport_changed(&mut self) {
        self.rebuild_index();
    }

    /// Shows or hides an overlay on the surface without re-creating it.
    ///
    /// Returns `true` if anything changed.
    pub fn set_overlay_visible(&mut self, name: &str, visible: bool) -> bool {
        let changed = self
            .reconciler
            .set_visible(name, visible, &mut self.surface);
        if changed {
            self.rebuild_index();
        }
        changed
    }

    pub fn set_show_hover(&mut self, show: bool) {
        self.controller
            .set_enabled(show, &mut self.surface, &mut self.frames);
    }

    /// Returns `true` if a frame was requested.
    pub fn pointer_moved(&mut self, event: impl Into<PointerEvent>) -> bool {
        self.controller
            .pointer_moved(event.into(), &mut self.frames)
    }

    pub fn pointer_left(&mut self) {
        self.controller.pointer_left(&mut self.surface);
    }

    /// Runs the tasks scheduled for this frame. Returns the hovered candidate, if any.
    pub fn run_frame(&mut self) -> Option<HoverCandidate> {
        let mut hovered = None;
        for task in self.frames.take_frame() {
            match task {
                FrameTask::HoverQuery => {
                    if let Some(candidate) = self.controller.on_frame(&self.index, &mut self.surface)
                    {
                        self.events.push(MapEvent::FeatureHovered {
                            overlay: Arc::clone(&candidate.overlay),
                            position: candidate.position,
                            feature: Arc::clone(&candidate.feature),
                        });
                        hovered = Some(candidate);
                    }
                }
            }
        }
        hovered
    }

    /// Takes the notifications emitted since the last call.
    pub fn take_events(&mut self) -> Vec<MapEvent> {
        std::mem::take(&mut self.events)
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    #[must_use]
    pub fn selector(&self) -> &L {
        &self.selector
    }

    #[must_use]
    pub fn desired(&self) -> &DesiredOverlays {
        &self.desired
    }

    #[must_use]
    pub fn reconciler(&self) -> &OverlayReconciler {
        &self.reconciler
    }

    #[must_use]
    pub fn index(&self) -> &HoverIndex {
        &self.index
    }

    #[must_use]
    pub fn controller(&self) -> &HoverController {
        &self.controller
    }

    #[must_use]
    pub fn has_pending_frame(&self) -> bool {
        !self.frames.is_empty()
    }

    /// Number of hover index rebuilds so far.
    #[must_use]
    pub fn rebuild_count(&self) -> u64 {
        self.index.generation()
    }
}

impl<L: LayerSelector> MapView<MemorySurface, L> {
    /// Drags the map by `(dx, dy)` pixels.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.surface.viewport_mut().pan_by(dx, dy);
        self.viewport_changed();
    }

    pub fn zoom_to(&mut self, zoom: f64) {
        self.surface.viewport_mut().set_zoom(zoom);
        self.viewport_changed();
    }

    /// Resizes the map container.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.surface.viewport_mut().resize(width, height);
        self.viewport_changed();
    }
}
