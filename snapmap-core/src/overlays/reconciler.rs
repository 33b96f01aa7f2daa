use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, trace};

use crate::overlays::{DesiredOverlays, Drawable, Fingerprint, LayerId, OverlayContent};
use crate::surface::{LayerSelector, MapSurface};

/// The materialized state of one named overlay.
#[derive(Debug, Clone)]
pub struct OverlayRecord {
    content: OverlayContent,
    hover_eligible: bool,
    drawable: Drawable,
}

impl OverlayRecord {
    #[must_use]
    pub fn name(&self) -> &str {
        self.drawable.name()
    }

    #[must_use]
    pub fn content(&self) -> &OverlayContent {
        &self.content
    }

    #[must_use]
    pub fn fingerprint(&self) -> Fingerprint {
        self.content.fingerprint()
    }

    #[must_use]
    pub fn hover_eligible(&self) -> bool {
        self.hover_eligible
    }

    #[must_use]
    pub fn drawable(&self) -> &Drawable {
        &self.drawable
    }
}

/// What a reconciliation pass changed, by overlay name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub added: Vec<String>,
    pub replaced: Vec<String>,
    pub removed: Vec<String>,
}

impl ReconcileReport {
    /// `true` when no drawable was created or destroyed.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.added.is_empty() && self.replaced.is_empty() && self.removed.is_empty()
    }

    /// `true` when the set of drawn points may have changed.
    #[must_use]
    pub fn topology_changed(&self) -> bool {
        !self.is_noop()
    }
}

/// Owns the drawables of one map view and keeps them in sync with the desired overlays.
///
/// Drawables are only ever created and destroyed here. A drawable whose name, content
/// fingerprint and hover eligibility are unchanged is kept as is across passes.
#[derive(Debug, Default)]
pub struct OverlayReconciler {
    records: BTreeMap<String, OverlayRecord>,
    next_layer_id: u64,
}

impl OverlayReconciler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Brings the materialized overlays in line with `desired`.
    ///
    /// Stale overlays are removed first, then new or changed overlays are (re)built and
    /// attached to the surface and the layer selector. Detaching something that is already
    /// gone is not an error.
    pub fn reconcile<S, L>(
        &mut self,
        desired: &DesiredOverlays,
        surface: &mut S,
        selector: &mut L,
    ) -> ReconcileReport
    where
        S: MapSurface + ?Sized,
        L: LayerSelector + ?Sized,
    {
        let merged = desired.merged();
        let mut report = ReconcileReport::default();

        let stale: Vec<String> = self
            .records
            .keys()
            .filter(|name| !merged.contains_key(name.as_str()))
            .cloned()
            .collect();
        for name in stale {
            if let Some(record) = self.records.remove(&name) {
                detach(&record.drawable, surface, selector);
                report.removed.push(name);
            }
        }

        for (name, entry) in merged {
            let replacing = match self.records.get(name) {
                Some(record)
                    if record.fingerprint() == entry.content.fingerprint()
                        && record.hover_eligible == entry.hover_eligible =>
                {
                    continue;
                }
                Some(_) => true,
                None => false,
            };
            if let Some(old) = self.records.remove(name) {
                detach(&old.drawable, surface, selector);
            }

            let id = self.next_id();
            let drawable = Drawable::build(id, Arc::from(name), entry.content);
            surface.attach(&drawable);
            selector.add_overlay(id, name);
            self.records.insert(name.to_string(), OverlayRecord {
                content: entry.content.clone(),
                hover_eligible: entry.hover_eligible,
                drawable,
            });

            if replacing {
                report.replaced.push(name.to_string());
            } else {
                report.added.push(name.to_string());
            }
        }

        debug!(
            added = report.added.len(),
            replaced = report.replaced.len(),
            removed = report.removed.len(),
            total = self.records.len(),
            "Reconciled overlays"
        );
        report
    }

    /// Shows or hides an overlay without rebuilding its drawable.
    ///
    /// Returns `true` if the surface changed. Unknown names are ignored.
    pub fn set_visible<S>(&self, name: &str, visible: bool, surface: &mut S) -> bool
    where
        S: MapSurface + ?Sized,
    {
        let Some(record) = self.records.get(name) else {
            trace!("Ignoring visibility change of unknown overlay {name}");
            return false;
        };
        let id = record.drawable.id();
        match (visible, surface.is_attached(id)) {
            (true, false) => {
                surface.attach(&record.drawable);
                true
            }
            (false, true) => surface.detach(id).is_ok(),
            _ => false,
        }
    }

    fn next_id(&mut self) -> LayerId {
        self.next_layer_id += 1;
        LayerId(self.next_layer_id)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&OverlayRecord> {
        self.records.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    /// All records, ordered by name.
    pub fn records(&self) -> impl Iterator<Item = &OverlayRecord> {
        self.records.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn detach<S, L>(drawable: &Drawable, surface: &mut S, selector: &mut L)
where
    S: MapSurface + ?Sized,
    L: LayerSelector + ?Sized,
{
    if let Err(e) = surface.detach(drawable.id()) {
        trace!("Ignoring failure to detach overlay {}: {e}", drawable.name());
    }
    if let Err(e) = selector.remove_overlay(drawable.id()) {
        trace!("Ignoring failure to unlist overlay {}: {e}", drawable.name());
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use snapmap_geo_utils::{GeoPoint, Viewport};

    use super::*;
    use crate::overlays::ScatterBuilder;
    use crate::surface::{MemoryLayerControl, MemorySurface};

    fn points(coords: &[[f64; 2]]) -> OverlayContent {
        ScatterBuilder::new(
            coords.iter().map(|c| c[0]).collect(),
            coords.iter().map(|c| c[1]).collect(),
        )
        .build()
        .unwrap()
    }

    fn setup() -> (OverlayReconciler, MemorySurface, MemoryLayerControl) {
        let viewport = Viewport::new(GeoPoint::new(0.0, 0.0), 5.0, 800.0, 600.0).unwrap();
        (
            OverlayReconciler::new(),
            MemorySurface::new(viewport),
            MemoryLayerControl::new(),
        )
    }

    #[test]
    fn second_identical_pass_is_noop() {
        let (mut reconciler, mut surface, mut control) = setup();
        let mut desired = DesiredOverlays::new();
        desired.insert("a", points(&[[0.0, 0.0]]), true);
        desired.insert("b", points(&[[1.0, 1.0]]), false);

        let first = reconciler.reconcile(&desired, &mut surface, &mut control);
        assert_eq!(first.added, ["a", "b"]);
        let id = reconciler.get("a").unwrap().drawable().id();

        let second = reconciler.reconcile(&desired, &mut surface, &mut control);
        assert!(second.is_noop());
        assert_eq!(surface.attach_count(), 2);
        assert_eq!(surface.detach_count(), 0);
        assert_eq!(reconciler.get("a").unwrap().drawable().id(), id);
    }

    #[test]
    fn equal_content_from_a_new_snapshot_is_reused() {
        let (mut reconciler, mut surface, mut control) = setup();
        let mut desired = DesiredOverlays::new();
        desired.insert("a", points(&[[0.0, 0.0], [0.0, 1.0]]), true);
        reconciler.reconcile(&desired, &mut surface, &mut control);
        let id = reconciler.get("a").unwrap().drawable().id();

        let mut fresh = DesiredOverlays::new();
        fresh.insert("a", points(&[[0.0, 0.0], [0.0, 1.0]]), true);
        assert!(reconciler.reconcile(&fresh, &mut surface, &mut control).is_noop());
        assert_eq!(reconciler.get("a").unwrap().drawable().id(), id);
    }

    #[test]
    fn hover_group_wins() {
        let (mut reconciler, mut surface, mut control) = setup();
        let mut desired = DesiredOverlays::new();
        desired.set_static(BTreeMap::from([("dup".to_string(), points(&[[0.0, 0.0]]))]));
        desired.set_hover(BTreeMap::from([("dup".to_string(), points(&[[0.0, 0.0]]))]));
        reconciler.reconcile(&desired, &mut surface, &mut control);
        assert_eq!(reconciler.len(), 1);
        assert!(reconciler.get("dup").unwrap().hover_eligible());
    }

    #[test]
    fn changes_replace_drawables() {
        let (mut reconciler, mut surface, mut control) = setup();
        let mut desired = DesiredOverlays::new();
        desired.insert("a", points(&[[0.0, 0.0]]), true);
        reconciler.reconcile(&desired, &mut surface, &mut control);
        let first = reconciler.get("a").unwrap().drawable().id();

        desired.insert("a", points(&[[0.0, 0.0]]), false);
        let report = reconciler.reconcile(&desired, &mut surface, &mut control);
        assert_eq!(report.replaced, ["a"]);
        let second = reconciler.get("a").unwrap().drawable().id();
        assert_ne!(first, second);
        assert!(!reconciler.get("a").unwrap().hover_eligible());

        desired.insert("a", points(&[[0.0, 2.0]]), false);
        let report = reconciler.reconcile(&desired, &mut surface, &mut control);
        assert_eq!(report.replaced, ["a"]);
        assert_ne!(reconciler.get("a").unwrap().drawable().id(), second);

        assert!(!surface.is_attached(first));
        assert!(!control.contains(second));
        assert_eq!(surface.attached_count(), 1);
        assert_eq!(control.names(), ["a"]);
    }

    #[test]
    fn removes_stale_overlays_everywhere() {
        let (mut reconciler, mut surface, mut control) = setup();
        let mut desired = DesiredOverlays::new();
        desired.insert("a", points(&[[0.0, 0.0]]), true);
        desired.insert("b", points(&[[1.0, 1.0]]), true);
        reconciler.reconcile(&desired, &mut surface, &mut control);
        let b = reconciler.get("b").unwrap().drawable().id();

        desired.remove("b");
        let report = reconciler.reconcile(&desired, &mut surface, &mut control);
        assert_eq!(report.removed, ["b"]);
        assert!(report.added.is_empty() && report.replaced.is_empty());
        assert!(!reconciler.contains("b"));
        assert!(!surface.is_attached(b));
        assert!(!control.contains(b));
        assert_eq!(reconciler.names().collect::<Vec<_>>(), ["a"]);
    }

    #[test]
    fn removing_a_hidden_overlay_is_silent() {
        let (mut reconciler, mut surface, mut control) = setup();
        let mut desired = DesiredOverlays::new();
        desired.insert("a", points(&[[0.0, 0.0]]), true);
        reconciler.reconcile(&desired, &mut surface, &mut control);

        assert!(reconciler.set_visible("a", false, &mut surface));
        assert!(!reconciler.set_visible("a", false, &mut surface));
        desired.clear();
        let report = reconciler.reconcile(&desired, &mut surface, &mut control);
        assert_eq!(report.removed, ["a"]);
        assert!(reconciler.is_empty());
    }

    #[test]
    fn visibility_keeps_the_drawable() {
        let (mut reconciler, mut surface, mut control) = setup();
        let mut desired = DesiredOverlays::new();
        desired.insert("a", points(&[[0.0, 0.0]]), true);
        reconciler.reconcile(&desired, &mut surface, &mut control);
        let id = reconciler.get("a").unwrap().drawable().id();

        assert!(reconciler.set_visible("a", false, &mut surface));
        assert!(!surface.is_attached(id));
        assert!(reconciler.set_visible("a", true, &mut surface));
        assert!(surface.is_attached(id));
        assert!(!reconciler.set_visible("missing", true, &mut surface));
        assert_eq!(reconciler.get("a").unwrap().drawable().id(), id);
    }
}
