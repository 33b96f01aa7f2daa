use std::collections::BTreeMap;

use crate::ContentError;
use crate::overlays::{OverlayContent, ScatterBuilder};

/// One entry of a merged desired-state snapshot.
#[derive(Debug, Clone, Copy)]
pub struct DesiredOverlay<'a> {
    pub content: &'a OverlayContent,
    pub hover_eligible: bool,
}

/// The overlays the external controller wants on the map, split into a static and a hover group.
///
/// A name may appear in both groups. When that happens the hover group wins, see [`Self::merged`].
#[derive(Debug, Clone, Default)]
pub struct DesiredOverlays {
    static_group: BTreeMap<String, OverlayContent>,
    hover_group: BTreeMap<String, OverlayContent>,
}

impl DesiredOverlays {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an overlay.
    ///
    /// The name is first removed from both groups, so an overlay can move between them.
    pub fn insert(&mut self, name: impl Into<String>, content: OverlayContent, hoverable: bool) {
        let name = name.into();
        self.remove(&name);
        if hoverable {
            self.hover_group.insert(name, content);
        } else {
            self.static_group.insert(name, content);
        }
    }

    /// Builds a scatter overlay and inserts it.
    pub fn insert_scatter(
        &mut self,
        name: impl Into<String>,
        builder: &ScatterBuilder,
        hoverable: bool,
    ) -> Result<(), ContentError> {
        let content = builder.build()?;
        self.insert(name, content, hoverable);
        Ok(())
    }

    /// Removes the name from both groups. Returns `true` if anything was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let in_static = self.static_group.remove(name).is_some();
        let in_hover = self.hover_group.remove(name).is_some();
        in_static || in_hover
    }

    pub fn clear(&mut self) {
        self.static_group.clear();
        self.hover_group.clear();
    }

    /// Replaces the whole static group.
    pub fn set_static(&mut self, group: BTreeMap<String, OverlayContent>) {
        self.static_group = group;
    }

    /// Replaces the whole hover group.
    pub fn set_hover(&mut self, group: BTreeMap<String, OverlayContent>) {
        self.hover_group = group;
    }

    #[must_use]
    pub fn static_group(&self) -> &BTreeMap<String, OverlayContent> {
        &self.static_group
    }

    #[must_use]
    pub fn hover_group(&self) -> &BTreeMap<String, OverlayContent> {
        &self.hover_group
    }

    /// Merges both groups into a single name-ordered map.
    ///
    /// On a name collision the hover group's entry is used and the overlay is hover-eligible.
    #[must_use]
    pub fn merged(&self) -> BTreeMap<&str, DesiredOverlay<'_>> {
        let statics = self.static_group.iter().map(|(name, content)| {
            (name.as_str(), DesiredOverlay {
                content,
                hover_eligible: false,
            })
        });
        let hovers = self.hover_group.iter().map(|(name, content)| {
            (name.as_str(), DesiredOverlay {
                content,
                hover_eligible: true,
            })
        });
        // later entries overwrite earlier ones, so hover entries must come last
        statics.chain(hovers).collect()
    }

    /// Number of distinct names across both groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.static_group.len()
            + self
                .hover_group
                .keys()
                .filter(|name| !self.static_group.contains_key(*name))
                .count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.static_group.is_empty() && self.hover_group.is_empty()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.static_group.contains_key(name) || self.hover_group.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(coords: &[[f64; 2]]) -> OverlayContent {
        let lats: Vec<f64> = coords.iter().map(|c| c[0]).collect();
        let lons: Vec<f64> = coords.iter().map(|c| c[1]).collect();
        ScatterBuilder::new(lats, lons).build().unwrap()
    }

    #[test]
    fn hover_group_wins_on_collision() {
        let a = points(&[[0.0, 0.0]]);
        let b = points(&[[1.0, 1.0]]);
        let mut desired = DesiredOverlays::new();
        desired.set_static(BTreeMap::from([("dup".to_string(), a)]));
        desired.set_hover(BTreeMap::from([("dup".to_string(), b.clone())]));

        let merged = desired.merged();
        assert_eq!(merged.len(), 1);
        assert_eq!(desired.len(), 1);
        let entry = merged["dup"];
        assert!(entry.hover_eligible);
        assert_eq!(entry.content.fingerprint(), b.fingerprint());
    }

    #[test]
    fn insert_moves_between_groups() {
        let mut desired = DesiredOverlays::new();
        desired.insert("a", points(&[[0.0, 0.0]]), true);
        assert!(desired.merged()["a"].hover_eligible);

        desired.insert("a", points(&[[0.0, 0.0]]), false);
        assert!(!desired.merged()["a"].hover_eligible);
        assert!(desired.hover_group().is_empty());
        assert_eq!(desired.static_group().len(), 1);
    }

    #[test]
    fn remove_and_clear() {
        let mut desired = DesiredOverlays::new();
        desired.insert("a", points(&[[0.0, 0.0]]), true);
        desired.insert("b", points(&[[0.0, 1.0]]), false);
        assert!(desired.contains("a"));
        assert!(desired.remove("a"));
        assert!(!desired.remove("a"));
        assert!(!desired.contains("a"));
        assert_eq!(desired.len(), 1);

        desired.clear();
        assert!(desired.is_empty());
        assert!(desired.merged().is_empty());
    }

    #[test]
    fn merged_is_name_ordered() {
        let mut desired = DesiredOverlays::new();
        desired.insert("zeta", points(&[[0.0, 0.0]]), false);
        desired.insert("alpha", points(&[[0.0, 0.0]]), true);
        desired.insert("mid", points(&[[0.0, 0.0]]), false);
        let names: Vec<&str> = desired.merged().into_keys().collect();
        assert_eq!(names, ["alpha", "mid", "zeta"]);
    }
}
