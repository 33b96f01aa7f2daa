use std::collections::HashMap;
use std::sync::Arc;

use geojson::Feature;
use snapmap_geo_utils::{CellCoord, GeoPoint, PixelBounds, PixelPoint, cell_radius};
use tracing::{debug, trace};

use crate::hover::DEFAULT_THRESHOLD_PX;
use crate::overlays::OverlayRecord;
use crate::surface::MapSurface;

/// One hoverable point, valid until the next rebuild.
#[derive(Debug, Clone)]
pub struct HoverCandidate {
    /// Container pixel position at the time of the last rebuild.
    pub pixel: PixelPoint,
    pub position: GeoPoint,
    pub feature: Arc<Feature>,
    /// Name of the overlay the point belongs to.
    pub overlay: Arc<str>,
}

/// A grid-bucketed index over the pixel positions of all hoverable points.
///
/// The grid cell size is the hover threshold, so any point within the threshold of a query
/// lies in the 3x3 block of cells around the query's cell. The index is never updated in
/// place: every rebuild replaces it.
#[derive(Debug, Clone)]
pub struct HoverIndex {
    cell_size: f64,
    cells: HashMap<CellCoord, Vec<HoverCandidate>>,
    len: usize,
    bounds: PixelBounds,
    generation: u64,
}

impl HoverIndex {
    /// An empty index. Non-positive or non-finite cell sizes fall back to the default threshold.
    #[must_use]
    pub fn new(cell_size: f64) -> Self {
        let cell_size = if cell_size.is_finite() && cell_size > 0.0 {
            cell_size
        } else {
            DEFAULT_THRESHOLD_PX
        };
        Self {
            cell_size,
            cells: HashMap::new(),
            len: 0,
            bounds: PixelBounds::EMPTY,
            generation: 0,
        }
    }

    /// Buckets the candidates, dropping those with non-finite pixel positions.
    #[must_use]
    pub fn from_candidates(
        cell_size: f64,
        candidates: impl IntoIterator<Item = HoverCandidate>,
    ) -> Self {
        let mut index = Self::new(cell_size);
        let mut skipped = 0_usize;
        for candidate in candidates {
            if !candidate.pixel.is_finite() {
                skipped += 1;
                continue;
            }
            index.bounds.extend(candidate.pixel);
            index
                .cells
                .entry(CellCoord::of(candidate.pixel, index.cell_size))
                .or_default()
                .push(candidate);
            index.len += 1;
        }
        if skipped > 0 {
            trace!("Excluded {skipped} points with non-finite pixel positions from the hover index");
        }
        index
    }

    /// Projects every marker of the hover-eligible overlays that are attached to the surface.
    #[must_use]
    pub fn build<'a, S>(
        cell_size: f64,
        records: impl IntoIterator<Item = &'a OverlayRecord>,
        surface: &S,
    ) -> Self
    where
        S: MapSurface + ?Sized,
    {
        let candidates = records
            .into_iter()
            .filter(|record| record.hover_eligible())
            .filter(|record| surface.is_attached(record.drawable().id()))
            .flat_map(|record| {
                let overlay = record.drawable().shared_name();
                record.drawable().sublayers().iter().filter_map(move |sublayer| {
                    let position = sublayer.position()?;
                    let feature = sublayer.feature()?;
                    Some(HoverCandidate {
                        pixel: surface.project(position),
                        position,
                        feature: Arc::clone(feature),
                        overlay: Arc::clone(overlay),
                    })
                })
            });
        Self::from_candidates(cell_size, candidates)
    }

    /// Replaces the whole index with a fresh build.
    pub fn rebuild<'a, S>(
        &mut self,
        cell_size: f64,
        records: impl IntoIterator<Item = &'a OverlayRecord>,
        surface: &S,
    ) where
        S: MapSurface + ?Sized,
    {
        let generation = self.generation + 1;
        *self = Self::build(cell_size, records, surface);
        self.generation = generation;
        debug!(
            candidates = self.len,
            cells = self.cells.len(),
            generation,
            "Rebuilt hover index"
        );
    }

    /// The candidate closest to `point` within `threshold` pixels.
    ///
    /// Ties go to the first candidate encountered. Non-finite queries and negative or
    /// non-finite thresholds never match. When the threshold spans more grid cells than the
    /// index holds, every candidate is scanned instead of the neighborhood.
    #[must_use]
    pub fn query_nearest(&self, point: PixelPoint, threshold: f64) -> Option<&HoverCandidate> {
        if self.len == 0 || !point.is_finite() || !threshold.is_finite() || threshold < 0.0 {
            return None;
        }
        if !self.bounds.buffered(threshold).contains(point) {
            return None;
        }
        let radius = cell_radius(threshold, self.cell_size);
        let side = radius.saturating_mul(2).saturating_add(1);
        let searched = usize::try_from(side.saturating_mul(side)).unwrap_or(usize::MAX);
        let best = if searched > self.cells.len() {
            nearest(self.candidates(), point)
        } else {
            let home = CellCoord::of(point, self.cell_size);
            nearest(
                home.neighborhood(radius)
                    .filter_map(|cell| self.cells.get(&cell))
                    .flatten(),
                point,
            )
        };
        best.filter(|(_, d)| *d <= threshold).map(|(c, _)| c)
    }

    /// All candidates, in no particular order.
    pub fn candidates(&self) -> impl Iterator<Item = &HoverCandidate> {
        self.cells.values().flatten()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Pixel bounds of all candidates.
    #[must_use]
    pub fn bounds(&self) -> PixelBounds {
        self.bounds
    }

    /// Number of rebuilds this index has gone through.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

fn nearest<'a>(
    candidates: impl Iterator<Item = &'a HoverCandidate>,
    point: PixelPoint,
) -> Option<(&'a HoverCandidate, f64)> {
    let mut best: Option<(&HoverCandidate, f64)> = None;
    for candidate in candidates {
        let distance = candidate.pixel.distance(point);
        if best.is_none_or(|(_, d)| distance < d) {
            best = Some((candidate, distance));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use geojson::{Geometry, Value};
    use rstest::rstest;

    use super::*;

    fn candidate(x: f64, y: f64) -> HoverCandidate {
        let feature = Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::Point(vec![x, y]))),
            id: None,
            properties: None,
            foreign_members: None,
        };
        HoverCandidate {
            pixel: PixelPoint::new(x, y),
            position: GeoPoint::new(y, x),
            feature: Arc::new(feature),
            overlay: Arc::from("test"),
        }
    }

    /// Deterministic pseudo-random coordinates in `0..range`.
    fn scatter(count: usize, range: f64, mut seed: u64) -> Vec<PixelPoint> {
        let mut next = move || {
            seed = seed
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            (seed >> 11) as f64 / (1_u64 << 53) as f64 * range
        };
        (0..count).map(|_| PixelPoint::new(next(), next())).collect()
    }

    #[test]
    fn empty_index_never_matches() {
        let index = HoverIndex::new(25.0);
        assert!(index.is_empty());
        assert!(index.bounds().is_empty());
        assert!(index.query_nearest(PixelPoint::new(0.0, 0.0), 25.0).is_none());
    }

    #[rstest]
    #[case(PixelPoint::new(10.0, 10.0), Some((10.0, 10.0)))]
    #[case(PixelPoint::new(24.0, 24.0), Some((30.0, 30.0)))]
    #[case(PixelPoint::new(-14.0, 10.0), Some((10.0, 10.0)))]
    #[case(PixelPoint::new(-16.0, 10.0), None)]
    #[case(PixelPoint::new(500.0, 500.0), None)]
    #[case(PixelPoint::new(f64::NAN, 0.0), None)]
    fn finds_nearest(#[case] query: PixelPoint, #[case] expected: Option<(f64, f64)>) {
        let index = HoverIndex::from_candidates(25.0, [candidate(10.0, 10.0), candidate(30.0, 30.0)]);
        let found = index
            .query_nearest(query, 25.0)
            .map(|c| (c.pixel.x, c.pixel.y));
        assert_eq!(found, expected);
    }

    #[test]
    fn exact_threshold_is_inclusive() {
        let index = HoverIndex::from_candidates(25.0, [candidate(25.0, 0.0)]);
        assert!(index.query_nearest(PixelPoint::new(0.0, 0.0), 25.0).is_some());
        assert!(index.query_nearest(PixelPoint::new(-0.001, 0.0), 25.0).is_none());
        assert!(index.query_nearest(PixelPoint::new(0.0, 0.0), -1.0).is_none());
    }

    #[test]
    fn ties_go_to_first_inserted() {
        let first = candidate(5.0, 5.0);
        let mut second = candidate(5.0, 5.0);
        second.overlay = Arc::from("second");
        let index = HoverIndex::from_candidates(25.0, [first, second]);
        let found = index.query_nearest(PixelPoint::new(6.0, 6.0), 25.0).unwrap();
        assert_eq!(found.overlay.as_ref(), "test");
    }

    #[test]
    fn excludes_non_finite_points() {
        let index = HoverIndex::from_candidates(25.0, [
            candidate(1.0, 1.0),
            candidate(f64::INFINITY, 1.0),
            candidate(1.0, f64::NAN),
        ]);
        assert_eq!(index.len(), 1);
        assert_eq!(index.candidates().count(), 1);
        assert_eq!(index.bounds(), PixelBounds::new(1.0, 1.0, 1.0, 1.0));
    }

    #[test]
    fn matches_brute_force() {
        let threshold = 25.0;
        let points = scatter(2_000, 1_000.0, 7);
        let index = HoverIndex::from_candidates(
            threshold,
            points.iter().map(|p| candidate(p.x, p.y)),
        );
        assert_eq!(index.len(), points.len());

        for query in scatter(500, 1_000.0, 99) {
            let expected = points
                .iter()
                .map(|p| p.distance(query))
                .filter(|d| *d <= threshold)
                .fold(None, |best: Option<f64>, d| Some(best.map_or(d, |b| b.min(d))));
            let found = index
                .query_nearest(query, threshold)
                .map(|c| c.pixel.distance(query));
            assert_eq!(found, expected, "query {query}");
        }
    }

    #[test]
    fn larger_threshold_widens_search() {
        let index = HoverIndex::from_candidates(10.0, [candidate(0.0, 0.0)]);
        assert!(index.query_nearest(PixelPoint::new(35.0, 0.0), 10.0).is_none());
        assert!(index.query_nearest(PixelPoint::new(35.0, 0.0), 40.0).is_some());
    }

    #[test]
    fn far_queries_never_match() {
        let index = HoverIndex::from_candidates(25.0, [candidate(0.0, 0.0)]);
        assert!(index.query_nearest(PixelPoint::new(1e300, 0.0), 25.0).is_none());
        assert!(index.query_nearest(PixelPoint::new(-1e21, 1e21), 25.0).is_none());
        assert!(index.query_nearest(PixelPoint::new(26.0, 0.0), 25.0).is_none());
    }

    #[test]
    fn non_finite_threshold_never_matches() {
        let index = HoverIndex::from_candidates(25.0, [candidate(0.0, 0.0)]);
        assert!(index.query_nearest(PixelPoint::new(0.0, 0.0), f64::INFINITY).is_none());
        assert!(index.query_nearest(PixelPoint::new(0.0, 0.0), f64::NAN).is_none());
    }

    #[test]
    fn huge_threshold_scans_all_candidates() {
        let index = HoverIndex::from_candidates(1.0, [
            candidate(0.0, 0.0),
            candidate(5e5, 5e5),
            candidate(-3e5, 2e5),
        ]);
        assert_eq!(index.cell_count(), 3);
        let found = index
            .query_nearest(PixelPoint::new(4e5, 4e5), 1e12)
            .unwrap();
        assert_eq!(found.pixel, PixelPoint::new(5e5, 5e5));
        assert!(index.query_nearest(PixelPoint::new(4e5, 4e5), 1e3).is_none());
    }

    #[test]
    fn invalid_cell_size_uses_default() {
        assert_eq!(HoverIndex::new(0.0).cell_size(), DEFAULT_THRESHOLD_PX);
        assert_eq!(HoverIndex::new(f64::NAN).cell_size(), DEFAULT_THRESHOLD_PX);
        assert_eq!(HoverIndex::new(12.0).cell_size(), 12.0);
    }
}
