//! Alignment guides between shapes whose anchor cells share a row or column.
//!
//! Diagrams are human-scale, so every recomputation is a plain pairwise scan.

use crate::grid::{Grid, GridCoordinate};
use crate::shapes::ShapeId;
use kurbo::{Point, Rect};
use std::collections::BTreeMap;

/// Direction of a guide line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Orientation {
    /// Shapes share a row.
    Horizontal,
    /// Shapes share a column.
    Vertical,
}

/// Unordered pair of shape ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairKey {
    first: ShapeId,
    second: ShapeId,
}

impl PairKey {
    pub fn new(a: &ShapeId, b: &ShapeId) -> Self {
        if a <= b {
            Self { first: a.clone(), second: b.clone() }
        } else {
            Self { first: b.clone(), second: a.clone() }
        }
    }

    pub fn first(&self) -> &ShapeId {
        &self.first
    }

    pub fn second(&self) -> &ShapeId {
        &self.second
    }

    pub fn contains(&self, id: &ShapeId) -> bool {
        &self.first == id || &self.second == id
    }
}

/// Key of a guide: the pair plus the shared axis.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GuideKey {
    pub pair: PairKey,
    pub orientation: Orientation,
}

impl GuideKey {
    pub fn new(a: &ShapeId, b: &ShapeId, orientation: Orientation) -> Self {
        Self {
            pair: PairKey::new(a, b),
            orientation,
        }
    }
}

/// A guide between two aligned shapes.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentGuide {
    pub key: GuideKey,
    /// The shared row (horizontal) or column (vertical) index.
    pub line: i64,
}

impl AlignmentGuide {
    /// Line segment spanning the full visible extent at the shared row or column.
    pub fn segment(&self, grid: &Grid, visible: Rect) -> (Point, Point) {
        let at = self.line as f64 * grid.cell_size();
        match self.key.orientation {
            Orientation::Vertical => (Point::new(at, visible.y0), Point::new(at, visible.y1)),
            Orientation::Horizontal => (Point::new(visible.x0, at), Point::new(visible.x1, at)),
        }
    }
}

/// Changes produced by one recomputation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GuideDiff {
    pub added: Vec<AlignmentGuide>,
    pub removed: Vec<GuideKey>,
}

impl GuideDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Compute every guide implied by a set of anchor cells.
pub fn detect_guides<'a>(
    anchors: impl IntoIterator<Item = (&'a ShapeId, GridCoordinate)>,
) -> BTreeMap<GuideKey, AlignmentGuide> {
    let anchors: Vec<_> = anchors.into_iter().collect();
    let mut guides = BTreeMap::new();

    for (i, (a, cell_a)) in anchors.iter().enumerate() {
        for (b, cell_b) in &anchors[i + 1..] {
            if cell_a.col == cell_b.col {
                let key = GuideKey::new(a, b, Orientation::Vertical);
                guides.insert(key.clone(), AlignmentGuide { key, line: cell_a.col });
            }
            if cell_a.row == cell_b.row {
                let key = GuideKey::new(a, b, Orientation::Horizontal);
                guides.insert(key.clone(), AlignmentGuide { key, line: cell_a.row });
            }
        }
    }
    guides
}

/// Keeps the current guide set and reports what changed between recomputations.
#[derive(Debug, Clone, Default)]
pub struct AlignmentEngine {
    guides: BTreeMap<GuideKey, AlignmentGuide>,
}

impl AlignmentEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the guide set with the one implied by `anchors`.
    ///
    /// A guide whose line moved (same pair, new shared row/column) is reported
    /// as removed and added again.
    pub fn recompute<'a>(
        &mut self,
        anchors: impl IntoIterator<Item = (&'a ShapeId, GridCoordinate)>,
    ) -> GuideDiff {
        let next = detect_guides(anchors);
        let mut diff = GuideDiff::default();

        for (key, guide) in &self.guides {
            if next.get(key) != Some(guide) {
                diff.removed.push(key.clone());
            }
        }
        for (key, guide) in &next {
            if self.guides.get(key) != Some(guide) {
                diff.added.push(guide.clone());
            }
        }

        self.guides = next;
        diff
    }

    /// Drop every guide referencing a shape.
    pub fn forget(&mut self, id: &ShapeId) -> Vec<GuideKey> {
        let removed: Vec<GuideKey> = self
            .guides
            .keys()
            .filter(|key| key.pair.contains(id))
            .cloned()
            .collect();
        for key in &removed {
            self.guides.remove(key);
        }
        removed
    }

    /// Drop every guide.
    pub fn clear(&mut self) -> Vec<GuideKey> {
        std::mem::take(&mut self.guides).into_keys().collect()
    }

    pub fn guides(&self) -> impl Iterator<Item = &AlignmentGuide> {
        self.guides.values()
    }

    pub fn contains(&self, key: &GuideKey) -> bool {
        self.guides.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.guides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guides.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::ShapeKind;

    fn id(n: u32) -> ShapeId {
        ShapeId::new(ShapeKind::Rectangle, n)
    }

    #[test]
    fn test_pair_key_unordered() {
        assert_eq!(
            PairKey::new(&ShapeId::new(ShapeKind::Circle, 1), &id(1)),
            PairKey::new(&id(1), &ShapeId::new(ShapeKind::Circle, 1))
        );
    }

    #[test]
    fn test_three_shapes_guides() {
        let (a, b, c) = (id(1), id(2), id(3));
        let mut engine = AlignmentEngine::new();
        engine.recompute([
            (&a, GridCoordinate::new(0, 0)),
            (&b, GridCoordinate::new(0, 5)),
            (&c, GridCoordinate::new(3, 5)),
        ]);

        let keys: Vec<GuideKey> = engine.guides().map(|g| g.key.clone()).collect();
        assert_eq!(keys.len(), 2);
        assert!(engine.contains(&GuideKey::new(&a, &b, Orientation::Vertical)));
        assert!(engine.contains(&GuideKey::new(&b, &c, Orientation::Horizontal)));
        assert!(!keys.iter().any(|k| k.pair == PairKey::new(&a, &c)));
    }

    #[test]
    fn test_recompute_diff() {
        let (a, b) = (id(1), id(2));
        let mut engine = AlignmentEngine::new();

        let diff = engine.recompute([(&a, GridCoordinate::new(2, 0)), (&b, GridCoordinate::new(2, 9))]);
        assert_eq!(diff.added.len(), 1);
        assert!(diff.removed.is_empty());

        // Unchanged input yields an empty diff.
        let diff = engine.recompute([(&a, GridCoordinate::new(2, 0)), (&b, GridCoordinate::new(2, 9))]);
        assert!(diff.is_empty());

        let diff = engine.recompute([(&a, GridCoordinate::new(2, 0)), (&b, GridCoordinate::new(4, 9))]);
        assert_eq!(diff.removed, vec![GuideKey::new(&a, &b, Orientation::Vertical)]);
        assert!(engine.is_empty());
    }

    #[test]
    fn test_same_cell_emits_both() {
        let (a, b) = (id(1), id(2));
        let guides = detect_guides([(&a, GridCoordinate::new(1, 1)), (&b, GridCoordinate::new(1, 1))]);
        assert_eq!(guides.len(), 2);
    }

    #[test]
    fn test_forget() {
        let (a, b, c) = (id(1), id(2), id(3));
        let mut engine = AlignmentEngine::new();
        engine.recompute([
            (&a, GridCoordinate::new(0, 0)),
            (&b, GridCoordinate::new(0, 5)),
            (&c, GridCoordinate::new(3, 5)),
        ]);
        let removed = engine.forget(&b);
        assert_eq!(removed.len(), 2);
        assert!(engine.is_empty());
    }

    #[test]
    fn test_segment_spans_visible_rect() {
        let grid = Grid::new(20.0);
        let guide = AlignmentGuide {
            key: GuideKey::new(&id(1), &id(2), Orientation::Vertical),
            line: 4,
        };
        let (from, to) = guide.segment(&grid, Rect::new(0.0, -10.0, 800.0, 600.0));
        assert_eq!(from, Point::new(80.0, -10.0));
        assert_eq!(to, Point::new(80.0, 600.0));
    }
}
