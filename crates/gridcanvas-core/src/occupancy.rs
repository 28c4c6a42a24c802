//! Occupancy index: which grid cells are claimed by which shape.
//!
//! Cell `(c, r)` stands for the square whose top-left corner is
//! `Grid::cell_to_world((c, r))`. A shape covers every square that intersects
//! the interior of its bounding box, so shapes that merely touch along an edge
//! never share a cell. Circles and rhombi are approximated by their bounding
//! square, which can report a collision between two shapes whose outlines do
//! not actually overlap.

use crate::grid::{Grid, GridCoordinate};
use crate::shapes::{Shape, ShapeId};
use kurbo::Rect;
use std::collections::{BTreeSet, HashMap};

/// Set of grid cells, ordered for stable iteration.
pub type CellSet = BTreeSet<GridCoordinate>;

/// Tolerance that keeps exact grid-aligned edges from spilling into the next cell.
const EDGE_EPSILON: f64 = 1e-9;

/// Cells covered by a world rectangle.
pub fn cells_for_rect(rect: Rect, grid: &Grid) -> CellSet {
    let cs = grid.cell_size();
    let col0 = ((rect.x0 / cs) + EDGE_EPSILON).floor() as i64;
    let row0 = ((rect.y0 / cs) + EDGE_EPSILON).floor() as i64;
    let col1 = ((rect.x1 / cs) - EDGE_EPSILON).ceil() as i64;
    let row1 = ((rect.y1 / cs) - EDGE_EPSILON).ceil() as i64;

    let mut cells = CellSet::new();
    for col in col0..col1 {
        for row in row0..row1 {
            cells.insert(GridCoordinate::new(col, row));
        }
    }
    cells
}

/// Cells covered by a shape's bounding geometry.
pub fn cells_for(shape: &Shape, grid: &Grid) -> CellSet {
    cells_for_rect(shape.bounds(), grid)
}

/// Maps claimed cells to their owning shape.
#[derive(Debug, Clone, Default)]
pub struct OccupancyIndex {
    cells: HashMap<GridCoordinate, ShapeId>,
}

impl OccupancyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check that none of the cells is claimed.
    pub fn are_free<'a>(&self, cells: impl IntoIterator<Item = &'a GridCoordinate>) -> bool {
        cells.into_iter().all(|cell| !self.cells.contains_key(cell))
    }

    /// Claim cells for a shape.
    ///
    /// Callers must check `are_free` first when collisions are enforced; the
    /// index does not re-validate and overwrites any previous owner.
    pub fn claim<'a>(&mut self, id: &ShapeId, cells: impl IntoIterator<Item = &'a GridCoordinate>) {
        for cell in cells {
            self.cells.insert(*cell, id.clone());
        }
    }

    /// Release cells regardless of owner.
    pub fn release<'a>(&mut self, cells: impl IntoIterator<Item = &'a GridCoordinate>) {
        for cell in cells {
            self.cells.remove(cell);
        }
    }

    /// Owner of a cell.
    pub fn owner(&self, cell: GridCoordinate) -> Option<&ShapeId> {
        self.cells.get(&cell)
    }

    /// All cells owned by a shape.
    pub fn cells_of(&self, id: &ShapeId) -> CellSet {
        self.cells
            .iter()
            .filter(|(_, owner)| *owner == id)
            .map(|(cell, _)| *cell)
            .collect()
    }

    /// Release every cell owned by a shape. Returns the released cells.
    pub fn forget(&mut self, id: &ShapeId) -> CellSet {
        let cells = self.cells_of(id);
        self.release(&cells);
        cells
    }

    /// Number of claimed cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::ShapeKind;
    use kurbo::Point;

    fn id(kind: ShapeKind, n: u32) -> ShapeId {
        ShapeId::new(kind, n)
    }

    #[test]
    fn test_cells_for_rect_exact_edges() {
        let grid = Grid::new(20.0);
        let cells = cells_for_rect(Rect::new(100.0, 100.0, 320.0, 260.0), &grid);
        // 11 columns x 8 rows.
        assert_eq!(cells.len(), 88);
        assert!(cells.contains(&GridCoordinate::new(5, 5)));
        assert!(cells.contains(&GridCoordinate::new(15, 12)));
        assert!(!cells.contains(&GridCoordinate::new(16, 5)));
        assert!(!cells.contains(&GridCoordinate::new(5, 13)));
    }

    #[test]
    fn test_cells_for_rect_unaligned() {
        let grid = Grid::new(20.0);
        // Rhombus-like bounds centered on (100, 100) with half size 50.
        let cells = cells_for_rect(Rect::from_center_size(Point::new(100.0, 100.0), (100.0, 100.0)), &grid);
        assert_eq!(cells.len(), 36);
    }

    #[test]
    fn test_abutting_rects_share_no_cells() {
        let grid = Grid::new(20.0);
        let a = cells_for_rect(Rect::new(0.0, 0.0, 220.0, 160.0), &grid);
        let b = cells_for_rect(Rect::new(220.0, 0.0, 440.0, 160.0), &grid);
        assert!(a.is_disjoint(&b));
    }

    #[test]
    fn test_claim_then_release() {
        let grid = Grid::new(20.0);
        let cells = cells_for_rect(Rect::new(0.0, 0.0, 40.0, 40.0), &grid);
        let mut index = OccupancyIndex::new();
        assert!(index.are_free(&cells));

        index.claim(&id(ShapeKind::Rectangle, 1), &cells);
        assert!(!index.are_free(&cells));
        assert_eq!(index.owner(GridCoordinate::new(1, 1)), Some(&id(ShapeKind::Rectangle, 1)));

        index.release(&cells);
        assert!(index.are_free(&cells));
        assert!(index.is_empty());
    }

    #[test]
    fn test_claim_idempotent() {
        let mut index = OccupancyIndex::new();
        let cells: CellSet = [GridCoordinate::new(0, 0)].into_iter().collect();
        index.claim(&id(ShapeKind::Circle, 1), &cells);
        index.claim(&id(ShapeKind::Circle, 1), &cells);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_forget() {
        let mut index = OccupancyIndex::new();
        let a: CellSet = [GridCoordinate::new(0, 0), GridCoordinate::new(1, 0)].into_iter().collect();
        let b: CellSet = [GridCoordinate::new(5, 5)].into_iter().collect();
        index.claim(&id(ShapeKind::Circle, 1), &a);
        index.claim(&id(ShapeKind::Circle, 2), &b);

        assert_eq!(index.forget(&id(ShapeKind::Circle, 1)), a);
        assert!(index.are_free(&a));
        assert!(!index.are_free(&b));
    }
}
