//! Grid model: mapping between world coordinates and grid cells.

use kurbo::Point;
use std::fmt;

/// Default grid cell size in world units (matches the visual dot grid).
pub const GRID_SIZE: f64 = 20.0;

/// Integer grid cell coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridCoordinate {
    pub col: i64,
    pub row: i64,
}

impl GridCoordinate {
    pub const fn new(col: i64, row: i64) -> Self {
        Self { col, row }
    }
}

impl fmt::Display for GridCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

/// A uniform square grid with a fixed cell size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    cell_size: f64,
}

impl Grid {
    /// Create a grid. `cell_size` must be positive; `CanvasConfig::validate` checks this.
    pub fn new(cell_size: f64) -> Self {
        debug_assert!(cell_size > 0.0);
        Self { cell_size }
    }

    /// Cell size in world units.
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Cell nearest to a world point. Halfway values round toward positive infinity.
    pub fn world_to_cell(&self, point: Point) -> GridCoordinate {
        GridCoordinate::new(
            (point.x / self.cell_size + 0.5).floor() as i64,
            (point.y / self.cell_size + 0.5).floor() as i64,
        )
    }

    /// World position of a cell. Exact inverse of `world_to_cell` on snapped points.
    pub fn cell_to_world(&self, cell: GridCoordinate) -> Point {
        Point::new(
            cell.col as f64 * self.cell_size,
            cell.row as f64 * self.cell_size,
        )
    }

    /// Snap a world point to the nearest grid intersection.
    pub fn snap(&self, point: Point) -> Point {
        self.cell_to_world(self.world_to_cell(point))
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(GRID_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_to_grid() {
        let grid = Grid::new(20.0);
        assert_eq!(grid.snap(Point::new(23.0, 47.0)), Point::new(20.0, 40.0));
    }

    #[test]
    fn test_snap_exact() {
        let grid = Grid::new(20.0);
        assert_eq!(grid.snap(Point::new(40.0, 60.0)), Point::new(40.0, 60.0));
    }

    #[test]
    fn test_snap_round_up() {
        let grid = Grid::new(20.0);
        assert_eq!(grid.snap(Point::new(31.0, 51.0)), Point::new(40.0, 60.0));
        assert_eq!(grid.snap(Point::new(105.0, 97.0)), Point::new(100.0, 100.0));
    }

    #[test]
    fn test_world_to_cell_negative() {
        let grid = Grid::new(20.0);
        assert_eq!(
            grid.world_to_cell(Point::new(-41.0, -9.0)),
            GridCoordinate::new(-2, 0)
        );
    }

    #[test]
    fn test_halfway_rounds_up() {
        let grid = Grid::new(20.0);
        assert_eq!(grid.world_to_cell(Point::new(-10.0, 10.0)), GridCoordinate::new(0, 1));
        assert_eq!(grid.snap(Point::new(-10.0, -30.0)), Point::new(0.0, -20.0));
        assert_eq!(grid.snap(Point::new(-10.1, 30.0)), Point::new(-20.0, 40.0));
    }

    #[test]
    fn test_cell_to_world_inverse() {
        let grid = Grid::new(20.0);
        let cell = GridCoordinate::new(7, -3);
        assert_eq!(grid.world_to_cell(grid.cell_to_world(cell)), cell);
    }

    #[test]
    fn test_snap_idempotent() {
        let grid = Grid::new(20.0);
        let samples = [
            Point::new(0.0, 0.0),
            Point::new(9.99, 10.0),
            Point::new(-10.0, 30.0),
            Point::new(123.456, -987.654),
            Point::new(1e6 + 0.5, 3.3),
        ];
        for p in samples {
            let once = grid.snap(p);
            assert_eq!(grid.snap(once), once, "snap not idempotent for {p:?}");
        }
    }
}
