//! Canvas model: the shapes, their cells, the view and the derived guides.

use crate::alignment::{AlignmentEngine, GuideDiff, GuideKey};
use crate::config::CanvasConfig;
use crate::connection::{self, Connection, ConnectionId, ConnectionSet};
use crate::error::{CanvasError, CanvasResult};
use crate::grid::Grid;
use crate::occupancy::{self, CellSet, OccupancyIndex};
use crate::registry::ShapeRegistry;
use crate::shapes::{Outline, Shape, ShapeId, ShapeKind};
use crate::viewport::Viewport;
use kurbo::Point;
use uuid::Uuid;

/// Result of finalizing a drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveOutcome {
    /// The shape now owns the cells under its new position.
    Committed,
    /// The target cells were taken; the shape went back to `origin`.
    RolledBack { origin: Point },
}

/// Everything a deletion took down with the shape.
#[derive(Debug, Clone)]
pub struct Removal {
    pub shape: Shape,
    pub cells: CellSet,
    pub guides: Vec<GuideKey>,
    pub connections: Vec<Connection>,
}

/// Runtime canvas state for one editor session (not persisted).
#[derive(Debug, Clone)]
pub struct Canvas {
    /// Session identifier, for log correlation.
    id: Uuid,
    config: CanvasConfig,
    grid: Grid,
    registry: ShapeRegistry,
    occupancy: OccupancyIndex,
    viewport: Viewport,
    alignment: AlignmentEngine,
    connections: ConnectionSet,
}

impl Canvas {
    /// Create an empty canvas. Fails if the configuration is invalid.
    pub fn new(config: CanvasConfig) -> CanvasResult<Self> {
        config.validate()?;
        let grid = Grid::new(config.grid_size);
        let canvas = Self {
            id: Uuid::new_v4(),
            grid,
            registry: ShapeRegistry::new(grid),
            occupancy: OccupancyIndex::new(),
            viewport: Viewport::new(&config),
            alignment: AlignmentEngine::new(),
            connections: ConnectionSet::new(),
            config,
        };
        log::info!(
            "Canvas {} created (grid {}, world {:?}, occupancy {:?})",
            canvas.id,
            canvas.grid.cell_size(),
            canvas.config.world_bounds(),
            canvas.config.occupancy
        );
        Ok(canvas)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn shapes(&self) -> &ShapeRegistry {
        &self.registry
    }

    pub fn occupancy(&self) -> &OccupancyIndex {
        &self.occupancy
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn alignment(&self) -> &AlignmentEngine {
        &self.alignment
    }

    pub fn connections(&self) -> &ConnectionSet {
        &self.connections
    }

    pub fn shape(&self, id: &ShapeId) -> Option<&Shape> {
        self.registry.get(id)
    }

    /// Topmost shape under a screen point.
    pub fn shape_at_screen(&self, screen: Point) -> Option<&Shape> {
        self.registry.shape_at(self.viewport.screen_to_world(screen))
    }

    /// Origin a placement at this world point would use.
    pub fn placement_origin(&self, world: Point) -> Point {
        self.grid.snap(world)
    }

    fn enforces_collisions(&self) -> bool {
        self.config.occupancy.is_enforced()
    }

    /// Place a shape of `kind` at the snapped world point.
    ///
    /// Returns `None` when collisions are enforced and the cells are taken.
    pub fn place(&mut self, kind: ShapeKind, world: Point) -> Option<ShapeId> {
        let origin = self.placement_origin(world);
        let cells = occupancy::cells_for_rect(kind.instantiate(origin).bounds(), &self.grid);
        if self.enforces_collisions() && !self.occupancy.are_free(&cells) {
            log::debug!("Placement of {} at {:?} rejected: cells occupied", kind, origin);
            return None;
        }

        let id = self.registry.create(kind, origin).id().clone();
        self.occupancy.claim(&id, &cells);
        Some(id)
    }

    /// Remove a shape together with its cells, guides and connections.
    pub fn remove(&mut self, id: &ShapeId) -> CanvasResult<Removal> {
        let shape = self.registry.remove(id)?;
        let cells = self.occupancy.forget(id);
        let guides = self.alignment.forget(id);
        let connections = self.connections.forget(id);
        Ok(Removal {
            shape,
            cells,
            guides,
            connections,
        })
    }

    /// Move a shape without touching occupancy (drag preview).
    pub fn drag_to(&mut self, id: &ShapeId, origin: Point) -> CanvasResult<&Shape> {
        self.registry.move_to(id, origin)
    }

    /// Bring a shape to the front.
    pub fn raise(&mut self, id: &ShapeId) {
        self.registry.raise(id);
    }

    /// Finalize a drag: trade the old cells for the new ones, or roll back.
    pub fn commit_move(&mut self, id: &ShapeId, pre_drag_origin: Point) -> CanvasResult<MoveOutcome> {
        let shape = self
            .registry
            .get(id)
            .ok_or_else(|| CanvasError::UnknownShape(id.clone()))?;
        let target = occupancy::cells_for(shape, &self.grid);

        let previous = self.occupancy.forget(id);
        if self.enforces_collisions() && !self.occupancy.are_free(&target) {
            self.occupancy.claim(id, &previous);
            self.registry.move_to(id, pre_drag_origin)?;
            log::debug!("Move of {} rejected: cells occupied, restored {:?}", id, pre_drag_origin);
            return Ok(MoveOutcome::RolledBack {
                origin: pre_drag_origin,
            });
        }

        self.occupancy.claim(id, &target);
        Ok(MoveOutcome::Committed)
    }

    /// Recompute alignment guides from the current anchor cells.
    pub fn refresh_guides(&mut self) -> GuideDiff {
        let anchors = self.registry.iter().map(|s| (s.id(), s.anchor_cell()));
        self.alignment.recompute(anchors)
    }

    /// Drop all guides.
    pub fn clear_guides(&mut self) -> Vec<GuideKey> {
        self.alignment.clear()
    }

    /// Connect two placed shapes. Returns `None` if either is missing or they are the same.
    pub fn connect(&mut self, from: &ShapeId, to: &ShapeId) -> Option<ConnectionId> {
        if from == to {
            return None;
        }
        let path = connection::route(self.registry.get(from)?, self.registry.get(to)?, &self.grid);
        let id = self.connections.add(from.clone(), to.clone(), path).id;
        log::debug!("Connected {} -> {}", from, to);
        Some(id)
    }

    /// Re-route every connection touching a shape. Returns the new paths.
    pub fn reroute(&mut self, id: &ShapeId) -> Vec<(ConnectionId, [Point; 3])> {
        let mut updated = Vec::new();
        for c in self.connections.touching(id) {
            if let (Some(from), Some(to)) = (self.registry.get(&c.from), self.registry.get(&c.to)) {
                updated.push((c.id, connection::route(from, to, &self.grid)));
            }
        }
        for (cid, path) in &updated {
            self.connections.set_path(*cid, *path);
        }
        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OccupancyPolicy;
    use crate::grid::GridCoordinate;

    fn canvas() -> Canvas {
        Canvas::new(CanvasConfig::default()).unwrap()
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = CanvasConfig {
            grid_size: -1.0,
            ..CanvasConfig::default()
        };
        assert!(Canvas::new(config).is_err());
    }

    #[test]
    fn test_place_snaps_and_claims() {
        let mut c = canvas();
        let id = c.place(ShapeKind::Rectangle, Point::new(105.0, 97.0)).unwrap();
        assert_eq!(id.to_string(), "rectangle-1");
        assert_eq!(c.shape(&id).unwrap().origin(), Point::new(100.0, 100.0));
        assert_eq!(c.occupancy().len(), 88);
        assert_eq!(c.occupancy().owner(GridCoordinate::new(5, 5)), Some(&id));
    }

    #[test]
    fn test_place_on_occupied_cells_rejected() {
        let mut c = canvas();
        c.place(ShapeKind::Rectangle, Point::new(100.0, 100.0)).unwrap();
        assert!(c.place(ShapeKind::Circle, Point::new(200.0, 200.0)).is_none());
        assert_eq!(c.shapes().len(), 1);
    }

    #[test]
    fn test_advisory_allows_overlap() {
        let mut c = Canvas::new(CanvasConfig {
            occupancy: OccupancyPolicy::Advisory,
            ..CanvasConfig::default()
        })
        .unwrap();
        c.place(ShapeKind::Rectangle, Point::new(100.0, 100.0)).unwrap();
        assert!(c.place(ShapeKind::Circle, Point::new(200.0, 200.0)).is_some());
    }

    #[test]
    fn test_commit_move_rolls_back_on_collision() {
        let mut c = canvas();
        let a = c.place(ShapeKind::Circle, Point::new(100.0, 100.0)).unwrap();
        let b = c.place(ShapeKind::Circle, Point::new(400.0, 100.0)).unwrap();
        let before = c.occupancy().cells_of(&a);

        c.drag_to(&a, Point::new(400.0, 120.0)).unwrap();
        let outcome = c.commit_move(&a, Point::new(100.0, 100.0)).unwrap();
        assert_eq!(
            outcome,
            MoveOutcome::RolledBack {
                origin: Point::new(100.0, 100.0)
            }
        );
        assert_eq!(c.shape(&a).unwrap().origin(), Point::new(100.0, 100.0));
        assert_eq!(c.occupancy().cells_of(&a), before);
        assert!(!c.occupancy().cells_of(&b).is_empty());
    }

    #[test]
    fn test_commit_move_onto_own_cells() {
        let mut c = canvas();
        let a = c.place(ShapeKind::Rectangle, Point::new(100.0, 100.0)).unwrap();
        // Overlaps its own previous footprint only.
        c.drag_to(&a, Point::new(140.0, 100.0)).unwrap();
        assert_eq!(c.commit_move(&a, Point::new(100.0, 100.0)).unwrap(), MoveOutcome::Committed);
        assert_eq!(c.occupancy().owner(GridCoordinate::new(5, 5)), None);
        assert_eq!(c.occupancy().owner(GridCoordinate::new(17, 5)), Some(&a));
    }

    #[test]
    fn test_remove_releases_everything() {
        let mut c = canvas();
        let a = c.place(ShapeKind::Circle, Point::new(100.0, 100.0)).unwrap();
        let b = c.place(ShapeKind::Circle, Point::new(100.0, 400.0)).unwrap();
        c.connect(&a, &b).unwrap();
        assert_eq!(c.refresh_guides().added.len(), 1);

        let removal = c.remove(&a).unwrap();
        assert_eq!(removal.cells.len(), 16);
        assert_eq!(removal.guides.len(), 1);
        assert_eq!(removal.connections.len(), 1);
        assert!(c.occupancy().are_free(&removal.cells));
        assert!(c.alignment().is_empty());
        assert!(c.connections().is_empty());
        assert!(matches!(c.remove(&a), Err(CanvasError::UnknownShape(_))));
    }

    #[test]
    fn test_connect_self_rejected() {
        let mut c = canvas();
        let a = c.place(ShapeKind::Circle, Point::new(100.0, 100.0)).unwrap();
        assert!(c.connect(&a, &a).is_none());
        assert!(c.connect(&a, &ShapeId::new(ShapeKind::Circle, 9)).is_none());
    }

    #[test]
    fn test_reroute_after_move() {
        let mut c = canvas();
        let a = c.place(ShapeKind::Circle, Point::new(100.0, 100.0)).unwrap();
        let b = c.place(ShapeKind::Circle, Point::new(400.0, 100.0)).unwrap();
        let cid = c.connect(&a, &b).unwrap();
        assert_eq!(
            c.connections().get(cid).unwrap().path,
            [Point::new(140.0, 100.0), Point::new(140.0, 100.0), Point::new(360.0, 100.0)]
        );

        c.drag_to(&b, Point::new(400.0, 300.0)).unwrap();
        let updated = c.reroute(&b);
        assert_eq!(updated.len(), 1);
        let path = c.connections().get(cid).unwrap().path;
        assert_eq!(path[1], Point::new(path[0].x, path[2].y));
    }
}
