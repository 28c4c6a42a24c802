//! Shape registry: the single owner of placed shapes.

use crate::error::{CanvasError, CanvasResult};
use crate::grid::Grid;
use crate::shapes::{Shape, ShapeId, ShapeKind};
use kurbo::Point;
use std::collections::{BTreeSet, HashMap};

/// Owns every placed shape, its z-order and the id suffixes in use.
#[derive(Debug, Clone)]
pub struct ShapeRegistry {
    grid: Grid,
    shapes: HashMap<ShapeId, Shape>,
    /// Z-order of shapes (back to front).
    z_order: Vec<ShapeId>,
    /// Numeric suffixes currently in use, per kind.
    suffixes: HashMap<ShapeKind, BTreeSet<u32>>,
}

impl ShapeRegistry {
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            shapes: HashMap::new(),
            z_order: Vec::new(),
            suffixes: HashMap::new(),
        }
    }

    /// Smallest positive suffix not in use for a kind.
    fn next_suffix(&self, kind: ShapeKind) -> u32 {
        let used = self.suffixes.get(&kind);
        (1..)
            .find(|n| used.is_none_or(|set| !set.contains(n)))
            .unwrap_or(u32::MAX)
    }

    /// Id the next `create` of this kind will allocate.
    pub fn peek_id(&self, kind: ShapeKind) -> ShapeId {
        ShapeId::new(kind, self.next_suffix(kind))
    }

    /// Place a new shape with its origin at `origin`.
    pub fn create(&mut self, kind: ShapeKind, origin: Point) -> &Shape {
        let n = self.next_suffix(kind);
        self.suffixes.entry(kind).or_default().insert(n);

        let id = ShapeId::new(kind, n);
        let shape = Shape::new(id.clone(), kind.instantiate(origin), &self.grid);
        log::debug!("Created {} at {:?} (anchor {})", id, origin, shape.anchor_cell());

        self.z_order.push(id.clone());
        self.shapes.entry(id).or_insert(shape)
    }

    /// Move a shape's origin, recomputing its anchor cell.
    pub fn move_to(&mut self, id: &ShapeId, origin: Point) -> CanvasResult<&Shape> {
        let shape = self
            .shapes
            .get_mut(id)
            .ok_or_else(|| CanvasError::UnknownShape(id.clone()))?;
        shape.relocate(origin, &self.grid);
        Ok(shape)
    }

    /// Remove a shape and free its id suffix for reuse.
    pub fn remove(&mut self, id: &ShapeId) -> CanvasResult<Shape> {
        let shape = self
            .shapes
            .remove(id)
            .ok_or_else(|| CanvasError::UnknownShape(id.clone()))?;
        self.z_order.retain(|z| z != id);

        if let Some(used) = self.suffixes.get_mut(&id.kind()) {
            used.remove(&id.number());
        }
        log::debug!("Removed {}", id);
        Ok(shape)
    }

    pub fn get(&self, id: &ShapeId) -> Option<&Shape> {
        self.shapes.get(id)
    }

    pub fn contains(&self, id: &ShapeId) -> bool {
        self.shapes.contains_key(id)
    }

    /// Shapes in z-order (back to front).
    pub fn iter(&self) -> impl Iterator<Item = &Shape> {
        self.z_order.iter().filter_map(|id| self.shapes.get(id))
    }

    /// Topmost shape containing a world point.
    pub fn shape_at(&self, point: Point) -> Option<&Shape> {
        self.z_order
            .iter()
            .rev()
            .filter_map(|id| self.shapes.get(id))
            .find(|shape| shape.hit_test(point))
    }

    /// Bring a shape to the front.
    pub fn raise(&mut self, id: &ShapeId) {
        if self.shapes.contains_key(id) {
            self.z_order.retain(|z| z != id);
            self.z_order.push(id.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}
