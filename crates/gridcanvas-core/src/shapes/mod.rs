//! Shape definitions for the diagram canvas.

mod circle;
mod rectangle;
mod rhombus;

pub use circle::Circle;
pub use rectangle::Rectangle;
pub use rhombus::Rhombus;

use crate::grid::{Grid, GridCoordinate};
use crate::surface::Geometry;
use kurbo::{Point, Rect};
use std::fmt;

/// The closed set of placeable shape kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Rhombus,
}

impl ShapeKind {
    /// All kinds, in toolbar order.
    pub const ALL: [ShapeKind; 3] = [ShapeKind::Rectangle, ShapeKind::Circle, ShapeKind::Rhombus];

    /// Lower-case name used as the id prefix.
    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Circle => "circle",
            ShapeKind::Rhombus => "rhombus",
        }
    }

    /// Label rendered inside a freshly placed shape.
    pub fn label(self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "Task",
            ShapeKind::Circle => "Start",
            ShapeKind::Rhombus => "?",
        }
    }

    /// Label font size.
    pub fn label_size(self) -> f64 {
        match self {
            ShapeKind::Rhombus => 60.0,
            ShapeKind::Rectangle | ShapeKind::Circle => 16.0,
        }
    }

    /// Build the intrinsic geometry of this kind at a world origin.
    pub fn instantiate(self, origin: Point) -> ShapeGeometry {
        match self {
            ShapeKind::Rectangle => ShapeGeometry::Rectangle(Rectangle::new(origin)),
            ShapeKind::Circle => ShapeGeometry::Circle(Circle::new(origin)),
            ShapeKind::Rhombus => ShapeGeometry::Rhombus(Rhombus::new(origin)),
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unique identifier for placed shapes, displayed as `"{kind}-{n}"`.
///
/// Only the registry allocates ids, so every id names a kind and a positive suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId {
    kind: ShapeKind,
    n: u32,
}

impl ShapeId {
    pub(crate) fn new(kind: ShapeKind, n: u32) -> Self {
        Self { kind, n }
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    /// Numeric suffix, unique among live shapes of the same kind.
    pub fn number(&self) -> u32 {
        self.n
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.kind.name(), self.n)
    }
}

/// Geometry shared by every shape kind.
pub trait Outline {
    /// World-space reference point (top-left or center, depending on kind).
    fn origin(&self) -> Point;

    /// Move the reference point.
    fn set_origin(&mut self, origin: Point);

    /// Bounding box in world coordinates.
    fn bounds(&self) -> Rect;

    /// Geometric center.
    fn center(&self) -> Point {
        self.bounds().center()
    }

    /// Check if a world point lies inside the shape.
    fn hit_test(&self, point: Point) -> bool;

    /// Connection ports: top, right, bottom, left.
    fn ports(&self) -> [Point; 4] {
        let b = self.bounds();
        let c = b.center();
        [
            Point::new(c.x, b.y0),
            Point::new(b.x1, c.y),
            Point::new(c.x, b.y1),
            Point::new(b.x0, c.y),
        ]
    }

    /// Drawing primitive for the shape body.
    fn primitive(&self) -> Geometry;
}

/// Kind-specific geometry of a shape.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeGeometry {
    Rectangle(Rectangle),
    Circle(Circle),
    Rhombus(Rhombus),
}

impl ShapeGeometry {
    pub fn kind(&self) -> ShapeKind {
        match self {
            ShapeGeometry::Rectangle(_) => ShapeKind::Rectangle,
            ShapeGeometry::Circle(_) => ShapeKind::Circle,
            ShapeGeometry::Rhombus(_) => ShapeKind::Rhombus,
        }
    }

    fn outline(&self) -> &dyn Outline {
        match self {
            ShapeGeometry::Rectangle(r) => r,
            ShapeGeometry::Circle(c) => c,
            ShapeGeometry::Rhombus(r) => r,
        }
    }

    fn outline_mut(&mut self) -> &mut dyn Outline {
        match self {
            ShapeGeometry::Rectangle(r) => r,
            ShapeGeometry::Circle(c) => c,
            ShapeGeometry::Rhombus(r) => r,
        }
    }
}

impl Outline for ShapeGeometry {
    fn origin(&self) -> Point {
        self.outline().origin()
    }

    fn set_origin(&mut self, origin: Point) {
        self.outline_mut().set_origin(origin);
    }

    fn bounds(&self) -> Rect {
        self.outline().bounds()
    }

    fn center(&self) -> Point {
        self.outline().center()
    }

    fn hit_test(&self, point: Point) -> bool {
        self.outline().hit_test(point)
    }

    fn ports(&self) -> [Point; 4] {
        self.outline().ports()
    }

    fn primitive(&self) -> Geometry {
        self.outline().primitive()
    }
}

/// A placed shape. Owned by the `ShapeRegistry`; all mutation goes through it.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    id: ShapeId,
    geometry: ShapeGeometry,
    anchor_cell: GridCoordinate,
}

impl Shape {
    pub(crate) fn new(id: ShapeId, geometry: ShapeGeometry, grid: &Grid) -> Self {
        let anchor_cell = grid.world_to_cell(geometry.center());
        Self {
            id,
            geometry,
            anchor_cell,
        }
    }

    pub fn id(&self) -> &ShapeId {
        &self.id
    }

    pub fn kind(&self) -> ShapeKind {
        self.geometry.kind()
    }

    pub fn geometry(&self) -> &ShapeGeometry {
        &self.geometry
    }

    pub fn origin(&self) -> Point {
        self.geometry.origin()
    }

    pub fn bounds(&self) -> Rect {
        self.geometry.bounds()
    }

    pub fn center(&self) -> Point {
        self.geometry.center()
    }

    /// Grid cell of the geometric center.
    pub fn anchor_cell(&self) -> GridCoordinate {
        self.anchor_cell
    }

    pub fn hit_test(&self, point: Point) -> bool {
        self.geometry.hit_test(point)
    }

    /// Move the shape and recompute its anchor cell.
    pub(crate) fn relocate(&mut self, origin: Point, grid: &Grid) {
        self.geometry.set_origin(origin);
        self.anchor_cell = grid.world_to_cell(self.geometry.center());
    }
}
