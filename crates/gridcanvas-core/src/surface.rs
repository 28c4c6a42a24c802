//! Rendering surface abstraction.
//!
//! The engine never draws anything itself. It issues retained-mode commands
//! against a [`RenderSurface`] and keeps only the opaque handles it gets back.
//! [`Scene`] is an in-memory implementation for headless hosts and tests.

use kurbo::{Affine, Point, Rect};
use peniko::Color;
use std::collections::HashMap;

/// Opaque handle to a drawn primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrimitiveHandle(u64);

impl PrimitiveHandle {
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Kind of a drawing primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Rect,
    Circle,
    Polygon,
    Polyline,
    Line,
    Text,
    DotGrid,
}

/// World-space geometry of a primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Rectangle with optional rounded corners.
    Rect { rect: Rect, corner_radius: f64 },
    Circle { center: Point, radius: f64 },
    /// Closed polygon.
    Polygon { points: Vec<Point> },
    /// Open polyline.
    Polyline { points: Vec<Point> },
    Line { from: Point, to: Point },
    /// Text centered horizontally and vertically on `position`.
    Text {
        position: Point,
        content: String,
        font_size: f64,
    },
    /// Dots at every grid intersection inside `bounds`.
    DotGrid {
        bounds: Rect,
        spacing: f64,
        dot_radius: f64,
    },
}

/// Average glyph advance relative to the font size, for text extents.
const GLYPH_ADVANCE: f64 = 0.6;

impl Geometry {
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Geometry::Rect { .. } => PrimitiveKind::Rect,
            Geometry::Circle { .. } => PrimitiveKind::Circle,
            Geometry::Polygon { .. } => PrimitiveKind::Polygon,
            Geometry::Polyline { .. } => PrimitiveKind::Polyline,
            Geometry::Line { .. } => PrimitiveKind::Line,
            Geometry::Text { .. } => PrimitiveKind::Text,
            Geometry::DotGrid { .. } => PrimitiveKind::DotGrid,
        }
    }

    /// Bounding box in world coordinates. Text extents are estimated.
    pub fn bounds(&self) -> Rect {
        match self {
            Geometry::Rect { rect, .. } => *rect,
            Geometry::Circle { center, radius } => {
                Rect::from_center_size(*center, (radius * 2.0, radius * 2.0))
            }
            Geometry::Polygon { points } | Geometry::Polyline { points } => points_bounds(points),
            Geometry::Line { from, to } => Rect::from_points(*from, *to),
            Geometry::Text {
                position,
                content,
                font_size,
            } => {
                let width = content.chars().count() as f64 * font_size * GLYPH_ADVANCE;
                Rect::from_center_size(*position, (width, *font_size))
            }
            Geometry::DotGrid {
                bounds, dot_radius, ..
            } => bounds.inflate(*dot_radius, *dot_radius),
        }
    }
}

fn points_bounds(points: &[Point]) -> Rect {
    let mut iter = points.iter();
    let Some(first) = iter.next() else {
        return Rect::ZERO;
    };
    iter.fold(Rect::from_points(*first, *first), |acc, p| {
        acc.union_pt(*p)
    })
}

/// Paint properties of a primitive.
#[derive(Debug, Clone)]
pub struct PrimitiveStyle {
    /// Fill color (None = no fill).
    pub fill: Option<Color>,
    /// Stroke color (None = no stroke).
    pub stroke: Option<Color>,
    pub stroke_width: f64,
    /// Dash length for dashed strokes.
    pub dash: Option<f64>,
    /// Whether the primitive receives pointer events.
    pub interactive: bool,
}

impl Default for PrimitiveStyle {
    fn default() -> Self {
        Self {
            fill: None,
            stroke: Some(Color::from_rgba8(0, 0, 0, 255)),
            stroke_width: 2.0,
            dash: None,
            interactive: true,
        }
    }
}

/// Retained-mode drawing backend consumed by the engine.
///
/// Bounding-box queries must reflect the last geometry applied to a handle.
pub trait RenderSurface {
    /// Draw a new primitive on top of everything else.
    fn draw_primitive(&mut self, geometry: Geometry, style: PrimitiveStyle) -> PrimitiveHandle;

    /// Replace the geometry of an existing primitive.
    fn update_primitive(&mut self, handle: PrimitiveHandle, geometry: Geometry);

    /// Remove a primitive. Unknown handles are ignored.
    fn remove_primitive(&mut self, handle: PrimitiveHandle);

    /// World-space bounding box of a primitive.
    fn bounding_box(&self, handle: PrimitiveHandle) -> Option<Rect>;

    /// Bring a primitive to the front.
    fn raise(&mut self, handle: PrimitiveHandle);

    /// Set the world-to-screen transform applied to every primitive.
    fn set_view_transform(&mut self, transform: Affine);
}

/// A primitive stored in a [`Scene`].
#[derive(Debug, Clone)]
pub struct ScenePrimitive {
    pub geometry: Geometry,
    pub style: PrimitiveStyle,
}

/// In-memory retained scene.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    primitives: HashMap<PrimitiveHandle, ScenePrimitive>,
    /// Draw order (back to front).
    z_order: Vec<PrimitiveHandle>,
    next_handle: u64,
    view_transform: Affine,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, handle: PrimitiveHandle) -> Option<&ScenePrimitive> {
        self.primitives.get(&handle)
    }

    /// Primitives in draw order (back to front).
    pub fn primitives(&self) -> impl Iterator<Item = (PrimitiveHandle, &ScenePrimitive)> {
        self.z_order
            .iter()
            .filter_map(|h| self.primitives.get(h).map(|p| (*h, p)))
    }

    /// Number of primitives of the given kind.
    pub fn count(&self, kind: PrimitiveKind) -> usize {
        self.primitives
            .values()
            .filter(|p| p.geometry.kind() == kind)
            .count()
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn view_transform(&self) -> Affine {
        self.view_transform
    }

    /// Position of a handle in the draw order.
    pub fn z_index(&self, handle: PrimitiveHandle) -> Option<usize> {
        self.z_order.iter().position(|h| *h == handle)
    }
}

impl RenderSurface for Scene {
    fn draw_primitive(&mut self, geometry: Geometry, style: PrimitiveStyle) -> PrimitiveHandle {
        self.next_handle += 1;
        let handle = PrimitiveHandle(self.next_handle);
        self.primitives
            .insert(handle, ScenePrimitive { geometry, style });
        self.z_order.push(handle);
        handle
    }

    fn update_primitive(&mut self, handle: PrimitiveHandle, geometry: Geometry) {
        if let Some(primitive) = self.primitives.get_mut(&handle) {
            primitive.geometry = geometry;
        }
    }

    fn remove_primitive(&mut self, handle: PrimitiveHandle) {
        if self.primitives.remove(&handle).is_some() {
            self.z_order.retain(|h| *h != handle);
        }
    }

    fn bounding_box(&self, handle: PrimitiveHandle) -> Option<Rect> {
        self.primitives.get(&handle).map(|p| p.geometry.bounds())
    }

    fn raise(&mut self, handle: PrimitiveHandle) {
        if self.primitives.contains_key(&handle) {
            self.z_order.retain(|h| *h != handle);
            self.z_order.push(handle);
        }
    }

    fn set_view_transform(&mut self, transform: Affine) {
        self.view_transform = transform;
    }
}
