//! Rhombus (decision diamond) shape.

use super::Outline;
use crate::surface::Geometry;
use kurbo::{Point, Rect};

/// An axis-aligned diamond anchored at its center.
#[derive(Debug, Clone, PartialEq)]
pub struct Rhombus {
    /// Center point.
    pub center: Point,
}

impl Rhombus {
    /// Length of each diagonal.
    pub const SIZE: f64 = 100.0;

    pub fn new(center: Point) -> Self {
        Self { center }
    }

    /// Vertices: top, right, bottom, left.
    pub fn vertices(&self) -> [Point; 4] {
        let h = Self::SIZE / 2.0;
        let c = self.center;
        [
            Point::new(c.x, c.y - h),
            Point::new(c.x + h, c.y),
            Point::new(c.x, c.y + h),
            Point::new(c.x - h, c.y),
        ]
    }
}

impl Outline for Rhombus {
    fn origin(&self) -> Point {
        self.center
    }

    fn set_origin(&mut self, origin: Point) {
        self.center = origin;
    }

    fn bounds(&self) -> Rect {
        Rect::from_center_size(self.center, (Self::SIZE, Self::SIZE))
    }

    fn center(&self) -> Point {
        self.center
    }

    fn hit_test(&self, point: Point) -> bool {
        let d = point - self.center;
        d.x.abs() + d.y.abs() <= Self::SIZE / 2.0
    }

    fn ports(&self) -> [Point; 4] {
        self.vertices()
    }

    fn primitive(&self) -> Geometry {
        Geometry::Polygon {
            points: self.vertices().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertices() {
        let rhombus = Rhombus::new(Point::new(100.0, 100.0));
        let [top, right, bottom, left] = rhombus.vertices();
        assert_eq!(top, Point::new(100.0, 50.0));
        assert_eq!(right, Point::new(150.0, 100.0));
        assert_eq!(bottom, Point::new(100.0, 150.0));
        assert_eq!(left, Point::new(50.0, 100.0));
    }

    #[test]
    fn test_hit_test_diamond() {
        let rhombus = Rhombus::new(Point::ZERO);
        assert!(rhombus.hit_test(Point::new(20.0, 20.0)));
        assert!(!rhombus.hit_test(Point::new(40.0, 40.0)));
    }
}
