//! Circle shape.

use super::Outline;
use crate::surface::Geometry;
use kurbo::{Point, Rect};

/// A fixed-radius circle anchored at its center.
#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    /// Center point.
    pub center: Point,
}

impl Circle {
    pub const RADIUS: f64 = 40.0;

    pub fn new(center: Point) -> Self {
        Self { center }
    }
}

impl Outline for Circle {
    fn origin(&self) -> Point {
        self.center
    }

    fn set_origin(&mut self, origin: Point) {
        self.center = origin;
    }

    fn bounds(&self) -> Rect {
        Rect::from_center_size(self.center, (Self::RADIUS * 2.0, Self::RADIUS * 2.0))
    }

    fn center(&self) -> Point {
        self.center
    }

    fn hit_test(&self, point: Point) -> bool {
        (point - self.center).hypot2() <= Self::RADIUS * Self::RADIUS
    }

    fn primitive(&self) -> Geometry {
        Geometry::Circle {
            center: self.center,
            radius: Self::RADIUS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_square() {
        let circle = Circle::new(Point::new(100.0, 100.0));
        let bounds = circle.bounds();
        assert!((bounds.x0 - 60.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 140.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hit_test_excludes_corners() {
        let circle = Circle::new(Point::ZERO);
        assert!(circle.hit_test(Point::new(0.0, 39.0)));
        // Inside the bounding square but outside the circle.
        assert!(!circle.hit_test(Point::new(35.0, 35.0)));
    }
}
