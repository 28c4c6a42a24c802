//! Rectangle shape.

use super::Outline;
use crate::surface::Geometry;
use kurbo::{Point, Rect};

/// A fixed-size rounded rectangle anchored at its top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct Rectangle {
    /// Top-left corner position.
    pub position: Point,
}

impl Rectangle {
    pub const WIDTH: f64 = 220.0;
    pub const HEIGHT: f64 = 160.0;
    pub const CORNER_RADIUS: f64 = 10.0;

    /// Create a new rectangle with its top-left corner at `position`.
    pub fn new(position: Point) -> Self {
        Self { position }
    }

    /// Get the rectangle as a kurbo Rect.
    pub fn as_rect(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + Self::WIDTH,
            self.position.y + Self::HEIGHT,
        )
    }
}

impl Outline for Rectangle {
    fn origin(&self) -> Point {
        self.position
    }

    fn set_origin(&mut self, origin: Point) {
        self.position = origin;
    }

    fn bounds(&self) -> Rect {
        self.as_rect()
    }

    fn hit_test(&self, point: Point) -> bool {
        self.as_rect().contains(point)
    }

    fn primitive(&self) -> Geometry {
        Geometry::Rect {
            rect: self.as_rect(),
            corner_radius: Self::CORNER_RADIUS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        let rect = Rectangle::new(Point::new(10.0, 20.0));
        let bounds = rect.bounds();
        assert!((bounds.x0 - 10.0).abs() < f64::EPSILON);
        assert!((bounds.y0 - 20.0).abs() < f64::EPSILON);
        assert!((bounds.x1 - 230.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 180.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hit_test() {
        let rect = Rectangle::new(Point::ZERO);
        assert!(rect.hit_test(Point::new(50.0, 50.0)));
        assert!(!rect.hit_test(Point::new(250.0, 50.0)));
    }

    #[test]
    fn test_ports() {
        let rect = Rectangle::new(Point::ZERO);
        let [top, right, bottom, left] = rect.ports();
        assert_eq!(top, Point::new(110.0, 0.0));
        assert_eq!(right, Point::new(220.0, 80.0));
        assert_eq!(bottom, Point::new(110.0, 160.0));
        assert_eq!(left, Point::new(0.0, 80.0));
    }
}
