//! Viewport module for pan/zoom transforms.

use crate::config::CanvasConfig;
use kurbo::{Affine, Point, Rect, Size, Vec2};

/// Viewport manages the view transform for the canvas.
///
/// It converts between screen coordinates and world coordinates and keeps the
/// visible world rectangle inside the configured world bounds.
#[derive(Debug, Clone)]
pub struct Viewport {
    /// Current translation offset (pan), in screen pixels.
    offset: Vec2,
    /// Current zoom scale.
    zoom: f64,
    /// Minimum allowed zoom level.
    min_zoom: f64,
    /// Maximum allowed zoom level.
    max_zoom: f64,
    /// Screen size in pixels.
    screen: Size,
    /// World rectangle the view may show.
    world: Rect,
}

impl Viewport {
    /// Create a viewport at zoom 1 showing the world origin.
    pub fn new(config: &CanvasConfig) -> Self {
        let mut viewport = Self {
            offset: Vec2::ZERO,
            zoom: 1.0_f64.clamp(config.min_zoom, config.max_zoom),
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
            screen: config.screen_size(),
            world: config.world_bounds(),
        };
        viewport.clamp_offset();
        viewport
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn screen_size(&self) -> Size {
        self.screen
    }

    /// Screen-space center, the pivot for toolbar zoom.
    pub fn screen_center(&self) -> Point {
        Point::new(self.screen.width / 2.0, self.screen.height / 2.0)
    }

    /// Get the affine transform for rendering.
    ///
    /// This transform converts world coordinates to screen coordinates.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    /// Get the inverse transform for input handling.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.offset)
    }

    /// Convert a screen point to world coordinates.
    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    /// Convert a world point to screen coordinates.
    pub fn world_to_screen(&self, world_point: Point) -> Point {
        self.transform() * world_point
    }

    /// World rectangle currently on screen.
    pub fn visible_world_rect(&self) -> Rect {
        let top_left = self.screen_to_world(Point::ZERO);
        let bottom_right = self.screen_to_world(Point::new(self.screen.width, self.screen.height));
        Rect::from_points(top_left, bottom_right)
    }

    /// Pan by a delta in screen pixels. Clamped to the world bounds.
    pub fn apply_pan(&mut self, delta: Vec2) {
        self.offset += delta;
        self.clamp_offset();
    }

    /// Multiply the zoom by `factor`, keeping `pivot` (screen) fixed.
    ///
    /// The zoom is clamped to its bounds and the translation re-clamped after,
    /// so the pivot can drift when the view is pressed against a world edge.
    pub fn apply_zoom(&mut self, factor: f64, pivot: Point) {
        let new_zoom = (self.zoom * factor).clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }

        // Convert pivot to world before zoom
        let world_point = self.screen_to_world(pivot);

        self.zoom = new_zoom;

        // Adjust offset so world_point stays at pivot
        let new_screen = self.world_to_screen(world_point);
        self.offset += pivot - new_screen;
        self.clamp_offset();
    }

    /// Keep the visible rectangle inside the world bounds.
    ///
    /// When the scaled world is smaller than the screen along an axis, it is
    /// pinned to the top-left edge instead.
    fn clamp_offset(&mut self) {
        fn clamp_axis(offset: f64, world_min: f64, world_max: f64, screen: f64, zoom: f64) -> f64 {
            // Not `-world_min * zoom`: that is -0.0 for a world at the origin.
            let upper = 0.0 - world_min * zoom;
            let lower = (screen - world_max * zoom).min(upper);
            offset.max(lower).min(upper)
        }

        self.offset.x = clamp_axis(
            self.offset.x,
            self.world.x0,
            self.world.x1,
            self.screen.width,
            self.zoom,
        );
        self.offset.y = clamp_axis(
            self.offset.y,
            self.world.y0,
            self.world.y1,
            self.screen.height,
            self.zoom,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(&CanvasConfig {
            screen_width: 800.0,
            screen_height: 600.0,
            ..CanvasConfig::default()
        })
    }

    #[test]
    fn test_default_viewport() {
        let vp = viewport();
        assert_eq!(vp.offset(), Vec2::ZERO);
        assert!((vp.zoom() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_screen_to_world_identity() {
        let vp = viewport();
        let screen = Point::new(100.0, 200.0);
        let world = vp.screen_to_world(screen);
        assert!((world.x - screen.x).abs() < f64::EPSILON);
        assert!((world.y - screen.y).abs() < f64::EPSILON);
    }

    #[test]
    fn test_screen_to_world_with_pan() {
        let mut vp = viewport();
        vp.apply_pan(Vec2::new(-50.0, -100.0));
        let world = vp.screen_to_world(Point::new(100.0, 200.0));
        assert!((world.x - 150.0).abs() < 1e-10);
        assert!((world.y - 300.0).abs() < 1e-10);
    }

    #[test]
    fn test_screen_to_world_with_zoom() {
        let mut vp = viewport();
        vp.apply_zoom(2.0, Point::ZERO);
        let world = vp.screen_to_world(Point::new(100.0, 200.0));
        assert!((world.x - 50.0).abs() < 1e-10);
        assert!((world.y - 100.0).abs() < 1e-10);
    }

    #[test]
    fn test_roundtrip_conversion() {
        let mut vp = viewport();
        vp.apply_zoom(1.5, Point::new(300.0, 200.0));
        vp.apply_pan(Vec2::new(-30.0, -20.0));

        for original in [Point::new(123.0, 456.0), Point::ZERO, Point::new(799.0, 1.0)] {
            let world = vp.screen_to_world(original);
            let back = vp.world_to_screen(world);
            assert!((back.x - original.x).abs() < 1e-10);
            assert!((back.y - original.y).abs() < 1e-10);
        }
    }

    #[test]
    fn test_zoom_clamp() {
        let mut vp = viewport();
        vp.apply_zoom(0.001, Point::ZERO);
        assert!((vp.zoom() - 0.5).abs() < f64::EPSILON);

        vp.apply_zoom(1000.0, Point::ZERO);
        assert!((vp.zoom() - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zoom_keeps_pivot_fixed() {
        let mut vp = viewport();
        vp.apply_pan(Vec2::new(-400.0, -300.0));
        let pivot = Point::new(400.0, 300.0);
        let before = vp.screen_to_world(pivot);
        vp.apply_zoom(1.2, pivot);
        let after = vp.screen_to_world(pivot);
        assert!((before.x - after.x).abs() < 1e-9);
        assert!((before.y - after.y).abs() < 1e-9);
    }

    #[test]
    fn test_pan_clamped_to_world() {
        let mut vp = viewport();
        // Cannot reveal anything left of / above the world origin.
        vp.apply_pan(Vec2::new(100.0, 100.0));
        assert_eq!(vp.offset(), Vec2::ZERO);

        // World is 4000 x 3000; at zoom 1 the far edge limits the pan.
        vp.apply_pan(Vec2::new(-1e6, -1e6));
        assert!((vp.offset().x - (800.0 - 4000.0)).abs() < 1e-9);
        assert!((vp.offset().y - (600.0 - 3000.0)).abs() < 1e-9);

        let visible = vp.visible_world_rect();
        assert!((visible.x1 - 4000.0).abs() < 1e-9);
        assert!((visible.y1 - 3000.0).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_out_reclamps_offset() {
        let mut vp = viewport();
        vp.apply_pan(Vec2::new(-1e6, -1e6));
        vp.apply_zoom(0.5, Point::ZERO);
        let visible = vp.visible_world_rect();
        assert!(visible.x1 <= 4000.0 + 1e-9);
        assert!(visible.y1 <= 3000.0 + 1e-9);
        assert!(visible.x0 >= -1e-9);
    }
}
